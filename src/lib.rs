//! # Rusty Table
//!
//! A generic in-memory tabular data abstraction: a `Table` contract over
//! row/column storage with a string-encoded cell boundary, schemas with
//! rich column metadata, synchronous change notification, and an intrusive
//! reference-counted handle for identity-shared tables.
//!
//! ## Features
//!
//! - **Columnar backend**: `ColumnarTable` keeps one string-encoded column
//!   store per schema column, with per-cell validity flags
//! - **Flexible data types**: Boolean, BigInt, Double, Varchar, Timestamp,
//!   Date, and Time column kinds with widening read/write compatibility
//! - **Column metadata**: defaults, categories, measurement scale, format,
//!   locale, uniqueness and nullability annotations on every column
//! - **Change notification**: registered listeners observe inserts, deletes
//!   and updates synchronously, with per-column edit sessions coalescing
//!   bursts of writes into one event
//! - **Identity sharing**: `Handle<T>` drives an intrusive atomic reference
//!   count and compares by address, so tables can key ordered containers
//! - **Type safety**: cell writes are validated against the column kind
//!   before any mutation
pub mod data;
pub mod error;
pub mod helpers;

pub use crate::data::columnar::ColumnarTable;
pub use crate::data::event::{EventKind, TableEvent, TableListener};
pub use crate::data::kind::{DataKind, KindError};
pub use crate::data::schema::{meta, ColumnSchema, ColumnSpec, Scale, Schema, SchemaError};
pub use crate::data::table::{RowIter, Table, TableError};
pub use crate::data::tuple::Tuple;
pub use crate::error::RustyTableError;
pub use crate::helpers::handle::{Handle, RefCount, RefCounted};
