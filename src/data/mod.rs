//! Tabular data contracts and the in-memory columnar backend.

pub mod column;
pub mod columnar;
pub mod event;
pub mod kind;
pub mod schema;
pub mod table;
pub mod tuple;
