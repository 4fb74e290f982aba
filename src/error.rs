use thiserror::Error;

/// Main error type for the rusty_table crate.
/// Aggregates errors from the kind, schema and table modules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RustyTableError {
    #[error("{0}")]
    KindError(#[from] crate::data::kind::KindError),

    #[error("{0}")]
    SchemaError(#[from] crate::data::schema::SchemaError),

    #[error("{0}")]
    TableError(#[from] crate::data::table::TableError),
}
