use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use thiserror::Error;

/// Errors related to value-kind parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KindError {
    #[error("Unknown data kind '{0}'")]
    Unknown(String),
}

/// Value kinds storable in a table column.
///
/// Cell values cross the table boundary as strings; the kind decides which
/// strings are well formed and how kinds relate for read/write compatibility.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DataKind {
    /// Boolean values (true/false)
    Boolean,
    /// 64-bit signed integers
    BigInt,
    /// Double-precision floating point numbers
    Double,
    /// Variable-length strings
    Varchar,
    /// Date and time with optional sub-second precision
    Timestamp,
    /// Date without time component
    Date,
    /// Time without date component
    Time,
}

impl DataKind {
    /// Returns the lower-case name of the kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DataKind::Boolean => "boolean",
            DataKind::BigInt => "bigint",
            DataKind::Double => "double",
            DataKind::Varchar => "varchar",
            DataKind::Timestamp => "timestamp",
            DataKind::Date => "date",
            DataKind::Time => "time",
        }
    }

    /// Parses a kind from a string representation.
    /// Supports various aliases for each kind.
    pub fn parse(name: &str) -> Result<Self, KindError> {
        match name.to_ascii_uppercase().as_str() {
            "BOOL" | "BOOLEAN" => Ok(Self::Boolean),
            "INT" | "BIGINT" | "INTEGER" => Ok(Self::BigInt),
            "FLOAT" | "DOUBLE" | "DECIMAL" | "NUMERIC" => Ok(Self::Double),
            "TEXT" | "STRING" | "VARCHAR" => Ok(Self::Varchar),
            "DATETIME" | "TIMESTAMP" => Ok(Self::Timestamp),
            "DATE" => Ok(Self::Date),
            "TIME" => Ok(Self::Time),
            _ => Err(KindError::Unknown(name.to_string())),
        }
    }

    /// Reports whether a value of kind `other` is acceptable where `self`
    /// is expected. Compatibility is widening: every kind accepts itself,
    /// doubles accept integers, timestamps accept dates, and varchar
    /// accepts everything since the boundary is string-encoded.
    pub fn accepts_kind(self, other: DataKind) -> bool {
        match (self, other) {
            _ if self == other => true,
            (Self::Varchar, _) => true,
            (Self::Double, Self::BigInt) => true,
            (Self::Timestamp, Self::Date) => true,
            _ => false,
        }
    }

    /// Checks that a string value is well formed for this kind.
    pub fn validates(self, value: &str) -> bool {
        match self {
            Self::Boolean => matches!(value, "true" | "false" | "1" | "0"),
            Self::BigInt => value.parse::<i64>().is_ok(),
            Self::Double => value.parse::<f64>().is_ok(),
            Self::Varchar => true,
            Self::Timestamp => parse_timestamp(value).is_ok(),
            Self::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
            Self::Time => NaiveTime::parse_from_str(value, "%H:%M:%S%.f").is_ok(),
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a timestamp with either a `T` or a space between date and time.
fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
}
