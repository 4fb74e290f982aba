use crate::data::kind::DataKind;
use crate::error::RustyTableError;
use thiserror::Error;

/// Reserved metadata keys used by downstream consumers to interpret
/// columns generically.
pub mod meta {
    /// Metadata key for the column name.
    pub const NAME: &str = "Name";
    /// Metadata key for the value kind.
    pub const TYPE: &str = "Type";
    /// Metadata key for the default value.
    pub const DEFAULT_VALUE: &str = "DefaultValue";
    /// Metadata key for the category labels.
    pub const CATEGORIES: &str = "Categories";
    /// Metadata key for the measurement scale.
    pub const SCALE: &str = "Scale";
    /// Metadata key for the display format.
    pub const FORMAT: &str = "Format";
    /// Metadata key for the locale tag.
    pub const LOCALE: &str = "Locale";
    /// Metadata key for the uniqueness flag.
    pub const UNIQ: &str = "Uniq";
    /// Metadata key for the nullability flag.
    pub const HAS_NULL: &str = "HasNull";
}

/// Errors related to schema manipulation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Column '{0}' already exists")]
    DuplicateName(String),

    #[error("Column index {index} out of bounds for {columns} columns")]
    InvalidColumn { index: usize, columns: usize },
}

/// Measurement scales attachable to a column as metadata.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Scale {
    Nominal,
    Ordinal,
    Interval,
    Ratio,
}

impl Scale {
    /// Returns the lower-case name of the scale.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Scale::Nominal => "nominal",
            Scale::Ordinal => "ordinal",
            Scale::Interval => "interval",
            Scale::Ratio => "ratio",
        }
    }

    /// Parses a scale from its name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "nominal" => Some(Self::Nominal),
            "ordinal" => Some(Self::Ordinal),
            "interval" => Some(Self::Interval),
            "ratio" => Some(Self::Ratio),
            _ => None,
        }
    }
}

/// Describes one table column: name, value kind, default and annotations.
#[derive(Clone, Debug)]
pub struct ColumnSpec {
    /// Column name, unique within a schema and immutable once assigned
    name: String,
    /// Value kind stored by the column
    kind: DataKind,
    /// Default cell value; a column without one starts its cells invalid
    default_value: Option<String>,
    /// Category labels for nominal data
    categories: Vec<String>,
    /// Measurement scale
    scale: Option<Scale>,
    /// Display format pattern
    format: Option<String>,
    /// Locale tag for formatting
    locale: Option<String>,
    /// Values must be unique across rows
    unique: bool,
    /// Cells may hold no value
    nullable: bool,
    /// Bookkeeping column excluded from the data schema
    internal: bool,
}

impl ColumnSpec {
    /// Creates a descriptor with the given name and kind; nullable, without
    /// a default, and carrying no further metadata.
    pub fn new(name: impl Into<String>, kind: DataKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default_value: None,
            categories: Vec::new(),
            scale: None,
            format: None,
            locale: None,
            unique: false,
            nullable: true,
            internal: false,
        }
    }

    /// Sets the default value used when a row is created.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Sets the category labels.
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    /// Sets the measurement scale.
    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Sets the display format pattern.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Sets the locale tag.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Marks values as unique across rows.
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Sets whether cells may hold no value.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Marks the column as internal bookkeeping, hidden from the data schema.
    pub fn with_internal(mut self) -> Self {
        self.internal = true;
        self
    }

    /// Returns the column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value kind.
    pub fn kind(&self) -> DataKind {
        self.kind
    }

    /// Returns the default value, if any.
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Returns the category labels.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Returns the measurement scale, if any.
    pub fn scale(&self) -> Option<Scale> {
        self.scale
    }

    /// Returns the display format, if any.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// Returns the locale tag, if any.
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Returns true when values must be unique across rows.
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Returns true when cells may hold no value.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns true for internal bookkeeping columns.
    pub fn is_internal(&self) -> bool {
        self.internal
    }

    /// Generic metadata lookup by reserved key; string-encoded so consumers
    /// can interpret columns without knowing the descriptor layout.
    pub fn metadata(&self, key: &str) -> Option<String> {
        match key {
            meta::NAME => Some(self.name.clone()),
            meta::TYPE => Some(self.kind.as_str().to_owned()),
            meta::DEFAULT_VALUE => self.default_value.clone(),
            meta::CATEGORIES if self.categories.is_empty() => None,
            meta::CATEGORIES => Some(self.categories.join(",")),
            meta::SCALE => self.scale.map(|scale| scale.as_str().to_owned()),
            meta::FORMAT => self.format.clone(),
            meta::LOCALE => self.locale.clone(),
            meta::UNIQ => Some(self.unique.to_string()),
            meta::HAS_NULL => Some(self.nullable.to_string()),
            _ => None,
        }
    }
}

/// Contract describing a table's column layout.
pub trait Schema {
    /// Returns the number of columns.
    fn column_count(&self) -> usize;

    /// Returns the descriptor of the column at `col`.
    fn spec(&self, col: usize) -> Result<&ColumnSpec, RustyTableError>;

    /// Returns the value kind of the column at `col`.
    fn column_kind(&self, col: usize) -> Result<DataKind, RustyTableError> {
        Ok(self.spec(col)?.kind())
    }

    /// Returns the name of the column at `col`.
    fn column_name(&self, col: usize) -> Result<&str, RustyTableError> {
        Ok(self.spec(col)?.name())
    }

    /// Returns the default value of the column at `col`, if it has one.
    fn column_default(&self, col: usize) -> Result<Option<&str>, RustyTableError> {
        Ok(self.spec(col)?.default_value())
    }

    /// Looks up a column index by field name.
    fn column_index(&self, field: &str) -> Option<usize>;

    /// Reports whether a column with the given name exists.
    fn has_column(&self, field: &str) -> bool {
        self.column_index(field).is_some()
    }

    /// Reports whether values read from `col` may be interpreted as `kind`.
    /// Probes never raise; an unknown column is simply not readable.
    fn can_get(&self, col: usize, kind: DataKind) -> bool {
        self.spec(col)
            .map(|spec| kind.accepts_kind(spec.kind()))
            .unwrap_or(false)
    }

    /// Reports whether values of `kind` may be written to `col`.
    fn can_set(&self, col: usize, kind: DataKind) -> bool {
        self.spec(col)
            .map(|spec| spec.kind().accepts_kind(kind))
            .unwrap_or(false)
    }

    /// Appends a column descriptor, returning its index.
    fn add_column(&mut self, spec: ColumnSpec) -> Result<usize, RustyTableError>;

    /// Removes the column at `col`; later indices shift down.
    /// Returns false when the index does not exist.
    fn remove_column(&mut self, col: usize) -> bool;

    /// Removes the column with the given name.
    /// Returns false when the name does not exist.
    fn remove_column_named(&mut self, field: &str) -> bool;

    /// Returns a schema holding only the non-internal columns.
    fn data_schema(&self) -> ColumnSchema;
}

/// Ordered, name-unique list of column descriptors.
#[derive(Clone, Debug, Default)]
pub struct ColumnSchema {
    specs: Vec<ColumnSpec>,
}

impl ColumnSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column addition.
    pub fn with_column(mut self, spec: ColumnSpec) -> Result<Self, RustyTableError> {
        Schema::add_column(&mut self, spec)?;
        Ok(self)
    }

    /// Iterates the column descriptors in order.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.specs.iter()
    }

    fn ensure_index(&self, col: usize) -> Result<(), SchemaError> {
        if col < self.specs.len() {
            Ok(())
        } else {
            Err(SchemaError::InvalidColumn {
                index: col,
                columns: self.specs.len(),
            })
        }
    }
}

impl Schema for ColumnSchema {
    fn column_count(&self) -> usize {
        self.specs.len()
    }

    fn spec(&self, col: usize) -> Result<&ColumnSpec, RustyTableError> {
        self.ensure_index(col)?;
        Ok(&self.specs[col])
    }

    fn column_index(&self, field: &str) -> Option<usize> {
        self.specs.iter().position(|spec| spec.name() == field)
    }

    fn add_column(&mut self, spec: ColumnSpec) -> Result<usize, RustyTableError> {
        if self.has_column(spec.name()) {
            return Err(SchemaError::DuplicateName(spec.name().to_owned()).into());
        }
        self.specs.push(spec);
        Ok(self.specs.len() - 1)
    }

    fn remove_column(&mut self, col: usize) -> bool {
        if col < self.specs.len() {
            self.specs.remove(col);
            true
        } else {
            false
        }
    }

    fn remove_column_named(&mut self, field: &str) -> bool {
        match self.column_index(field) {
            Some(col) => self.remove_column(col),
            None => false,
        }
    }

    fn data_schema(&self) -> ColumnSchema {
        ColumnSchema {
            specs: self
                .specs
                .iter()
                .filter(|spec| !spec.is_internal())
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn sample() -> Result<ColumnSchema> {
        let schema = ColumnSchema::new()
            .with_column(ColumnSpec::new("id", DataKind::BigInt).with_default("0"))?
            .with_column(ColumnSpec::new("name", DataKind::Varchar).with_default(""))?;
        Ok(schema)
    }

    #[test]
    fn schema_lookups() -> Result<()> {
        let schema = sample()?;
        assert_eq!(schema.column_count(), 2);
        assert_eq!(schema.column_index("name"), Some(1));
        assert_eq!(schema.column_index("missing"), None);
        assert!(schema.has_column("id"));
        assert_eq!(schema.column_kind(0)?, DataKind::BigInt);
        assert_eq!(schema.column_name(1)?, "name");
        assert_eq!(schema.column_default(0)?, Some("0"));
        assert!(schema.spec(2).is_err());
        Ok(())
    }

    #[test]
    fn schema_rejects_duplicate_names() -> Result<()> {
        let mut schema = sample()?;
        let result = schema.add_column(ColumnSpec::new("id", DataKind::Varchar));
        assert!(matches!(
            result,
            Err(RustyTableError::SchemaError(SchemaError::DuplicateName(_)))
        ));
        assert_eq!(schema.column_count(), 2);
        Ok(())
    }

    #[test]
    fn schema_removal_shifts_indices() -> Result<()> {
        let mut schema = sample()?;
        schema.add_column(ColumnSpec::new("age", DataKind::BigInt))?;
        assert!(schema.remove_column_named("id"));
        assert_eq!(schema.column_index("name"), Some(0));
        assert_eq!(schema.column_index("age"), Some(1));
        assert!(!schema.remove_column_named("id"));
        assert!(!schema.remove_column(5));
        Ok(())
    }

    #[test]
    fn schema_compatibility_probes() -> Result<()> {
        let schema = sample()?;
        assert!(schema.can_get(0, DataKind::Double));
        assert!(schema.can_get(0, DataKind::Varchar));
        assert!(!schema.can_get(0, DataKind::Boolean));
        assert!(schema.can_set(0, DataKind::BigInt));
        assert!(!schema.can_set(0, DataKind::Double));
        assert!(!schema.can_set(9, DataKind::BigInt));
        Ok(())
    }

    #[test]
    fn data_schema_hides_internal_columns() -> Result<()> {
        let schema = sample()?
            .with_column(ColumnSpec::new("_rowstate", DataKind::BigInt).with_internal())?;
        let data = schema.data_schema();
        assert_eq!(data.column_count(), 2);
        assert!(!data.has_column("_rowstate"));
        assert_eq!(schema.column_count(), 3);
        Ok(())
    }

    #[test]
    fn column_spec_metadata_keys() {
        let spec = ColumnSpec::new("score", DataKind::Double)
            .with_default("0.0")
            .with_categories(vec!["low".to_owned(), "high".to_owned()])
            .with_scale(Scale::Ratio)
            .with_format("%.2f")
            .with_locale("en_US")
            .with_unique(true)
            .with_nullable(false);
        assert_eq!(spec.metadata(meta::NAME).as_deref(), Some("score"));
        assert_eq!(spec.metadata(meta::TYPE).as_deref(), Some("double"));
        assert_eq!(spec.metadata(meta::DEFAULT_VALUE).as_deref(), Some("0.0"));
        assert_eq!(spec.metadata(meta::CATEGORIES).as_deref(), Some("low,high"));
        assert_eq!(spec.metadata(meta::SCALE).as_deref(), Some("ratio"));
        assert_eq!(spec.metadata(meta::FORMAT).as_deref(), Some("%.2f"));
        assert_eq!(spec.metadata(meta::LOCALE).as_deref(), Some("en_US"));
        assert_eq!(spec.metadata(meta::UNIQ).as_deref(), Some("true"));
        assert_eq!(spec.metadata(meta::HAS_NULL).as_deref(), Some("false"));
        assert_eq!(spec.metadata("Unknown"), None);
    }

    #[test]
    fn scale_round_trips_through_name() {
        for scale in [Scale::Nominal, Scale::Ordinal, Scale::Interval, Scale::Ratio] {
            assert_eq!(Scale::parse(scale.as_str()), Some(scale));
        }
        assert_eq!(Scale::parse("logarithmic"), None);
    }
}
