/// Ordered bundle of named string values, used to populate table rows.
#[derive(Clone, Debug, Default)]
pub struct Tuple {
    fields: Vec<(String, String)>,
}

impl Tuple {
    /// Creates an empty tuple.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field addition. Duplicate names are kept in order;
    /// lookups return the first occurrence.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((field.into(), value.into()));
        self
    }

    /// Returns the value of the first field with the given name.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates the `(field, value)` pairs in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when the tuple has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuple_lookup_is_first_wins() {
        let tuple = Tuple::new()
            .with("id", "1")
            .with("name", "Ann")
            .with("name", "Bob");
        assert_eq!(tuple.len(), 3);
        assert_eq!(tuple.get("name"), Some("Ann"));
        assert_eq!(tuple.get("missing"), None);
        let pairs: Vec<_> = tuple.fields().collect();
        assert_eq!(pairs[0], ("id", "1"));
        assert_eq!(pairs[2], ("name", "Bob"));
    }

    #[test]
    fn empty_tuple() {
        let tuple = Tuple::new();
        assert!(tuple.is_empty());
        assert_eq!(tuple.get("anything"), None);
    }
}
