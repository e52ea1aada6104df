//! Row-oriented record type consumed by ranking.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Ordered mapping of field names to raw string values.
///
/// Field order follows the source header. Lookups are linear; records are
/// small (a handful of columns) and built once per input row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(name, value)` pairs, keeping their order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut record = Self::new();
        for (name, value) in pairs {
            record.insert(name, value);
        }
        record
    }

    /// Set `name` to `value`, replacing an existing value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value of `name`, or `None` when the field is absent or blank.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.trim().is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_preserves_order() {
        let record = Record::from_pairs([("Name", "A"), ("Fare", "80"), ("Age", "")]);
        let names: Vec<&str> = record.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Name", "Fare", "Age"]);
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn insert_replaces_existing_value() {
        let mut record = Record::from_pairs([("Fare", "1")]);
        record.insert("Fare", "2");
        assert_eq!(record.get("Fare"), Some("2"));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn non_empty_filters_blank_values() {
        let record = Record::from_pairs([("Age", " "), ("Sex", "male")]);
        assert_eq!(record.non_empty("Age"), None);
        assert_eq!(record.non_empty("Sex"), Some("male"));
        assert_eq!(record.non_empty("Missing"), None);
    }

    #[test]
    fn serializes_as_ordered_json_object() {
        let record = Record::from_pairs([("b", "1"), ("a", "2")]);
        let json = serde_json::to_string(&record).expect("serialize");
        assert_eq!(json, r#"{"b":"1","a":"2"}"#);
    }
}
