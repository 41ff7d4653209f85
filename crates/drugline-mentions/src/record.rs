//! Decoded records: ordered column -> scalar maps

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single cell value.
///
/// CSV cells always decode as [`Scalar::Str`]; JSON values map one-to-one.
/// `Null` means "absent", which is distinct from an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Short type name used in validation messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

/// One decoded row: columns in decode order.
///
/// Inserting a column that already exists replaces its value in place, so
/// duplicate keys behave as "last one wins".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Scalar)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Scalar>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Scalar> {
        self.fields
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    /// Number of columns present.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.fields.iter().map(|(c, v)| (c.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Scalar>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (column, value) in &self.fields {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object of scalar values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
        let mut record = Record::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((column, value)) = access.next_entry::<String, Scalar>()? {
            record.insert(column, value);
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_existing_column() {
        let mut record = Record::new();
        record.insert("id", 1i64);
        record.insert("title", "Aspirin");
        record.insert("id", 2i64);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("id"), Some(&Scalar::Int(2)));
        let columns: Vec<&str> = record.iter().map(|(c, _)| c).collect();
        assert_eq!(columns, vec!["id", "title"]);
    }

    #[test]
    fn json_keeps_document_order_and_nulls() {
        let record: Record =
            serde_json::from_str(r#"{"title": "x", "id": 7, "journal": null, "date": ""}"#)
                .unwrap();
        let columns: Vec<&str> = record.iter().map(|(c, _)| c).collect();
        assert_eq!(columns, vec!["title", "id", "journal", "date"]);
        assert_eq!(record.get("id"), Some(&Scalar::Int(7)));
        assert_eq!(record.get("journal"), Some(&Scalar::Null));
        assert_eq!(record.get("date"), Some(&Scalar::Str(String::new())));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn json_nested_values_are_rejected() {
        let result: Result<Record, _> = serde_json::from_str(r#"{"authors": ["a", "b"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn serializes_in_column_order() {
        let record: Record = [("id", Scalar::Int(1)), ("title", Scalar::from("Aspirin"))]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":1,"title":"Aspirin"}"#);
    }

    #[test]
    fn float_and_bool_round_trip_through_json() {
        let record: Record = serde_json::from_str(r#"{"score": 1.5, "flag": true}"#).unwrap();
        assert_eq!(record.get("score"), Some(&Scalar::Float(1.5)));
        assert_eq!(record.get("flag"), Some(&Scalar::Bool(true)));
    }
}
