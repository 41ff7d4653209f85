//! Typed views over validated records, and the mention output model

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::combine::TableDataset;
use crate::record::{Record, Scalar};
use crate::schema::TableSchema;

/// Drug identifier column.
pub const CODE_COLUMN: &str = "atccode";
/// Publication identifier column.
pub const ID_COLUMN: &str = "id";
/// Publication date column.
pub const DATE_COLUMN: &str = "date";
/// Publication venue column.
pub const VENUE_COLUMN: &str = "journal";

/// Key holding the combined venue list in serialized mentions.
pub const JOURNAL_KEY: &str = "journal";
/// Key holding the drug code in serialized mentions.
pub const DRUG_KEY: &str = "drug";

/// Read `column` converted through the schema's declared type. Columns the
/// schema does not declare are taken as-is.
fn field(record: &Record, schema: &TableSchema, column: &str) -> Option<Scalar> {
    let value = record.get(column)?;
    match schema.column_type(column) {
        Some(t) => t.convert(value).ok(),
        None if value.is_null() => None,
        None => Some(value.clone()),
    }
}

fn text_field(record: &Record, schema: &TableSchema, column: &str) -> Option<String> {
    field(record, schema, column).map(|v| match v {
        Scalar::Str(s) => s,
        other => other.to_string(),
    })
}

/// A drug from the registry, with its display name used for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrugRecord {
    pub code: String,
    pub name: String,
}

impl DrugRecord {
    pub fn from_record(record: &Record, schema: &TableSchema) -> Option<Self> {
        Some(Self {
            code: text_field(record, schema, CODE_COLUMN)?,
            name: text_field(record, schema, schema.search_column())?,
        })
    }

    /// Valid rows of a drugs dataset, in order. Rows missing a required
    /// field are dropped with a warning.
    pub fn from_dataset(dataset: &TableDataset) -> Vec<Self> {
        typed_rows(dataset, Self::from_record)
    }
}

/// A publication-like record (clinical trial or PubMed article).
#[derive(Debug, Clone, PartialEq)]
pub struct PublicationRecord {
    pub id: Scalar,
    pub date: String,
    pub venue: String,
    /// Lower-cased search text. `None` never matches.
    pub folded_text: Option<String>,
}

impl PublicationRecord {
    pub fn from_record(record: &Record, schema: &TableSchema) -> Option<Self> {
        Some(Self {
            id: field(record, schema, ID_COLUMN)?,
            date: text_field(record, schema, DATE_COLUMN)?,
            venue: text_field(record, schema, VENUE_COLUMN)?,
            folded_text: text_field(record, schema, schema.search_column())
                .map(|t| t.to_lowercase()),
        })
    }

    pub fn from_dataset(dataset: &TableDataset) -> Vec<Self> {
        typed_rows(dataset, Self::from_record)
    }

    /// Whether the search text contains `folded_name` (already lower-cased).
    pub fn mentions(&self, folded_name: &str) -> bool {
        self.folded_text
            .as_deref()
            .is_some_and(|text| text.contains(folded_name))
    }
}

fn typed_rows<T>(
    dataset: &TableDataset,
    convert: impl Fn(&Record, &TableSchema) -> Option<T>,
) -> Vec<T> {
    let mut dropped = 0usize;
    let rows: Vec<T> = dataset
        .valid
        .iter()
        .filter_map(|r| {
            let row = convert(r, &dataset.schema);
            if row.is_none() {
                dropped += 1;
            }
            row
        })
        .collect();
    if dropped > 0 {
        log::warn!(
            "{}: {dropped} valid rows lack a required field, ignored for matching",
            dataset.table()
        );
    }
    rows
}

/// Missing and `null` both read as an empty string.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One matching publication within a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationRef {
    pub id: Scalar,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub date: String,
}

/// One venue occurrence of a drug. An empty name is skipped by the ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueMention {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub date: String,
}

/// Everything known about where one drug is mentioned.
///
/// Serializes as `{"drug": code, <table>: [{id, date}], ..., "journal": [{name, date}]}`
/// with tables in the order they were searched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrugMention {
    pub drug: String,
    pub tables: Vec<(String, Vec<PublicationRef>)>,
    pub journal: Vec<VenueMention>,
}

impl DrugMention {
    /// Matches in `table`, if that table was searched.
    pub fn table(&self, table: &str) -> Option<&[PublicationRef]> {
        self.tables
            .iter()
            .find(|(t, _)| t == table)
            .map(|(_, refs)| refs.as_slice())
    }
}

impl Serialize for DrugMention {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tables.len() + 2))?;
        map.serialize_entry(DRUG_KEY, &self.drug)?;
        for (table, refs) in &self.tables {
            map.serialize_entry(table, refs)?;
        }
        map.serialize_entry(JOURNAL_KEY, &self.journal)?;
        map.end()
    }
}

/// Value under a key other than `drug` or `journal`: a table's matches, or
/// anything else, which is dropped.
#[derive(Deserialize)]
#[serde(untagged)]
enum ExtraKey {
    Table(Vec<PublicationRef>),
    Ignored(#[allow(dead_code)] IgnoredAny),
}

struct DrugMentionVisitor;

impl<'de> Visitor<'de> for DrugMentionVisitor {
    type Value = DrugMention;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a drug mention object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<DrugMention, A::Error> {
        let mut mention = DrugMention::default();
        // later duplicates win, as for records
        let mut tables: BTreeMap<String, usize> = BTreeMap::new();
        while let Some(key) = access.next_key::<String>()? {
            match key.as_str() {
                DRUG_KEY => {
                    mention.drug = access.next_value::<Option<String>>()?.unwrap_or_default()
                }
                JOURNAL_KEY => {
                    mention.journal = access
                        .next_value::<Option<Vec<VenueMention>>>()?
                        .unwrap_or_default()
                }
                _ => {
                    let ExtraKey::Table(refs) = access.next_value::<ExtraKey>()? else {
                        log::debug!("ignoring mention key '{key}': not a list of publications");
                        continue;
                    };
                    match tables.get(&key) {
                        Some(&i) => mention.tables[i].1 = refs,
                        None => {
                            tables.insert(key.clone(), mention.tables.len());
                            mention.tables.push((key, refs));
                        }
                    }
                }
            }
        }
        Ok(mention)
    }
}

impl<'de> Deserialize<'de> for DrugMention {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DrugMentionVisitor)
    }
}
