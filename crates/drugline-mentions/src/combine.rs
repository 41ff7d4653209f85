//! Merge decoded sources into one validated dataset per logical table

use std::collections::BTreeMap;

use crate::error::EngineError;
use crate::record::Record;
use crate::schema::{SchemaRegistry, TableSchema};
use crate::validate::{InvalidRecord, partition};

/// Records decoded from one physical source (usually a file).
#[derive(Debug, Clone, Default)]
pub struct Source {
    /// File name (or any label) used to infer the logical table.
    pub name: String,
    pub records: Vec<Record>,
}

impl Source {
    pub fn new(name: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }
}

/// All records of one logical table, split by validity.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDataset {
    pub schema: TableSchema,
    pub valid: Vec<Record>,
    pub invalid: Vec<InvalidRecord>,
}

impl TableDataset {
    /// A dataset with no records, for a table that had no source.
    pub fn empty(schema: &TableSchema) -> Self {
        Self {
            schema: schema.clone(),
            valid: Vec::new(),
            invalid: Vec::new(),
        }
    }

    /// Logical table name.
    pub fn table(&self) -> &str {
        self.schema.name()
    }

    /// Column used for substring matching.
    pub fn search_column(&self) -> &str {
        self.schema.search_column()
    }

    /// Total records seen, valid or not.
    pub fn len(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Validate every source against the schema of its inferred table and
/// concatenate the partitions per table, in source order.
///
/// Sources whose name matches no known table are skipped. No deduplication
/// happens across sources.
pub fn combine(
    registry: &SchemaRegistry,
    sources: impl IntoIterator<Item = Source>,
) -> BTreeMap<String, TableDataset> {
    let mut tables: BTreeMap<String, TableDataset> = BTreeMap::new();

    for source in sources {
        let Some(schema) = registry.infer_table(&source.name) else {
            log::info!(
                "{}: no known table in name, skipping {} records",
                source.name,
                source.records.len()
            );
            continue;
        };

        let (valid, invalid) = partition(schema, source.records);
        log::debug!(
            "{} -> {}: {} valid, {} invalid",
            source.name,
            schema.name(),
            valid.len(),
            invalid.len()
        );
        if !invalid.is_empty() {
            log::warn!(
                "{}: {} rows failed validation against '{}'",
                source.name,
                invalid.len(),
                schema.name()
            );
        }

        let dataset = tables
            .entry(schema.name().to_string())
            .or_insert_with(|| TableDataset::empty(schema));
        dataset.valid.extend(valid);
        dataset.invalid.extend(invalid);
    }

    tables
}

/// Remove `table` from combined output, or build an empty dataset when no
/// source fed it. Fails if the registry does not know the table.
pub fn take_table(
    tables: &mut BTreeMap<String, TableDataset>,
    registry: &SchemaRegistry,
    table: &str,
) -> Result<TableDataset, EngineError> {
    let schema = registry.schema(table)?;
    Ok(tables
        .remove(table)
        .unwrap_or_else(|| TableDataset::empty(schema)))
}
