//! Row validation against a table schema

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::{Record, Scalar};
use crate::schema::{ScalarType, TableSchema};

/// Why a record does not conform to its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// The record has more or fewer columns than the schema.
    ColumnCount { expected: usize, found: usize },
    /// A column's value cannot be read as the declared type.
    Type {
        column: String,
        expected: ScalarType,
        found: &'static str,
    },
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnCount { expected, found } => write!(
                f,
                "Incorrect number of columns. Expected {expected}, found {found}."
            ),
            Self::Type {
                column,
                expected,
                found,
            } => write!(
                f,
                "Incorrect type for column '{column}'. Expected {expected}, found {found}."
            ),
        }
    }
}

impl std::error::Error for RowError {}

/// A rejected record together with the reason, as written to the invalid
/// partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidRecord {
    pub row: Record,
    pub error: String,
}

/// Result of validating one record.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Valid(Record),
    Invalid { row: Record, error: String },
}

/// Check `record` against `schema` without modifying it.
///
/// Fails on a column-count mismatch first, then on the first schema column
/// (in schema order) whose value does not coerce. A missing column reads as
/// `Null`, which coerces to nothing.
pub fn check_row(schema: &TableSchema, record: &Record) -> Result<(), RowError> {
    if record.len() != schema.column_count() {
        return Err(RowError::ColumnCount {
            expected: schema.column_count(),
            found: record.len(),
        });
    }

    for (column, expected) in schema.columns() {
        let value = record.get(column).unwrap_or(&Scalar::Null);
        if let Err(e) = expected.convert(value) {
            return Err(RowError::Type {
                column: column.to_string(),
                expected,
                found: e.found(),
            });
        }
    }

    Ok(())
}

/// Validate one record, taking ownership so it can be routed to a partition.
pub fn validate(schema: &TableSchema, record: Record) -> ValidationOutcome {
    match check_row(schema, &record) {
        Ok(()) => ValidationOutcome::Valid(record),
        Err(e) => ValidationOutcome::Invalid {
            row: record,
            error: e.to_string(),
        },
    }
}

/// Split records into (valid, invalid) partitions, preserving input order.
pub fn partition(
    schema: &TableSchema,
    records: impl IntoIterator<Item = Record>,
) -> (Vec<Record>, Vec<InvalidRecord>) {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    for record in records {
        match validate(schema, record) {
            ValidationOutcome::Valid(r) => valid.push(r),
            ValidationOutcome::Invalid { row, error } => {
                log::debug!("{}: invalid row: {error}", schema.name());
                invalid.push(InvalidRecord { row, error });
            }
        }
    }
    (valid, invalid)
}
