//! Structural errors of the matching engine
//!
//! Per-record validation failures are not errors here: they route the record
//! to the invalid partition (see [`crate::validate::RowError`]).

/// Error that aborts an engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A table name was requested that the schema registry does not know.
    SchemaLookup { table: String },
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SchemaLookup { table } => write!(f, "no schema registered for table '{table}'"),
        }
    }
}

impl std::error::Error for EngineError {}
