//! Drugline Mentions - Record validation and drug/publication cross-referencing
//!
//! Decoded records flow through four steps:
//!
//! 1. [`validate`] checks each record against its table [`schema`]
//! 2. [`combine`] merges sources of the same logical table into a [`TableDataset`]
//! 3. [`matcher`] finds which publications mention which drugs
//! 4. [`ranking`] picks the journal that mentions the most distinct drugs
//!
//! Everything in this crate is synchronous and free of I/O.
//!
//! # Example
//!
//! ```ignore
//! use drugline_mentions::{SchemaRegistry, Source, combine, find_mentions, rank_journals};
//!
//! let registry = SchemaRegistry::standard();
//! let tables = combine(registry, sources);
//! let mentions = find_mentions(&tables["drugs"], &[&tables["pubmed"]]);
//! if let Some(top) = rank_journals(&mentions) {
//!     println!("{} mentions {} drugs", top.name, top.drug_count);
//! }
//! ```

pub mod combine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod ranking;
pub mod record;
pub mod schema;
pub mod validate;

// Re-exports
pub use combine::{Source, TableDataset, combine, take_table};
pub use error::EngineError;
pub use matcher::find_mentions;
pub use model::{DrugMention, DrugRecord, PublicationRecord, PublicationRef, VenueMention};
pub use ranking::{JournalRanking, rank_journals};
pub use record::{Record, Scalar};
pub use schema::{ScalarType, SchemaRegistry, TableSchema};
pub use validate::{InvalidRecord, RowError, ValidationOutcome, check_row, partition, validate};
