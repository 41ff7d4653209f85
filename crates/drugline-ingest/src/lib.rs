//! Drugline ingest - file-backed drug mention pipeline
//!
//! Reads CSV and JSON sources from a bronze directory, writes validated
//! tables to silver and drug mentions plus the journal ranking to gold.
//!
//! # Example
//!
//! ```ignore
//! use drugline_core::ProgressContext;
//! use drugline_ingest::{Config, run_journals, run_mentions};
//!
//! let config = Config::default();
//! let summary = run_mentions(&config, &ProgressContext::new())?;
//! println!("{} drugs mentioned", summary.drugs_mentioned);
//!
//! if let Some(top) = run_journals(&config)?.ranking {
//!     println!("{}: {} drugs", top.name, top.drug_count);
//! }
//! ```

pub mod config;
pub mod decode;
pub mod discovery;
pub mod error;
pub mod persist;
pub mod runner;

// Re-exports
pub use config::Config;
pub use decode::{Format, decode_text, load_source, parse_csv, parse_json};
pub use discovery::list_sources;
pub use error::IngestError;
pub use persist::{load_mentions, save_json};
pub use runner::{JournalSummary, MentionSummary, TableStats, run_journals, run_mentions};
