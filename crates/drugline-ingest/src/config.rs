//! Pipeline runtime configuration

use std::path::PathBuf;

use drugline_core::RetryPolicy;
use drugline_mentions::schema::{CLINICAL_TRIALS, PUBMED};

/// File name of the mention output in the gold directory.
pub const MENTIONS_FILE: &str = "drug_mentions.json";
/// File name of the journal ranking in the gold directory.
pub const JOURNALS_FILE: &str = "journal_analysis.json";

/// Runtime configuration for the drug mention pipeline
#[derive(Debug, Clone)]
pub struct Config {
    /// Raw input files
    pub bronze_dir: PathBuf,
    /// Validated tables, one file per table plus rejected rows
    pub silver_dir: PathBuf,
    /// Final outputs
    pub gold_dir: PathBuf,
    /// Explicit source files; `None` scans `bronze_dir`
    pub sources: Option<Vec<PathBuf>>,
    /// Publication tables to search, in output order
    pub publication_tables: Vec<String>,
    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bronze_dir: PathBuf::from("data/bronze"),
            silver_dir: PathBuf::from("data/silver"),
            gold_dir: PathBuf::from("data/gold"),
            sources: None,
            publication_tables: vec![CLINICAL_TRIALS.to_string(), PUBMED.to_string()],
            retry: RetryPolicy::default(),
        }
    }
}

impl Config {
    pub fn mentions_path(&self) -> PathBuf {
        self.gold_dir.join(MENTIONS_FILE)
    }

    pub fn journals_path(&self) -> PathBuf {
        self.gold_dir.join(JOURNALS_FILE)
    }

    /// Publication tables to search, first occurrence kept when a table is
    /// listed more than once.
    pub fn search_tables(&self) -> Vec<&str> {
        let mut tables: Vec<&str> = Vec::with_capacity(self.publication_tables.len());
        for table in &self.publication_tables {
            if tables.contains(&table.as_str()) {
                log::warn!("publication table '{table}' listed twice, searching it once");
            } else {
                tables.push(table);
            }
        }
        tables
    }

    /// Silver output for the valid rows of `table`.
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.silver_dir.join(format!("{table}.json"))
    }

    /// Silver output for the rejected rows of `table`.
    pub fn invalid_path(&self, table: &str) -> PathBuf {
        self.silver_dir.join(format!("{table}_invalid.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.bronze_dir, PathBuf::from("data/bronze"));
        assert!(config.sources.is_none());
        assert_eq!(config.publication_tables, vec!["clinical_trials", "pubmed"]);
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn search_tables_drop_repeats() {
        let config = Config {
            publication_tables: vec!["pubmed".into(), "clinical_trials".into(), "pubmed".into()],
            ..Default::default()
        };
        assert_eq!(config.search_tables(), vec!["pubmed", "clinical_trials"]);
    }

    #[test]
    fn output_paths() {
        let config = Config::default();
        assert_eq!(
            config.mentions_path(),
            PathBuf::from("data/gold/drug_mentions.json")
        );
        assert_eq!(
            config.invalid_path("pubmed"),
            PathBuf::from("data/silver/pubmed_invalid.json")
        );
    }
}
