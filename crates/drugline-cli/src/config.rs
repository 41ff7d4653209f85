//! Configuration loading from TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use drugline_core::RetryPolicy;
use serde::Deserialize;

/// Global configuration for drugline
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub processing: ProcessingConfig,
    pub logging: LoggingConfig,
    pub pipeline: PipelineConfig,
    /// File this config was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Medallion layer directories
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub bronze: PathBuf,
    pub silver: PathBuf,
    pub gold: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            bronze: PathBuf::from("data/bronze"),
            silver: PathBuf::from("data/silver"),
            gold: PathBuf::from("data/gold"),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

impl ProcessingConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_retries,
            initial_delay: Duration::from_millis(self.retry_delay_ms),
            ..RetryPolicy::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(deserialize_with = "deserialize_env_path")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Publication tables searched for drug names, in output order
    pub publication_tables: Vec<String>,
    /// Explicit source files instead of scanning the bronze directory
    pub sources: Option<Vec<PathBuf>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let runtime = drugline_ingest::Config::default();
        Self {
            publication_tables: runtime.publication_tables,
            sources: None,
        }
    }
}

/// Deserialize a path that may be an environment variable reference like ${VAR}
fn deserialize_env_path<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| expand_env_var(&s)).map(PathBuf::from))
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./drugline.toml (current directory)
    /// 2. ~/.config/drugline/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("drugline.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "drugline") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Runtime pipeline settings
    pub fn pipeline(&self) -> drugline_ingest::Config {
        drugline_ingest::Config {
            bronze_dir: self.paths.bronze.clone(),
            silver_dir: self.paths.silver.clone(),
            gold_dir: self.paths.gold.clone(),
            sources: self.pipeline.sources.clone(),
            publication_tables: self.pipeline.publication_tables.clone(),
            retry: self.processing.retry_policy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.paths.bronze, PathBuf::from("data/bronze"));
        assert_eq!(config.processing.max_retries, 3);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());
        assert_eq!(
            config.pipeline.publication_tables,
            vec!["clinical_trials", "pubmed"]
        );
    }

    #[test]
    fn expand_env_var_simple() {
        std::env::set_var("DRUGLINE_TEST_VAR", "test_value");
        assert_eq!(
            expand_env_var("${DRUGLINE_TEST_VAR}"),
            Some("test_value".to_string())
        );
        std::env::remove_var("DRUGLINE_TEST_VAR");
    }

    #[test]
    fn expand_env_var_literal() {
        assert_eq!(expand_env_var("literal"), Some("literal".to_string()));
    }

    #[test]
    fn expand_env_var_missing() {
        assert_eq!(expand_env_var("${NONEXISTENT_VAR_12345}"), None);
    }

    #[test]
    fn parse_config_toml() {
        let toml = r#"
[paths]
bronze = "/srv/raw"
gold = "/srv/out"

[processing]
max_retries = 5
retry_delay_ms = 250

[logging]
level = "debug"
file = "logs/pipeline.log"

[pipeline]
publication_tables = ["pubmed"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.paths.bronze, PathBuf::from("/srv/raw"));
        assert_eq!(config.paths.silver, PathBuf::from("data/silver"));
        assert_eq!(config.logging.file, Some(PathBuf::from("logs/pipeline.log")));

        let pipeline = config.pipeline();
        assert_eq!(pipeline.gold_dir, PathBuf::from("/srv/out"));
        assert_eq!(pipeline.publication_tables, vec!["pubmed"]);
        assert_eq!(pipeline.retry.max_attempts, 5);
        assert_eq!(pipeline.retry.initial_delay, Duration::from_millis(250));
        assert_eq!(pipeline.retry.multiplier, 2);
    }
}
