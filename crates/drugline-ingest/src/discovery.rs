//! Find bronze source files

use std::path::{Path, PathBuf};

use crate::error::IngestError;

/// Extensions picked up from the bronze directory.
pub const SOURCE_EXTENSIONS: &[&str] = &["csv", "json"];

/// List `*.csv` and `*.json` files directly under `dir`, sorted by path.
pub fn list_sources(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    if !dir.is_dir() {
        return Err(IngestError::MissingDirectory {
            path: dir.to_path_buf(),
        });
    }

    let base = glob::Pattern::escape(&dir.to_string_lossy());
    let mut paths = Vec::new();
    for ext in SOURCE_EXTENSIONS {
        let pattern = format!("{base}/*.{ext}");
        let entries = glob::glob(&pattern).map_err(|e| IngestError::Pattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => paths.push(path),
                Ok(_) => {}
                Err(e) => log::warn!("skipping unreadable entry: {e}"),
            }
        }
    }
    paths.sort();

    log::debug!("{}: {} source files", dir.display(), paths.len());
    Ok(paths)
}
