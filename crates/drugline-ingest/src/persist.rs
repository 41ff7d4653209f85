//! JSON persistence for silver and gold outputs

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use drugline_core::{RetryPolicy, retry};
use drugline_mentions::DrugMention;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::IngestError;

/// Write `value` as indented JSON, creating parent directories.
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), IngestError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| IngestError::io(parent, e))?;
    }

    let file = File::create(path).map_err(|e| IngestError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    let mut serializer = Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .map_err(|e| IngestError::json(path, e))?;
    writer.write_all(b"\n").map_err(|e| IngestError::io(path, e))?;
    writer.flush().map_err(|e| IngestError::io(path, e))?;

    log::debug!("wrote {}", path.display());
    Ok(())
}

/// Read persisted drug mentions. The document must be a JSON array.
pub fn load_mentions(path: &Path, policy: &RetryPolicy) -> Result<Vec<DrugMention>, IngestError> {
    let label = path.display().to_string();
    let text = retry(&label, policy, || {
        std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))
    })?;

    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| IngestError::json(path, e))?;
    if !value.is_array() {
        return Err(IngestError::NotAnArray {
            path: path.to_path_buf(),
        });
    }
    serde_json::from_value(value).map_err(|e| IngestError::json(path, e))
}
