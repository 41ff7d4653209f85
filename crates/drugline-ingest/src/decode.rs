//! Decode bronze files into records
//!
//! Bytes are turned into text first (BOM sniffing, UTF-8, Windows-1252
//! fallback), then parsed as CSV or JSON depending on the extension.

use std::borrow::Cow;
use std::path::Path;

use drugline_core::{RetryPolicy, retry};
use drugline_mentions::{Record, Scalar, Source};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

use crate::error::IngestError;

/// Supported source formats, by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Decode raw bytes to text.
///
/// A byte order mark wins. Without one, valid UTF-8 is taken as-is and
/// anything else is read as Windows-1252, which never fails.
pub fn decode_text(bytes: &[u8]) -> (Cow<'_, str>, &'static Encoding) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return (text, encoding);
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => (Cow::Borrowed(text), UTF_8),
        Err(_) => {
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            (text, WINDOWS_1252)
        }
    }
}

/// Column holding the cells of a CSV row past its header, comma-joined.
pub const EXTRA_COLUMN: &str = "_extra";

/// Parse CSV text with a header row.
///
/// Rows shorter than the header get `Null` for the missing cells. All cells
/// past the header land in one [`EXTRA_COLUMN`], so an overlong row is
/// always one column over.
pub fn parse_csv(text: &str) -> Result<Vec<Record>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut record = Record::with_capacity(headers.len() + 1);
        for (idx, column) in headers.iter().enumerate() {
            let value = row.get(idx).map_or(Scalar::Null, Scalar::from);
            record.insert(column, value);
        }
        if row.len() > headers.len() {
            let extra: Vec<&str> = row.iter().skip(headers.len()).collect();
            record.insert(EXTRA_COLUMN, extra.join(","));
        }
        records.push(record);
    }
    Ok(records)
}

/// Parse a JSON document that must hold an array of objects.
///
/// A document that fails to parse gets one repair pass removing trailing
/// commas, then is parsed again.
pub fn parse_json(text: &str, path: &Path) -> Result<Vec<Record>, IngestError> {
    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("{}: {e}, retrying without trailing commas", path.display());
            let repaired = strip_trailing_commas(text);
            serde_json::from_str(&repaired).map_err(|e| IngestError::json(path, e))?
        }
    };
    if !value.is_array() {
        return Err(IngestError::NotAnArray {
            path: path.to_path_buf(),
        });
    }
    serde_json::from_value(value).map_err(|e| IngestError::json(path, e))
}

/// Drop commas that directly precede (modulo whitespace) a closing `}` or
/// `]`. String literals are left untouched.
pub fn strip_trailing_commas(text: &str) -> Cow<'_, str> {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut changed = false;

    for (idx, c) in text.char_indices() {
        if in_string {
            out.push(c);
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = text[idx + 1..].trim_start().chars().next();
                if matches!(next, Some('}' | ']')) {
                    changed = true;
                } else {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(text)
    }
}

/// Read and decode one source file. Reading is retried per `policy`;
/// parsing is not.
pub fn load_source(path: &Path, policy: &RetryPolicy) -> Result<Source, IngestError> {
    let format = Format::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let label = path.display().to_string();
    let bytes = retry(&label, policy, || {
        std::fs::read(path).map_err(|e| IngestError::io(path, e))
    })?;
    let (text, encoding) = decode_text(&bytes);
    if encoding != UTF_8 {
        log::debug!("{label}: decoded as {}", encoding.name());
    }

    let records = match format {
        Format::Csv => parse_csv(&text).map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?,
        Format::Json => parse_json(&text, path)?,
    };
    log::info!("{label}: {} records", records.len());

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or(label);
    Ok(Source::new(name, records))
}
