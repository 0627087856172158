//! Snapshot persistence
//!
//! The dump file holds one JSON object of timestamp -> rank table. Each dump
//! reads the whole file, inserts its snapshot and rewrites the file.

use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};
use tracing::info;

use crate::error::{RankingsError, Result};
use crate::types::RankTable;

/// Merge `table` into the dump file under `timestamp` (or now).
///
/// The file must already exist and contain a JSON object. Returns the key
/// the snapshot was written under.
pub fn dump(table: &RankTable, path: &Path, timestamp: Option<&str>) -> Result<String> {
    let key = timestamp.map_or_else(current_timestamp, str::to_string);

    let mut snapshots = read_snapshots(path)?;
    let snapshot = serde_json::to_value(table).map_err(RankingsError::Encode)?;
    snapshots.insert(key.clone(), snapshot);

    let rendered = render_ascii_pretty(&Value::Object(snapshots))?;
    fs::write(path, rendered).map_err(|source| RankingsError::DumpWrite {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = ?path, key = %key, colleges = table.college_count(), "dumped snapshot");
    Ok(key)
}

/// Load every snapshot in the dump file
pub fn read_snapshots(path: &Path) -> Result<Map<String, Value>> {
    let content = fs::read_to_string(path).map_err(|source| RankingsError::DumpRead {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: Value = serde_json::from_str(&content).map_err(|source| RankingsError::DumpParse {
        path: path.to_path_buf(),
        source,
    })?;

    match parsed {
        Value::Object(snapshots) => Ok(snapshots),
        _ => Err(RankingsError::DumpNotObject {
            path: path.to_path_buf(),
        }),
    }
}

/// Seconds since the epoch with a microsecond fraction
pub fn current_timestamp() -> String {
    let now = Utc::now();
    format!("{}.{:06}", now.timestamp(), now.timestamp_subsec_micros())
}

fn render_ascii_pretty(value: &Value) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer).map_err(RankingsError::Encode)?;
    Ok(escape_non_ascii(&String::from_utf8_lossy(&buf)))
}

/// Replace every non-ASCII char with `\uXXXX` escapes (surrogate pairs above
/// the BMP). Only valid on serializer output, where such chars can only
/// appear inside string literals.
fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut units = [0u16; 2];
    for ch in json.chars() {
        if ch.is_ascii() {
            out.push(ch);
            continue;
        }
        for unit in ch.encode_utf16(&mut units) {
            out.push_str(&format!("\\u{:04x}", unit));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_non_ascii() {
        assert_eq!(escape_non_ascii("{\"a\": \"plain\"}"), "{\"a\": \"plain\"}");
        assert_eq!(escape_non_ascii("\"Universit\u{e9}\""), "\"Universit\\u00e9\"");
        assert_eq!(escape_non_ascii("\"\u{1F393}\""), "\"\\ud83c\\udf93\"");
    }

    #[test]
    fn test_escaped_output_parses_back() {
        let value = serde_json::json!({ "name": "École Polytechnique" });
        let rendered = render_ascii_pretty(&value).unwrap();
        assert!(rendered.is_ascii());
        assert!(rendered.contains("\n    \"name\""), "expected 4-space indent: {}", rendered);
        let back: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_current_timestamp_shape() {
        let ts = current_timestamp();
        let (secs, fraction) = ts.split_once('.').unwrap();
        assert!(secs.parse::<i64>().unwrap() > 1_600_000_000);
        assert_eq!(fraction.len(), 6);
    }
}
