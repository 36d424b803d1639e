//! Window position persistence.
//!
//! A sidecar JSON file holding the shell's on-screen anchor, written right
//! before a hard restart and read once when the shell is built.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::Point;

/// Default sidecar file name, relative to the project root.
pub const POSITION_FILE: &str = "window_position.json";

/// Persisted shell anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PositionRecord {
    pub x: i32,
    pub y: i32,
}

impl From<Point> for PositionRecord {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<PositionRecord> for Point {
    fn from(r: PositionRecord) -> Self {
        Point::new(r.x, r.y)
    }
}

#[derive(Debug, Error)]
pub enum PositionError {
    #[error("IO error when writing `{0}`")]
    Io(std::path::PathBuf, #[source] std::io::Error),

    #[error("failed to encode position record")]
    Encode(#[from] serde_json::Error),
}

/// Write `record` to `path`.
pub fn persist_position(record: PositionRecord, path: &Path) -> Result<(), PositionError> {
    let json = serde_json::to_string(&record)?;
    fs::write(path, json).map_err(|e| PositionError::Io(path.to_path_buf(), e))?;
    crate::debug!("shell"; "saved position ({}, {}) to {}", record.x, record.y, path.display());
    Ok(())
}

/// Read the record at `path`.
///
/// Missing or malformed files mean "no prior position".
pub fn restore_position(path: &Path) -> Option<PositionRecord> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            crate::debug!("shell"; "no saved position ({}): {}", path.display(), e);
            return None;
        }
    };

    match parse_record(&json) {
        Ok(record) => Some(record),
        Err(e) => {
            crate::debug!("shell"; "ignoring malformed position file {}: {}", path.display(), e);
            None
        }
    }
}

/// Decode a record; only a JSON object with keys `x` and `y` is accepted.
fn parse_record(json: &str) -> Result<PositionRecord, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_object() {
        return Err(serde::de::Error::custom("position record must be an object"));
    }
    serde_json::from_value(value)
}

/// Delete the sidecar. Returns whether a file was removed.
pub fn clear_position(path: &Path) -> std::io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_restore_valid_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(POSITION_FILE);
        fs::write(&path, r#"{"x": 100, "y": 200}"#).unwrap();

        assert_eq!(
            restore_position(&path),
            Some(PositionRecord { x: 100, y: 200 })
        );
    }

    #[test]
    fn test_persist_then_restore() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(POSITION_FILE);

        persist_position(PositionRecord { x: -40, y: 12 }, &path).unwrap();
        assert_eq!(
            restore_position(&path),
            Some(PositionRecord { x: -40, y: 12 })
        );
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(restore_position(&dir.path().join(POSITION_FILE)), None);
    }

    #[test]
    fn test_malformed_records_are_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(POSITION_FILE);

        for content in [
            "",
            "not json",
            r#"{"x": 1}"#,
            r#"{"x": "1", "y": 2}"#,
            r#"{"x": 1, "y": 2, "z": 3}"#,
            r#"{"x": 1.5, "y": 2}"#,
            "[1, 2]",
        ] {
            fs::write(&path, content).unwrap();
            assert_eq!(restore_position(&path), None, "{content:?}");
        }
    }

    #[test]
    fn test_sequence_record_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(POSITION_FILE);

        fs::write(&path, "[1, 2]").unwrap();
        assert_eq!(restore_position(&path), None);
        assert!(parse_record("[100, 200]").is_err());
        assert_eq!(
            parse_record(r#"{"y": 200, "x": 100}"#).unwrap(),
            PositionRecord { x: 100, y: 200 }
        );
    }

    #[test]
    fn test_clear_position() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(POSITION_FILE);

        assert!(!clear_position(&path).unwrap());
        persist_position(PositionRecord { x: 1, y: 2 }, &path).unwrap();
        assert!(clear_position(&path).unwrap());
        assert!(!path.exists());
    }
}
