//! File I/O utilities with atomic writes
//!
//! A data file is either fully replaced or left untouched.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::PaycycleError;

/// Read JSON from a file, returning a default value if the file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, PaycycleError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| PaycycleError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| PaycycleError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, fsync, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), PaycycleError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            PaycycleError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| PaycycleError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| PaycycleError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| PaycycleError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| PaycycleError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        PaycycleError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct Snapshot {
        periods: Vec<String>,
    }

    fn sample() -> Snapshot {
        Snapshot {
            periods: vec!["2025-01-01".into(), "2025-01-15".into()],
        }
    }

    #[test]
    fn test_read_nonexistent_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let data: Snapshot = read_json(temp_dir.path().join("missing.json")).unwrap();
        assert_eq!(data, Snapshot::default());
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("periods.json");

        write_json_atomic(&path, &sample()).unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("periods.json.tmp").exists());
        let loaded: Snapshot = read_json(&path).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("bills.json");

        write_json_atomic(&path, &sample()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bills.json");
        fs::write(&path, "not json at all").unwrap();

        let result: Result<Snapshot, _> = read_json(&path);
        assert!(matches!(result, Err(PaycycleError::Storage(_))));
    }
}
