//! File I/O for table files
//!
//! Writes go to a sibling temp file that is synced and then renamed over the
//! target, so a table file is either the old or the new version on disk.
//! Every write gets its own temp file, so concurrent writers never share one.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::error::LedgerError;

fn storage_error(action: &str, path: &Path, err: impl std::fmt::Display) -> LedgerError {
    LedgerError::Storage(format!("Failed to {} {}: {}", action, path.display(), err))
}

/// Fresh temp file used while writing `path`
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
    path.with_file_name(name)
}

/// Read JSON from a file; a missing file yields the default value
///
/// A file that exists but does not parse is an error, never silently empty.
pub fn read_json<T, P>(path: P) -> Result<T, LedgerError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path).map_err(|e| storage_error("open", path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| storage_error("parse", path, e))
}

/// Write JSON to a file atomically (write to temp, sync, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), LedgerError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_error("create directory", parent, e))?;
    }

    let temp_path = temp_path_for(path);
    let written = write_temp(&temp_path, path, data)
        .and_then(|()| fs::rename(&temp_path, path).map_err(|e| storage_error("replace", path, e)));
    if written.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    written
}

fn write_temp<T: Serialize>(temp_path: &Path, path: &Path, data: &T) -> Result<(), LedgerError> {
    let file = File::create(temp_path).map_err(|e| storage_error("create", temp_path, e))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| storage_error("serialize", path, e))?;
    writer
        .flush()
        .map_err(|e| storage_error("flush", temp_path, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| storage_error("sync", temp_path, e))
}
