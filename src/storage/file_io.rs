//! Whole-document persistence for the budget file
//!
//! The store keeps everything in one JSON document. Saving writes a sibling
//! `.json.tmp`, syncs it and renames it over the old document, so a crash
//! leaves either the previous budget or the new one on disk.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::BudgetError;

fn storage_error(action: &str, path: &Path, cause: impl std::fmt::Display) -> BudgetError {
    BudgetError::Storage(format!("could not {} {}: {}", action, path.display(), cause))
}

/// Load the document at `path`; a file that was never written yields
/// `T::default()`
pub fn read_json<T, P>(path: P) -> Result<T, BudgetError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(storage_error("open", path, e)),
    };

    serde_json::from_reader(BufReader::new(file)).map_err(|e| storage_error("decode", path, e))
}

/// Replace the document at `path` with `data`, creating parent directories
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), BudgetError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| storage_error("create", dir, e))?;
    }

    let staged = path.with_extension("json.tmp");
    let result = stage(&staged, data).and_then(|()| {
        fs::rename(&staged, path).map_err(|e| storage_error("replace", path, e))
    });
    if result.is_err() {
        let _ = fs::remove_file(&staged);
    }
    result
}

fn stage<T: Serialize>(staged: &Path, data: &T) -> Result<(), BudgetError> {
    let file = File::create(staged).map_err(|e| storage_error("create", staged, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data).map_err(|e| storage_error("encode", staged, e))?;
    writer.flush().map_err(|e| storage_error("flush", staged, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| storage_error("sync", staged, e))
}
