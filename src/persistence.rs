// File: src/persistence.rs
//! Binary snapshot cache. A built [`Vocabulary`](crate::core::vocabulary::Vocabulary)
//! is written here so the next start can skip parsing and re-tiering.

use crate::error::RankerError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes `value` next to `path` and renames it into place, so a crash
/// mid-write never leaves a truncated cache behind.
pub fn save_to_disk<T: Serialize>(value: &T, path: &Path) -> Result<(), RankerError> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        bincode::serialize_into(&mut writer, value)?;
        writer.flush()?;
    }
    temp_file.persist(path).map_err(|e| e.error)?;
    tracing::debug!(path = %path.display(), "snapshot saved");
    Ok(())
}

pub fn load_from_disk<T: DeserializeOwned>(path: &Path) -> Result<T, RankerError> {
    let reader = BufReader::new(File::open(path)?);
    let value = bincode::deserialize_from(reader)?;
    tracing::debug!(path = %path.display(), "snapshot loaded");
    Ok(value)
}
