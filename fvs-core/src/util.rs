//! Small filesystem helpers shared by the manifest, catalog and state index.

use std::path::Path;

use serde::Serialize;

use crate::errors::FvsError;

/// Writes `value` as pretty JSON to `path` via a sibling temp file plus
/// rename, so a crash never leaves a half-written manifest, catalog, or
/// state index behind.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), FvsError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    serde_json::to_writer_pretty(&mut tmp, value)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, FvsError> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}
