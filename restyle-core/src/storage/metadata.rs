//! JSON sidecars for exported images.
//!
//! The sidecar keeps the export's full file name and appends
//! `.metadata.json`, so `restyled-photo.png` and `restyled-photo.jpg` each
//! get their own.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::error::RestyleError;
use crate::models::export::ExportMetadata;

const SIDECAR_SUFFIX: &str = ".metadata.json";

/// Sidecar location for `export_path`, e.g. `restyled-photo.png.metadata.json`.
pub fn sidecar_path(export_path: &Path) -> PathBuf {
    let mut name = OsString::from(export_path.as_os_str());
    name.push(SIDECAR_SUFFIX);
    PathBuf::from(name)
}

/// Serialize `metadata` next to the exported image and return the sidecar path.
pub fn write_metadata(metadata: &ExportMetadata, export_path: &Path) -> Result<PathBuf, RestyleError> {
    let path = sidecar_path(export_path);
    let json = serde_json::to_vec_pretty(metadata)
        .map_err(|e| RestyleError::Storage(format!("failed to serialize export metadata: {}", e)))?;
    fs::write(&path, json)
        .map_err(|e| RestyleError::Storage(format!("failed to write {}: {}", path.display(), e)))?;
    log::debug!("metadata: wrote {}", path.display());
    Ok(path)
}

pub fn read_metadata(export_path: &Path) -> Result<ExportMetadata, RestyleError> {
    let path = sidecar_path(export_path);
    let bytes =
        fs::read(&path).map_err(|e| RestyleError::Storage(format!("failed to read {}: {}", path.display(), e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| RestyleError::Storage(format!("malformed export metadata in {}: {}", path.display(), e)))
}
