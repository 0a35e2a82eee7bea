use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::models::error::RestyleError;
use crate::models::image_models::EncodedImage;

/// Writes exported images into a target directory.
///
/// Files are named deterministically; a second export with the same name
/// overwrites the first.
pub struct ExportWriter {
    directory: PathBuf,
}

impl ExportWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Write `image` as `file_name`, returning the path and SHA-256 checksum.
    pub fn write(&self, file_name: &str, image: &EncodedImage) -> Result<(PathBuf, String), RestyleError> {
        fs::create_dir_all(&self.directory)
            .map_err(|e| RestyleError::Storage(format!("failed to create directory: {}", e)))?;

        let path = self.directory.join(file_name);
        let mut file =
            File::create(&path).map_err(|e| RestyleError::Storage(format!("failed to create file: {}", e)))?;
        file.write_all(image.payload())
            .map_err(|e| RestyleError::Storage(format!("write failed: {}", e)))?;
        file.flush().map_err(|e| RestyleError::Storage(e.to_string()))?;

        let checksum = sha256_file(&path)?;
        log::info!("exported {} ({} bytes)", path.display(), image.len());
        Ok((path, checksum))
    }
}

/// File extension for an image media type.
pub fn extension_for(media_type: &str) -> &'static str {
    match media_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}

/// Compute SHA-256 hex digest of a file.
fn sha256_file(path: &Path) -> Result<String, RestyleError> {
    let data = fs::read(path)
        .map_err(|e| RestyleError::Storage(format!("failed to read file for checksum: {}", e)))?;
    Ok(sha256_hex(&data))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
