use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Outcome of a successful download.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReceipt {
    pub file_path: PathBuf,
    pub checksum: String,
    pub metadata: Option<ExportMetadata>,
}

/// Metadata stored alongside an exported image.
///
/// Serializable as a JSON sidecar next to the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub id: String,
    pub file_name: String,
    pub media_type: String,
    pub size_bytes: u64,
    pub checksum: String,
    pub directive_id: Option<String>,
    pub created_at: String,
}

impl ExportMetadata {
    pub fn new(
        file_name: &str,
        media_type: &str,
        size_bytes: u64,
        checksum: &str,
        directive_id: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            file_name: file_name.to_string(),
            media_type: media_type.to_string(),
            size_bytes,
            checksum: checksum.to_string(),
            directive_id,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
