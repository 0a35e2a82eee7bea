use crate::models::catalog::StyleDirective;
use crate::models::config::SessionConfiguration;
use crate::models::error::RestyleError;
use crate::models::export::{ExportMetadata, ExportReceipt};
use crate::models::image_models::StyledResult;
use crate::storage::export_writer::{extension_for, ExportWriter};
use crate::storage::metadata;
use crate::traits::share_target::{ShareFile, SharePayload, ShareTarget};

/// Export operations over the current styled result.
///
/// Failures here are local: they are returned to the caller and never
/// alter session state.
pub struct ResultActions<'a> {
    config: &'a SessionConfiguration,
}

impl<'a> ResultActions<'a> {
    pub fn new(config: &'a SessionConfiguration) -> Self {
        Self { config }
    }

    /// Deterministic download name, e.g. `restyled-photo.png`.
    pub fn file_name_for(&self, result: &StyledResult) -> String {
        format!(
            "{}.{}",
            self.config.download_base_name.trim(),
            extension_for(result.media_type())
        )
    }

    /// Save the result into the export directory.
    pub fn download(
        &self,
        result: Option<&StyledResult>,
        directive: Option<&StyleDirective>,
    ) -> Result<ExportReceipt, RestyleError> {
        let result = result.ok_or(RestyleError::NothingToExport)?;
        let file_name = self.file_name_for(result);

        let writer = ExportWriter::new(&self.config.export_directory);
        let (file_path, checksum) = writer
            .write(&file_name, result.encoded())
            .inspect_err(|e| log::error!("download: {}", e))?;

        let metadata = if self.config.write_export_metadata {
            let metadata = ExportMetadata::new(
                &file_name,
                result.media_type(),
                result.encoded().len() as u64,
                &checksum,
                directive.map(|d| d.id.clone()),
            );
            let sidecar = metadata::write_metadata(&metadata, &file_path)?;
            log::info!("download: metadata at {}", sidecar.display());
            Some(metadata)
        } else {
            None
        };

        Ok(ExportReceipt {
            file_path,
            checksum,
            metadata,
        })
    }

    /// Package the result for the platform share sheet.
    pub fn share_payload(&self, result: &StyledResult) -> SharePayload {
        SharePayload {
            title: self.config.share_title.clone(),
            text: self.config.share_text.clone(),
            file: ShareFile {
                name: self.file_name_for(result),
                media_type: result.media_type().to_string(),
                bytes: result.payload().to_vec(),
            },
        }
    }

    /// Hand the result to the platform share capability.
    pub fn share(&self, target: Option<&dyn ShareTarget>, result: Option<&StyledResult>) -> Result<(), RestyleError> {
        let result = result.ok_or(RestyleError::NothingToExport)?;
        let target = match target {
            Some(target) if target.is_supported() => target,
            _ => {
                log::info!("share: platform has no share capability");
                return Err(RestyleError::ShareUnsupported);
            }
        };

        let payload = self.share_payload(result);
        if !target.can_share(&payload) {
            log::info!("share: platform cannot share {} files", payload.file.media_type);
            return Err(RestyleError::ShareUnsupported);
        }

        target.share(&payload).map_err(|reason| {
            log::warn!("share: {}", reason);
            RestyleError::ShareFailed(reason)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::models::image_models::EncodedImage;
    use crate::test_support::MockShare;

    fn result() -> StyledResult {
        StyledResult::new(EncodedImage::new(b"styled".to_vec(), "image/png"))
    }

    fn config(dir: &std::path::Path) -> SessionConfiguration {
        SessionConfiguration {
            export_directory: dir.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn download_uses_fixed_name() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let actions = ResultActions::new(&config);

        let receipt = actions.download(Some(&result()), None).unwrap();

        assert_eq!(receipt.file_path, dir.path().join("restyled-photo.png"));
        assert_eq!(fs::read(&receipt.file_path).unwrap(), b"styled");
        assert_eq!(receipt.checksum.len(), 64);
        assert!(receipt.metadata.is_none());
    }

    #[test]
    fn download_without_result_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let err = ResultActions::new(&config).download(None, None).unwrap_err();
        assert_eq!(err, RestyleError::NothingToExport);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn download_writes_metadata_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfiguration {
            write_export_metadata: true,
            ..config(dir.path())
        };
        let buzz = StyleDirective::new("buzz", "Buzz / Crew Cut", "buzz it");

        let receipt = ResultActions::new(&config).download(Some(&result()), Some(&buzz)).unwrap();

        assert!(dir.path().join("restyled-photo.png.metadata.json").exists());
        let stored = metadata::read_metadata(&receipt.file_path).unwrap();
        assert_eq!(Some(stored.clone()), receipt.metadata);
        assert_eq!(stored.directive_id.as_deref(), Some("buzz"));
        assert_eq!(stored.checksum, receipt.checksum);
        assert_eq!(stored.size_bytes, 6);
    }

    #[test]
    fn share_unsupported_without_target() {
        let config = SessionConfiguration::default();
        let actions = ResultActions::new(&config);

        assert_eq!(actions.share(None, Some(&result())), Err(RestyleError::ShareUnsupported));

        let unsupported = MockShare::new(false, Ok(()));
        assert_eq!(
            actions.share(Some(&unsupported), Some(&result())),
            Err(RestyleError::ShareUnsupported)
        );
        assert!(unsupported.shared.lock().is_empty());
    }

    #[test]
    fn share_sends_fixed_metadata() {
        let config = SessionConfiguration::default();
        let target = MockShare::new(true, Ok(()));

        ResultActions::new(&config).share(Some(&target), Some(&result())).unwrap();

        let shared = target.shared.lock();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].title, "My new look");
        assert_eq!(shared[0].file.name, "restyled-photo.png");
        assert_eq!(shared[0].file.media_type, "image/png");
        assert_eq!(shared[0].file.bytes, b"styled");
    }

    #[test]
    fn share_cancellation_is_share_failed() {
        let config = SessionConfiguration::default();
        let target = MockShare::new(true, Err("AbortError: share canceled".into()));

        let err = ResultActions::new(&config).share(Some(&target), Some(&result())).unwrap_err();
        assert_eq!(err.kind(), crate::models::error::ErrorKind::ShareFailed);
    }

    #[test]
    fn jpeg_results_get_jpg_extension() {
        let config = SessionConfiguration::default();
        let jpeg = StyledResult::new(EncodedImage::new(b"j".to_vec(), "image/jpeg"));
        assert_eq!(ResultActions::new(&config).file_name_for(&jpeg), "restyled-photo.jpg");
    }
}
