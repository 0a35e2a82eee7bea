use crate::models::image_models::EncodedImage;

/// Mints and revokes display URLs for source images.
///
/// Every URL returned by `create` is revoked exactly once by its owner.
pub trait ObjectUrlStore: Send + Sync {
    fn create(&self, image: &EncodedImage) -> String;

    fn revoke(&self, url: &str);
}
