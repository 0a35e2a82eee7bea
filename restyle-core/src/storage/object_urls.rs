use std::collections::HashMap;

use parking_lot::Mutex;

use crate::models::image_models::EncodedImage;
use crate::traits::url_store::ObjectUrlStore;

/// Self-contained `data:` URLs. Nothing is held, so revocation is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct DataUrlStore;

impl ObjectUrlStore for DataUrlStore {
    fn create(&self, image: &EncodedImage) -> String {
        image.to_data_url()
    }

    fn revoke(&self, _url: &str) {}
}

/// In-memory `blob:` URL registry.
///
/// Images stay resolvable until revoked, mirroring browser object URLs.
#[derive(Debug)]
pub struct BlobUrlStore {
    origin: String,
    entries: Mutex<HashMap<String, EncodedImage>>,
}

impl BlobUrlStore {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn resolve(&self, url: &str) -> Option<EncodedImage> {
        self.entries.lock().get(url).cloned()
    }

    /// Number of URLs created and not yet revoked.
    pub fn live_count(&self) -> usize {
        self.entries.lock().len()
    }
}

impl Default for BlobUrlStore {
    fn default() -> Self {
        Self::new("restyle")
    }
}

impl ObjectUrlStore for BlobUrlStore {
    fn create(&self, image: &EncodedImage) -> String {
        let url = format!("blob:{}/{}", self.origin, uuid::Uuid::new_v4());
        self.entries.lock().insert(url.clone(), image.clone());
        url
    }

    fn revoke(&self, url: &str) {
        if self.entries.lock().remove(url).is_none() {
            log::debug!("object url {} was not live", url);
        }
    }
}
