/// A single file attached to a share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Everything handed to the platform share sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub file: ShareFile,
}

/// The platform's native share capability.
pub trait ShareTarget: Send + Sync {
    /// Whether the platform exposes a share capability at all.
    fn is_supported(&self) -> bool;

    /// Whether this particular payload (a file attachment) can be shared.
    fn can_share(&self, payload: &SharePayload) -> bool;

    /// Present the share sheet. User cancellation is reported as an error.
    fn share(&self, payload: &SharePayload) -> Result<(), String>;
}
