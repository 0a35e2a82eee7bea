pub mod camera_device;
pub mod session_delegate;
pub mod share_target;
pub mod transform_provider;
pub mod url_store;
