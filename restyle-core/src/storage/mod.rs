pub mod export_writer;
pub mod metadata;
pub mod object_urls;
