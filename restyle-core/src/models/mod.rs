pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod image_models;
pub mod state;
