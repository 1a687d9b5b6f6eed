// src/core/mod.rs
//! Core services: configuration, HTTP access, file helpers, export

pub mod api_client;
pub mod api_error;
pub mod config_manager;
pub mod export;
pub mod fs_ops;

pub use api_client::{ApiClient, DocumentKind, PdfOutput};
pub use api_error::ApiError;
pub use config_manager::{ApiConfig, ConfigManager};
pub use fs_ops::FsOps;
