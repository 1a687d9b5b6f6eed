//! Client core for the CareerMade healthcare job board: path-based form
//! drafts, session handling, registration checks and the REST API client.

pub mod auth;
pub mod cli;
pub mod core;
pub mod editor;
pub mod form;
pub mod types;
pub mod utils;
pub mod validation;

pub use auth::{Session, SessionStore};
pub use core::{ApiClient, ApiError, ConfigManager};
pub use editor::DraftEditor;
pub use form::{
    clear_at_path, read_at_path, set_at_path, toggle_array_member, FormDocument, FormPath,
};
