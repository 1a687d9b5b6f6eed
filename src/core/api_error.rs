// src/core/api_error.rs
use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

use crate::types::ErrorBody;

/// Failures surfaced to the page layer. None of them are retried.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// 404, rendered as an empty / not-found state
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// Any other non-2xx response
    #[error("Request failed ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Not signed in. Run `careermade login` first")]
    Unauthenticated,

    /// A 2xx body that does not have the expected shape
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Rejected locally before upload
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// Map a non-2xx response to an error, pulling the backend's `message`.
    pub fn from_status(status: StatusCode, body: &str, resource: &str) -> Self {
        if status == StatusCode::NOT_FOUND {
            return ApiError::NotFound {
                resource: resource.to_string(),
            };
        }
        ApiError::Status {
            status: status.as_u16(),
            message: error_message(status, body),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthenticated)
            || matches!(self, ApiError::Status { status: 401, .. })
    }
}

/// `message` (or `error`) from a JSON body, else the raw text, else the reason phrase
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Some(message) = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
    {
        return message;
    }

    let text = body.trim();
    if !text.is_empty() && !text.starts_with('{') {
        return text.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string()
}
