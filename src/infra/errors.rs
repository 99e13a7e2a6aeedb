// src/infra/errors.rs — Error types for the ShareTunes client

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    // Transport errors (never retried)
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Network error calling {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Backend answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    /// The access token was rejected and could not be refreshed.
    /// Stored tokens have already been cleared when this is returned.
    #[error("Session expired. Sign in again with `sharetunes login`.")]
    SessionExpired,

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Token storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Classify a reqwest transport failure.
    pub(crate) fn transport(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            ApiError::Timeout {
                url: url.to_string(),
            }
        } else {
            ApiError::Network {
                url: url.to_string(),
                source,
            }
        }
    }

    /// HTTP status of the failed call, if the backend answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed token file ({0}). Run `sharetunes logout` to reset it.")]
    Malformed(#[from] serde_json::Error),

    #[error("Token store lock poisoned")]
    Poisoned,
}
