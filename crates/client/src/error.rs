//! Unified error handling for the Wowcher client.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::{CREDENTIALS_FILENAME, ConfigError};
use crate::transport::TransportError;

/// Errors returned by Wowcher client operations.
#[derive(Debug, Error)]
pub enum WowcherError {
    /// No credentials in memory and no credentials file up the directory tree.
    #[error(
        "Credentials not found: no {} in {} or any parent directory",
        CREDENTIALS_FILENAME,
        .searched.display()
    )]
    CredentialsNotFound {
        /// Directory the upward search started from.
        searched: PathBuf,
    },

    /// Credentials file or session settings are invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The vendor returned a non-2xx response.
    #[error("HTTP error: {status} - {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body as text.
        body: String,
    },

    /// A status-update record failed validation. Nothing was sent.
    #[error("Invalid order for status update at index {index}: {reason}")]
    Validation {
        /// Position of the offending record in the input.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// A vendor response did not have the expected structure.
    #[error("Unexpected response structure: {0}")]
    Structural(String),

    /// The request could not be sent or its response could not be read.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A successful response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for Wowcher client operations.
pub type Result<T, E = WowcherError> = std::result::Result<T, E>;
