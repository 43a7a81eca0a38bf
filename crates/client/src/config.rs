//! Credentials file discovery, loading and creation.
//!
//! Credentials live in `wowcher_credentials.yaml`, found by walking up from a
//! starting directory (the current working directory by default) until the
//! filesystem root. Two shapes are accepted:
//!
//! ```yaml
//! key: 0ff52fd6-7860-4f07-bab5-5fa74d3b98f0
//! secret_token: 16459c82-065a-4e51-b682-c784e404831d
//! ```
//!
//! ```yaml
//! live:
//!   key: 0ff52fd6-7860-4f07-bab5-5fa74d3b98f0
//!   secret_token: 16459c82-065a-4e51-b682-c784e404831d
//! staging:
//!   key: a5635153-cf96-4ecf-87b6-b80f0fa1a5ea
//!   secret_token: 220d4eb6-3c94-4f0c-b5e8-1befa1a8713c
//! use_staging: true
//! ```
//!
//! `use_staging` may be left out of the dual shape, in which case the
//! environment has to be selected in memory before a request is sent.
//!
//! # Environment Variables
//!
//! All optional, read by [`Session::from_env`](crate::Session::from_env):
//! - `WOWCHER_KEY` / `WOWCHER_SECRET_TOKEN` - Live key pair
//! - `WOWCHER_STAGING_KEY` / `WOWCHER_STAGING_SECRET_TOKEN` - Staging key pair
//! - `WOWCHER_USE_STAGING` - `true`/`false` (also `1`/`0`)
//! - `WOWCHER_BASE_URL` - Override the API host

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, info, instrument};
use wowcher_core::Credentials;

/// Name of the credentials file searched for.
pub const CREDENTIALS_FILENAME: &str = "wowcher_credentials.yaml";

pub(crate) const ENV_KEY: &str = "WOWCHER_KEY";
pub(crate) const ENV_SECRET_TOKEN: &str = "WOWCHER_SECRET_TOKEN";
pub(crate) const ENV_STAGING_KEY: &str = "WOWCHER_STAGING_KEY";
pub(crate) const ENV_STAGING_SECRET_TOKEN: &str = "WOWCHER_STAGING_SECRET_TOKEN";
pub(crate) const ENV_USE_STAGING: &str = "WOWCHER_USE_STAGING";
pub(crate) const ENV_BASE_URL: &str = "WOWCHER_BASE_URL";

/// Configuration errors that can occur while resolving credentials.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The credentials file could not be read or written.
    #[error("Failed to access credentials file {}: {source}", .path.display())]
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The credentials file matches neither credentials shape.
    #[error("Malformed credentials file {}: {source}", .path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Credentials could not be encoded as YAML.
    #[error("Failed to serialize credentials: {0}")]
    Serialize(#[source] serde_yaml::Error),

    /// The selected key pair is still incomplete after loading the file.
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    /// Staging credentials are present but `use_staging` is unset.
    #[error("Environment not selected: set use_staging to true or false")]
    EnvironmentNotSelected,

    /// An environment variable holds an unusable value.
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),

    /// The base URL override is not an absolute URL.
    #[error("Invalid base URL {0}: {1}")]
    InvalidBaseUrl(String, String),
}

/// Find the nearest credentials file at or above `start_dir`.
///
/// A relative `start_dir` is resolved against the current working directory
/// first, so the search always continues up to the filesystem root. An empty
/// path means the current working directory. Returns `None` once the root has
/// been checked without a match.
pub async fn find_credentials_file(start_dir: &Path) -> Option<PathBuf> {
    let start_dir = if start_dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        start_dir
    };
    let mut current =
        std::path::absolute(start_dir).unwrap_or_else(|_| start_dir.to_path_buf());

    loop {
        let candidate = current.join(CREDENTIALS_FILENAME);
        if tokio::fs::metadata(&candidate)
            .await
            .is_ok_and(|metadata| metadata.is_file())
        {
            debug!(path = %candidate.display(), "Credentials file found");
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => return None,
        }
    }
}

/// Load credentials from a file.
///
/// # Errors
///
/// Returns `ConfigError::Io` if the file cannot be read and
/// `ConfigError::Parse` if it does not match either credentials shape.
#[instrument(fields(path = %path.display()))]
pub async fn load_credentials_file(path: &Path) -> Result<Credentials, ConfigError> {
    info!("Loading API credentials");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    serde_yaml::from_str(&content).map_err(|source| {
        error!(error = %source, "Could not load credentials");
        ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Write credentials to `dir/wowcher_credentials.yaml`, replacing any existing file.
///
/// Returns the path written.
///
/// # Errors
///
/// Returns `ConfigError::Serialize` if the credentials cannot be encoded and
/// `ConfigError::Io` if the file cannot be written.
#[instrument(skip(credentials), fields(dir = %dir.display()))]
pub async fn create_credentials_file(
    dir: &Path,
    credentials: &Credentials,
) -> Result<PathBuf, ConfigError> {
    let path = dir.join(CREDENTIALS_FILENAME);
    let content = serde_yaml::to_string(credentials).map_err(ConfigError::Serialize)?;

    tokio::fs::write(&path, content)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;

    info!(path = %path.display(), "Credentials file written");
    Ok(path)
}

/// Parse a boolean environment value.
pub(crate) fn parse_bool_env(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            name.to_string(),
            format!("expected true or false, got {other:?}"),
        )),
    }
}
