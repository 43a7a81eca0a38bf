//! API session: credentials, environment selection and base URL.
//!
//! A [`Session`] holds the live and staging key pairs, the `use_staging`
//! selection and an optional base URL override. Fields can be set explicitly
//! with [`Session::set_credentials`]; anything still unset is filled from the
//! nearest `wowcher_credentials.yaml` the first time credentials are needed.
//! Values already in memory always take precedence over the file.

use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error};
use wowcher_core::{ApiKeyPair, Credentials, Environment};

use crate::config::{
    self, ConfigError, ENV_BASE_URL, ENV_KEY, ENV_SECRET_TOKEN, ENV_STAGING_KEY,
    ENV_STAGING_SECRET_TOKEN, ENV_USE_STAGING,
};
use crate::error::{Result, WowcherError};

/// One environment's key and secret token, either of which may be unset.
#[derive(Clone, Default)]
struct KeySlot {
    key: Option<String>,
    secret_token: Option<SecretString>,
}

impl KeySlot {
    fn is_empty(&self) -> bool {
        self.key.is_none() && self.secret_token.is_none()
    }

    fn is_complete(&self) -> bool {
        self.key.as_deref().is_some_and(|key| !key.is_empty())
            && self
                .secret_token
                .as_ref()
                .is_some_and(|secret| !secret.expose_secret().is_empty())
    }

    /// Fill unset fields from a loaded key pair.
    fn fill_from(&mut self, pair: ApiKeyPair) {
        if self.key.is_none() {
            self.key = Some(pair.key);
        }
        if self.secret_token.is_none() {
            self.secret_token = Some(SecretString::from(pair.secret_token));
        }
    }

    fn to_pair(&self) -> Option<ApiKeyPair> {
        Some(ApiKeyPair::new(
            self.key.clone()?,
            self.secret_token.as_ref()?.expose_secret(),
        ))
    }
}

/// A partial credentials update.
///
/// Only fields that are set overwrite the session; the rest keep their value.
#[derive(Clone, Default)]
pub struct CredentialsUpdate {
    live_key: Option<String>,
    live_secret_token: Option<SecretString>,
    staging_key: Option<String>,
    staging_secret_token: Option<SecretString>,
    use_staging: Option<bool>,
}

impl CredentialsUpdate {
    /// An update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the live key pair.
    #[must_use]
    pub fn live(self, key: impl Into<String>, secret_token: impl Into<String>) -> Self {
        self.live_key(key).live_secret_token(secret_token)
    }

    /// Set the staging key pair.
    #[must_use]
    pub fn staging(self, key: impl Into<String>, secret_token: impl Into<String>) -> Self {
        self.staging_key(key).staging_secret_token(secret_token)
    }

    /// Set the live API key.
    #[must_use]
    pub fn live_key(mut self, key: impl Into<String>) -> Self {
        self.live_key = Some(key.into());
        self
    }

    /// Set the live secret token.
    #[must_use]
    pub fn live_secret_token(mut self, secret_token: impl Into<String>) -> Self {
        self.live_secret_token = Some(SecretString::from(secret_token.into()));
        self
    }

    /// Set the staging API key.
    #[must_use]
    pub fn staging_key(mut self, key: impl Into<String>) -> Self {
        self.staging_key = Some(key.into());
        self
    }

    /// Set the staging secret token.
    #[must_use]
    pub fn staging_secret_token(mut self, secret_token: impl Into<String>) -> Self {
        self.staging_secret_token = Some(SecretString::from(secret_token.into()));
        self
    }

    /// Select the staging (`true`) or live (`false`) host.
    #[must_use]
    pub const fn use_staging(mut self, use_staging: bool) -> Self {
        self.use_staging = Some(use_staging);
        self
    }
}

impl From<Credentials> for CredentialsUpdate {
    fn from(credentials: Credentials) -> Self {
        match credentials {
            Credentials::Single(pair) => Self::new().live(pair.key, pair.secret_token),
            Credentials::Dual {
                live,
                staging,
                use_staging,
            } => {
                let mut update = Self::new()
                    .live(live.key, live.secret_token)
                    .staging(staging.key, staging.secret_token);
                update.use_staging = use_staging;
                update
            }
        }
    }
}

impl std::fmt::Debug for CredentialsUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsUpdate")
            .field("live_key", &self.live_key)
            .field("staging_key", &self.staging_key)
            .field("use_staging", &self.use_staging)
            .finish_non_exhaustive()
    }
}

/// The key pair requests are currently signed with.
#[derive(Clone)]
pub struct ActiveCredentials {
    /// Environment the key pair belongs to.
    pub environment: Environment,
    /// API key.
    pub key: String,
    /// API secret token.
    pub secret_token: SecretString,
}

impl ActiveCredentials {
    /// Value of the `Authorization` header: `base64("{key}:{secret_token}")`.
    #[must_use]
    pub fn authorization(&self) -> String {
        let auth_string = format!("{}:{}", self.key, self.secret_token.expose_secret());
        STANDARD.encode(auth_string.as_bytes())
    }
}

impl std::fmt::Debug for ActiveCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveCredentials")
            .field("environment", &self.environment)
            .field("key", &self.key)
            .field("secret_token", &"[REDACTED]")
            .finish()
    }
}

/// Credentials and host selection for API requests.
///
/// Implements `Debug` manually to redact secret tokens.
#[derive(Clone, Default)]
pub struct Session {
    live: KeySlot,
    staging: KeySlot,
    use_staging: Option<bool>,
    base_url: Option<String>,
    search_dir: Option<PathBuf>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("live_key", &self.live.key)
            .field("staging_key", &self.staging.key)
            .field("secret_tokens", &"[REDACTED]")
            .field("use_staging", &self.use_staging)
            .field("base_url", &self.base_url)
            .field("search_dir", &self.search_dir)
            .finish()
    }
}

impl Session {
    /// Create an empty session. Credentials are loaded from file on first use.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session holding the given credentials.
    #[must_use]
    pub fn with_credentials(credentials: Credentials) -> Self {
        let mut session = Self::new();
        session.set_credentials(credentials.into());
        session
    }

    /// Create a session from `WOWCHER_*` environment variables.
    ///
    /// See [`crate::config`] for the variables read. Unset variables leave the
    /// corresponding field unset so it can still come from the credentials file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for a malformed `WOWCHER_USE_STAGING`
    /// and `ConfigError::InvalidBaseUrl` for a malformed `WOWCHER_BASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create a session from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Session::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut update = CredentialsUpdate::new();
        if let Some(key) = get(ENV_KEY) {
            update = update.live_key(key);
        }
        if let Some(secret) = get(ENV_SECRET_TOKEN) {
            update = update.live_secret_token(secret);
        }
        if let Some(key) = get(ENV_STAGING_KEY) {
            update = update.staging_key(key);
        }
        if let Some(secret) = get(ENV_STAGING_SECRET_TOKEN) {
            update = update.staging_secret_token(secret);
        }
        if let Some(value) = get(ENV_USE_STAGING) {
            update = update.use_staging(config::parse_bool_env(ENV_USE_STAGING, &value)?);
        }

        let mut session = Self::new();
        session.set_credentials(update);

        match get(ENV_BASE_URL) {
            Some(base_url) => session.with_base_url(&base_url),
            None => Ok(session),
        }
    }

    /// Send requests to `base_url` instead of the environment's host.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if `base_url` is not an absolute URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        let parsed = url::Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(base_url.to_string(), e.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl(
                base_url.to_string(),
                "not a base URL".to_string(),
            ));
        }
        self.base_url = Some(parsed.as_str().trim_end_matches('/').to_string());
        Ok(self)
    }

    /// Start the credentials file search from `dir` instead of the working directory.
    #[must_use]
    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dir = Some(dir.into());
        self
    }

    /// Overwrite the fields set in `update`; other fields keep their value.
    pub fn set_credentials(&mut self, update: CredentialsUpdate) {
        if let Some(key) = update.live_key {
            self.live.key = Some(key);
        }
        if let Some(secret) = update.live_secret_token {
            self.live.secret_token = Some(secret);
        }
        if let Some(key) = update.staging_key {
            self.staging.key = Some(key);
        }
        if let Some(secret) = update.staging_secret_token {
            self.staging.secret_token = Some(secret);
        }
        if let Some(use_staging) = update.use_staging {
            self.use_staging = Some(use_staging);
        }
    }

    /// Unset all credentials and the environment selection.
    ///
    /// The base URL override and search directory are kept.
    pub fn clear(&mut self) {
        self.live = KeySlot::default();
        self.staging = KeySlot::default();
        self.use_staging = None;
    }

    /// Environment requests are addressed to.
    ///
    /// A session without staging credentials and without a selection uses the
    /// live host.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EnvironmentNotSelected` when staging credentials
    /// are present but `use_staging` is unset.
    pub fn environment(&self) -> Result<Environment, ConfigError> {
        match self.use_staging {
            Some(use_staging) => Ok(Environment::from_use_staging(use_staging)),
            None if self.staging.is_empty() => Ok(Environment::Live),
            None => Err(ConfigError::EnvironmentNotSelected),
        }
    }

    /// Base URL requests are sent to, without a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EnvironmentNotSelected` if no override is set and
    /// the environment cannot be determined.
    pub fn base_url(&self) -> Result<String, ConfigError> {
        match &self.base_url {
            Some(base_url) => Ok(base_url.clone()),
            None => Ok(self.environment()?.base_url().to_string()),
        }
    }

    /// Credentials for the selected environment, loading the credentials file
    /// if they are not already in memory.
    ///
    /// Once credentials are complete, repeated calls do not touch the
    /// filesystem. The file search and read use `tokio::fs`.
    ///
    /// # Errors
    ///
    /// - `WowcherError::CredentialsNotFound` if nothing is in memory and no file exists
    /// - `WowcherError::Config` if the file is malformed or leaves the key pair incomplete
    pub async fn get_credentials(&mut self) -> Result<ActiveCredentials> {
        if let Some(active) = self.active()? {
            return Ok(active);
        }

        let search_dir = self.resolve_search_dir()?;
        let Some(path) = config::find_credentials_file(&search_dir).await else {
            error!(searched = %search_dir.display(), "Wowcher credentials file not found");
            return Err(WowcherError::CredentialsNotFound {
                searched: search_dir,
            });
        };

        let credentials = config::load_credentials_file(&path).await?;
        self.fill_unset(credentials);

        match self.active()? {
            Some(active) => {
                debug!(environment = %active.environment, "Credentials resolved");
                Ok(active)
            }
            None => Err(self.missing_credential()?.into()),
        }
    }

    /// Snapshot of the credentials currently held in memory.
    ///
    /// Returns `None` if the live key pair is incomplete.
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        let live = self.live.to_pair()?;
        match self.staging.to_pair() {
            Some(staging) => Some(Credentials::Dual {
                live,
                staging,
                use_staging: self.use_staging,
            }),
            None => Some(Credentials::Single(live)),
        }
    }

    /// Credentials for the selected environment if they are complete.
    fn active(&self) -> Result<Option<ActiveCredentials>, ConfigError> {
        let environment = match self.environment() {
            Ok(environment) => environment,
            // Staging keys without a selection may still be completed from file.
            Err(ConfigError::EnvironmentNotSelected) => return Ok(None),
            Err(e) => return Err(e),
        };
        let slot = match environment {
            Environment::Live => &self.live,
            Environment::Staging => &self.staging,
        };

        if !slot.is_complete() {
            return Ok(None);
        }

        Ok(Some(ActiveCredentials {
            environment,
            key: slot.key.clone().unwrap_or_default(),
            secret_token: slot
                .secret_token
                .clone()
                .unwrap_or_else(|| SecretString::from(String::new())),
        }))
    }

    /// The first missing piece after loading, for error reporting.
    fn missing_credential(&self) -> Result<ConfigError, ConfigError> {
        let slot = match self.environment()? {
            Environment::Live => &self.live,
            Environment::Staging => &self.staging,
        };
        let missing = if slot.key.as_deref().is_none_or(str::is_empty) {
            "key"
        } else {
            "secret_token"
        };
        Ok(ConfigError::MissingCredential(missing))
    }

    fn fill_unset(&mut self, credentials: Credentials) {
        match credentials {
            Credentials::Single(pair) => self.live.fill_from(pair),
            Credentials::Dual {
                live,
                staging,
                use_staging,
            } => {
                self.live.fill_from(live);
                self.staging.fill_from(staging);
                if self.use_staging.is_none() {
                    self.use_staging = use_staging;
                }
            }
        }
    }

    fn resolve_search_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.search_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().map_err(|source| ConfigError::Io {
                path: PathBuf::from("."),
                source,
            }),
        }
    }
}
