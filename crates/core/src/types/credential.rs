//! Credentials file shapes and environment selection.
//!
//! These types mirror `wowcher_credentials.yaml`. They carry plain strings so
//! they can be written back out; the client crate moves secret tokens into
//! `secrecy` wrappers as soon as they are loaded.

use serde::{Deserialize, Serialize};

/// Wowcher live API host.
pub const LIVE_BASE_URL: &str = "http://api.redemption.wowcher.co.uk";

/// Wowcher staging API host.
pub const STAGING_BASE_URL: &str = "http://api.staging.redemption.wowcher.co.uk";

/// Which vendor environment requests are addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Live,
    Staging,
}

impl Environment {
    /// Select an environment from a `use_staging` flag.
    #[must_use]
    pub const fn from_use_staging(use_staging: bool) -> Self {
        if use_staging { Self::Staging } else { Self::Live }
    }

    /// Base URL of the environment's API host.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Live => LIVE_BASE_URL,
            Self::Staging => STAGING_BASE_URL,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Staging => write!(f, "staging"),
        }
    }
}

/// An API key and its secret token.
///
/// Implements `Debug` manually to redact the secret token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyPair {
    /// Wowcher API key.
    pub key: String,
    /// Wowcher API secret token.
    pub secret_token: String,
}

impl ApiKeyPair {
    /// Create a key pair.
    #[must_use]
    pub fn new(key: impl Into<String>, secret_token: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret_token: secret_token.into(),
        }
    }
}

impl std::fmt::Debug for ApiKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyPair")
            .field("key", &self.key)
            .field("secret_token", &"[REDACTED]")
            .finish()
    }
}

/// Contents of a credentials file.
///
/// Either a single key pair, or a live and a staging pair plus the flag that
/// selects between them. The flag may be left unset or `null` in the file so
/// the selection can be made in memory instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Credentials {
    /// Separate live and staging key pairs.
    Dual {
        /// Key pair for the live host.
        live: ApiKeyPair,
        /// Key pair for the staging host.
        staging: ApiKeyPair,
        /// Address the staging host when true. Unset leaves the choice open.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        use_staging: Option<bool>,
    },
    /// One key pair, used against the live host.
    Single(ApiKeyPair),
}

impl Credentials {
    /// Single-environment credentials.
    #[must_use]
    pub fn single(key: impl Into<String>, secret_token: impl Into<String>) -> Self {
        Self::Single(ApiKeyPair::new(key, secret_token))
    }

    /// The key pair for the selected environment.
    ///
    /// Returns `None` for dual credentials without a `use_staging` selection.
    #[must_use]
    pub const fn active(&self) -> Option<(Environment, &ApiKeyPair)> {
        match self {
            Self::Dual {
                staging,
                use_staging: Some(true),
                ..
            } => Some((Environment::Staging, staging)),
            Self::Dual {
                live,
                use_staging: Some(false),
                ..
            } => Some((Environment::Live, live)),
            Self::Dual {
                use_staging: None, ..
            } => None,
            Self::Single(pair) => Some((Environment::Live, pair)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_environment_urls() {
        assert_eq!(Environment::Live.base_url(), LIVE_BASE_URL);
        assert_eq!(Environment::Staging.base_url(), STAGING_BASE_URL);
        assert_eq!(Environment::from_use_staging(true), Environment::Staging);
        assert_eq!(Environment::from_use_staging(false), Environment::Live);
    }

    #[test]
    fn test_single_shape() {
        let credentials: Credentials =
            serde_json::from_value(json!({"key": "k", "secret_token": "s"})).expect("single");
        assert_eq!(credentials, Credentials::single("k", "s"));
        assert_eq!(
            credentials.active().map(|(environment, _)| environment),
            Some(Environment::Live)
        );
    }

    #[test]
    fn test_dual_shape_selects_staging() {
        let credentials: Credentials = serde_json::from_value(json!({
            "live": {"key": "lk", "secret_token": "ls"},
            "staging": {"key": "sk", "secret_token": "ss"},
            "use_staging": true,
        }))
        .expect("dual");

        let (environment, pair) = credentials.active().expect("selected");
        assert_eq!(environment, Environment::Staging);
        assert_eq!(pair.key, "sk");
    }

    #[test]
    fn test_dual_shape_without_selection() {
        let pairs = json!({
            "live": {"key": "lk", "secret_token": "ls"},
            "staging": {"key": "sk", "secret_token": "ss"},
        });
        let mut with_null = pairs.clone();
        with_null["use_staging"] = serde_json::Value::Null;

        for value in [pairs, with_null] {
            let credentials: Credentials = serde_json::from_value(value).expect("dual");
            assert!(matches!(
                credentials,
                Credentials::Dual {
                    use_staging: None,
                    ..
                }
            ));
            assert!(credentials.active().is_none());
        }
    }

    #[test]
    fn test_malformed_shape_is_rejected() {
        assert!(serde_json::from_value::<Credentials>(json!("some text")).is_err());
        assert!(serde_json::from_value::<Credentials>(json!({"key": "k"})).is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", ApiKeyPair::new("k", "very-secret"));
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
