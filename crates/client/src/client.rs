//! Wowcher API client and request executor.

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument};
use wowcher_core::Credentials;

use crate::api::ApiMethod;
use crate::config::ConfigError;
use crate::error::{Result, WowcherError};
use crate::session::{CredentialsUpdate, Session};
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

/// Wowcher redemption API client.
///
/// Owns a [`Session`] and a [`Transport`]. Cloning is cheap and clones share
/// the same session, so credentials set through one clone are seen by all.
///
/// # Example
///
/// ```rust,ignore
/// use wowcher::{CredentialsUpdate, OrderDates, WowcherClient};
/// use wowcher_core::DealId;
///
/// let client = WowcherClient::new();
/// client
///     .set_credentials(CredentialsUpdate::new().live("key", "secret"))
///     .await;
/// let orders = client.get_orders(DealId::new(9_856_321), OrderDates::default()).await?;
/// ```
pub struct WowcherClient<T = ReqwestTransport> {
    inner: Arc<WowcherClientInner<T>>,
}

struct WowcherClientInner<T> {
    transport: T,
    session: RwLock<Session>,
}

impl<T> Clone for WowcherClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl WowcherClient {
    /// Create a client with an empty session.
    ///
    /// Credentials are loaded from `wowcher_credentials.yaml` on the first request
    /// unless set with [`WowcherClient::set_credentials`] beforehand.
    #[must_use]
    pub fn new() -> Self {
        Self::with_session(Session::new())
    }

    /// Create a client around an existing session.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self::with_transport(ReqwestTransport::new(), session)
    }

    /// Create a client configured from `WOWCHER_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::with_session(Session::from_env()?))
    }
}

impl Default for WowcherClient {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> WowcherClient<T> {
    /// Create a client that sends requests through `transport`.
    #[must_use]
    pub fn with_transport(transport: T, session: Session) -> Self {
        Self {
            inner: Arc::new(WowcherClientInner {
                transport,
                session: RwLock::new(session),
            }),
        }
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Overwrite the credential fields set in `update`.
    pub async fn set_credentials(&self, update: CredentialsUpdate) {
        self.inner.session.write().await.set_credentials(update);
    }

    /// Unset all credentials. The next request reloads them from file.
    pub async fn clear_credentials(&self) {
        self.inner.session.write().await.clear();
    }

    /// Credentials currently held in memory, if the live pair is complete.
    pub async fn credentials(&self) -> Option<Credentials> {
        self.inner.session.read().await.credentials()
    }

    /// Apply an arbitrary change to the session.
    pub async fn update_session<F>(&self, f: F)
    where
        F: FnOnce(&mut Session),
    {
        f(&mut *self.inner.session.write().await);
    }

    /// Full URL of an API method for the current session.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EnvironmentNotSelected` if the host cannot be
    /// determined.
    pub async fn url_for<M: ApiMethod>(&self) -> Result<String> {
        let base_url = self.inner.session.read().await.base_url()?;
        Ok(format!("{base_url}{}", M::PATH))
    }

    // =========================================================================
    // Request Execution
    // =========================================================================

    /// Send one API method and interpret its response.
    ///
    /// # Errors
    ///
    /// Returns any error from [`WowcherClient::execute`] or from the method's
    /// response parsing.
    pub async fn call<M: ApiMethod + Sync>(&self, method: &M) -> Result<M::Output> {
        let response = self
            .execute(M::METHOD, M::PATH, method.body()?, method.query())
            .await?;
        M::parse_response(&response)
    }

    /// Send one authenticated request.
    ///
    /// Credentials are resolved first, so a missing credentials file fails
    /// before anything is sent.
    ///
    /// # Errors
    ///
    /// - `WowcherError::CredentialsNotFound` / `WowcherError::Config` if credentials cannot be resolved
    /// - `WowcherError::Transport` if the request cannot be sent
    /// - `WowcherError::Http` for a non-2xx response
    #[instrument(skip(self, body, query))]
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        query: Vec<(String, String)>,
    ) -> Result<HttpResponse> {
        let (base_url, credentials) = {
            // Held across the file load so concurrent first calls read it once.
            let mut session = self.inner.session.write().await;
            let credentials = session.get_credentials().await?;
            (session.base_url()?, credentials)
        };

        let url = format!("{base_url}{path}");
        info!(%url, "Sending Wowcher API request");
        if let Some(body) = &body {
            debug!(%body, "Request body");
        }

        let request = HttpRequest {
            method,
            url,
            query,
            headers: vec![
                ("Authorization".to_string(), credentials.authorization()),
                ("Accept".to_string(), "application/json".to_string()),
            ],
            body,
        };

        let response = self.inner.transport.send(request).await?;
        debug!(status = response.status, body = %response.text(), "Received Wowcher API response");

        if !response.is_success() {
            let body = response.text();
            error!(status = response.status, %body, "Wowcher API request failed");
            return Err(WowcherError::Http {
                status: response.status,
                body,
            });
        }

        Ok(response)
    }
}
