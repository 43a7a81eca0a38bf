//! Wowcher API endpoint definitions.
//!
//! Each endpoint is a type implementing [`ApiMethod`]: it declares its path and
//! verb, shapes its arguments into a query or JSON body, and interprets the
//! response body. Requests are sent with [`WowcherClient::call`].
//!
//! | Method | Verb | Path |
//! |--------|------|------|
//! | [`Echo`] | POST | `/v1/echo` |
//! | [`Orders`] | GET | `/v1/orders` |
//! | [`Status`] | PUT | `/v1/orders/status` |
//!
//! [`WowcherClient::call`]: crate::WowcherClient::call

mod echo;
mod orders;
mod status;

pub use echo::Echo;
pub use orders::Orders;
pub use status::Status;

use reqwest::Method;
use serde_json::Value;

use crate::error::Result;
use crate::transport::HttpResponse;

/// One vendor endpoint.
pub trait ApiMethod {
    /// Path relative to the base URL, with a leading slash.
    const PATH: &'static str;

    /// HTTP verb.
    const METHOD: Method;

    /// Value returned to the caller.
    type Output;

    /// Query parameters.
    fn query(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// JSON request body.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments cannot be encoded as JSON.
    fn body(&self) -> Result<Option<Value>> {
        Ok(None)
    }

    /// Interpret a successful response.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not JSON or lacks expected fields.
    fn parse_response(response: &HttpResponse) -> Result<Self::Output>;
}
