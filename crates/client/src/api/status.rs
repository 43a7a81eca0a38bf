//! Order status endpoint.

use reqwest::Method;
use serde_json::{Value, json};

use super::ApiMethod;
use crate::error::Result;
use crate::transport::HttpResponse;

/// Batch of order-status updates, sent as `{"orders": [...]}`.
#[derive(Debug, Clone, Default)]
pub struct Status {
    /// Shaped status-update records.
    pub orders: Vec<Value>,
}

impl Status {
    /// Send `orders` as one batch.
    #[must_use]
    pub const fn new(orders: Vec<Value>) -> Self {
        Self { orders }
    }
}

impl ApiMethod for Status {
    const PATH: &'static str = "/v1/orders/status";
    const METHOD: Method = Method::PUT;
    type Output = Value;

    fn body(&self) -> Result<Option<Value>> {
        Ok(Some(json!({ "orders": self.orders })))
    }

    fn parse_response(response: &HttpResponse) -> Result<Value> {
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(response.json()?)
    }
}
