//! Echo endpoint.

use reqwest::Method;
use serde_json::Value;

use super::ApiMethod;
use crate::error::{Result, WowcherError};
use crate::transport::HttpResponse;

/// Connectivity check: the vendor returns the message under `data`.
#[derive(Debug, Clone)]
pub struct Echo {
    /// Payload sent verbatim as the request body.
    pub message: Value,
}

impl Echo {
    /// Echo `message`.
    #[must_use]
    pub const fn new(message: Value) -> Self {
        Self { message }
    }
}

impl ApiMethod for Echo {
    const PATH: &'static str = "/v1/echo";
    const METHOD: Method = Method::POST;
    type Output = Value;

    fn body(&self) -> Result<Option<Value>> {
        Ok(Some(self.message.clone()))
    }

    fn parse_response(response: &HttpResponse) -> Result<Value> {
        let mut body: Value = response.json()?;
        match body.get_mut("data") {
            Some(data) => Ok(data.take()),
            None => Err(WowcherError::Structural(
                "echo response has no `data` field".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn response(body: &Value) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: serde_json::to_vec(body).expect("encode"),
        }
    }

    #[test]
    fn test_body_is_message_verbatim() {
        let message = json!({"one": "1", "two": "2"});
        let echo = Echo::new(message.clone());
        assert_eq!(echo.body().expect("body"), Some(message));
        assert!(echo.query().is_empty());
    }

    #[test]
    fn test_returns_data_field() {
        let message = json!({"one": "1", "two": "2"});
        let parsed = Echo::parse_response(&response(&json!({
            "message": "Echo test",
            "data": message,
        })))
        .expect("parse");
        assert_eq!(parsed, message);
    }

    #[test]
    fn test_missing_data_is_structural() {
        let result = Echo::parse_response(&response(&json!({"message": "Echo test"})));
        assert!(matches!(result, Err(WowcherError::Structural(_))));
    }

    #[test]
    fn test_non_json_body_is_json_error() {
        let result = Echo::parse_response(&HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: b"hello".to_vec(),
        });
        assert!(matches!(result, Err(WowcherError::Json(_))));
    }
}
