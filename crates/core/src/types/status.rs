//! Order-status updates pushed back to the vendor.
//!
//! The Status endpoint accepts a batch of [`StatusUpdate`] records. Each record
//! addresses one order by its Wowcher code and moves it to a new
//! [`OrderStatus`]. Optional shipping details are omitted from the payload
//! when unset.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fulfillment status of an order as understood by the vendor.
///
/// Serialized as its integer wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OrderStatus {
    /// The merchant has received the order.
    ReceivedByMerchant,
    /// The order is packed and waiting for the carrier.
    ReadyForDispatch,
    /// The order has been handed to the carrier.
    Dispatched,
}

/// A status code outside the vendor's known set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid order status code {0}, expected 0, 1 or 2")]
pub struct InvalidStatusCode(pub u8);

impl OrderStatus {
    /// Integer code sent on the wire.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::ReceivedByMerchant => 0,
            Self::ReadyForDispatch => 1,
            Self::Dispatched => 2,
        }
    }
}

impl TryFrom<u8> for OrderStatus {
    type Error = InvalidStatusCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::ReceivedByMerchant),
            1 => Ok(Self::ReadyForDispatch),
            2 => Ok(Self::Dispatched),
            other => Err(InvalidStatusCode(other)),
        }
    }
}

impl From<OrderStatus> for u8 {
    fn from(status: OrderStatus) -> Self {
        status.code()
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReceivedByMerchant => write!(f, "RECEIVED_BY_MERCHANT"),
            Self::ReadyForDispatch => write!(f, "READY_FOR_DISPATCH"),
            Self::Dispatched => write!(f, "DISPATCHED"),
        }
    }
}

/// One record of a Status request.
///
/// `reference` and `status` are required; the remaining fields are only
/// serialized when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Wowcher code of the order, e.g. `8UPGT3-KKQRNC`.
    pub reference: String,
    /// New status of the order.
    pub status: OrderStatus,
    /// Unix timestamp of the change. The vendor uses the request time when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// Courier supplied tracking number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    /// Courier used to ship the order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_vendor: Option<String>,
    /// Courier service used to ship the order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_method: Option<String>,
}

impl StatusUpdate {
    /// Create an update carrying only the required fields.
    #[must_use]
    pub fn new(reference: impl Into<String>, status: OrderStatus) -> Self {
        Self {
            reference: reference.into(),
            status,
            timestamp: None,
            tracking_number: None,
            shipping_vendor: None,
            shipping_method: None,
        }
    }

    /// Set the time of the status change.
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set the tracking number.
    #[must_use]
    pub fn with_tracking_number(mut self, tracking_number: impl Into<String>) -> Self {
        self.tracking_number = Some(tracking_number.into());
        self
    }

    /// Set the shipping vendor.
    #[must_use]
    pub fn with_shipping_vendor(mut self, shipping_vendor: impl Into<String>) -> Self {
        self.shipping_vendor = Some(shipping_vendor.into());
        self
    }

    /// Set the shipping method.
    #[must_use]
    pub fn with_shipping_method(mut self, shipping_method: impl Into<String>) -> Self {
        self.shipping_method = Some(shipping_method.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(OrderStatus::ReceivedByMerchant.code(), 0);
        assert_eq!(OrderStatus::ReadyForDispatch.code(), 1);
        assert_eq!(OrderStatus::Dispatched.code(), 2);
        assert_eq!(OrderStatus::try_from(2), Ok(OrderStatus::Dispatched));
        assert_eq!(OrderStatus::try_from(3), Err(InvalidStatusCode(3)));
    }

    #[test]
    fn test_status_serializes_as_integer() {
        let value = serde_json::to_value(OrderStatus::ReadyForDispatch).expect("serialize");
        assert_eq!(value, json!(1));

        let parsed: Result<OrderStatus, _> = serde_json::from_value(json!(7));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_update_omits_unset_fields() {
        let update = StatusUpdate::new("8UPGT3-KKQRNC", OrderStatus::Dispatched);
        let value = serde_json::to_value(&update).expect("serialize");
        assert_eq!(value, json!({"reference": "8UPGT3-KKQRNC", "status": 2}));
    }

    #[test]
    fn test_update_includes_set_fields() {
        let update = StatusUpdate::new("8UPGT3-KKQRNC", OrderStatus::Dispatched)
            .with_timestamp(1_234_567_890)
            .with_tracking_number("JD1233230001012")
            .with_shipping_vendor("ROYAL_MAIL")
            .with_shipping_method("NEXT_DAY");
        let value = serde_json::to_value(&update).expect("serialize");
        assert_eq!(
            value,
            json!({
                "reference": "8UPGT3-KKQRNC",
                "status": 2,
                "timestamp": 1_234_567_890,
                "tracking_number": "JD1233230001012",
                "shipping_vendor": "ROYAL_MAIL",
                "shipping_method": "NEXT_DAY",
            })
        );
    }

    #[test]
    fn test_update_treats_null_as_absent() {
        let update: StatusUpdate = serde_json::from_value(json!({
            "reference": "ABC",
            "status": 0,
            "tracking_number": null,
        }))
        .expect("deserialize");
        assert_eq!(update.tracking_number, None);
        assert_eq!(update.status, OrderStatus::ReceivedByMerchant);
    }
}
