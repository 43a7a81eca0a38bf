//! Public operations: echo test, order collection and status updates.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};
use wowcher_core::{DealId, Order, OrderStatus, StatusUpdate};

use crate::api::{Echo, Status};
use crate::client::WowcherClient;
use crate::collector::OrderDates;
use crate::error::{Result, WowcherError};
use crate::transport::Transport;

impl<T: Transport> WowcherClient<T> {
    /// Send `message` to the echo endpoint and return what comes back.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials cannot be resolved, the request fails,
    /// or the response has no `data` field.
    #[instrument(skip_all)]
    pub async fn echo_test<M: Serialize + ?Sized>(&self, message: &M) -> Result<Value> {
        let message = serde_json::to_value(message)?;
        self.call(&Echo::new(message)).await
    }

    /// Fetch all orders for a deal.
    ///
    /// Unset dates default to the last 24 hours, measured from a single reading
    /// of the clock.
    ///
    /// # Errors
    ///
    /// Returns `WowcherError::Structural` if any page or order record is
    /// malformed, or any request error.
    pub async fn get_orders(&self, deal_id: DealId, dates: OrderDates) -> Result<Vec<Order>> {
        self.collect_orders(deal_id, dates.resolve(Utc::now())).await
    }

    /// Send order-status updates as one batch.
    ///
    /// Records may be [`StatusUpdate`] values or any other serializable value
    /// with the same fields, such as raw `serde_json::Value` objects. Every
    /// record is checked before anything is sent. Optional fields that are
    /// unset or `null` are left out of the request.
    ///
    /// # Errors
    ///
    /// Returns `WowcherError::Validation` for the first malformed record, or
    /// any request error.
    #[instrument(skip_all, fields(count = orders.len()))]
    pub async fn set_order_status<S: Serialize>(&self, orders: &[S]) -> Result<()> {
        let shaped = orders
            .iter()
            .enumerate()
            .map(|(index, record)| shape_status_record(index, record))
            .collect::<Result<Vec<_>>>()?;

        self.call(&Status::new(shaped)).await?;
        info!("Order statuses updated");
        Ok(())
    }
}

/// Validate one status record and return it as it will be sent.
fn shape_status_record<S: Serialize>(index: usize, record: &S) -> Result<Value> {
    let invalid = |reason: String| {
        warn!(index, %reason, "Rejected status update record");
        WowcherError::Validation { index, reason }
    };

    let value = serde_json::to_value(record).map_err(|e| invalid(e.to_string()))?;
    let Value::Object(fields) = &value else {
        return Err(invalid("record is not an object".to_string()));
    };
    for required in ["reference", "status"] {
        if fields.get(required).is_none_or(Value::is_null) {
            return Err(invalid(format!("missing required field `{required}`")));
        }
    }

    let update: StatusUpdate = serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;
    if update.reference.trim().is_empty() {
        return Err(invalid("`reference` is empty".to_string()));
    }

    serde_json::to_value(&update).map_err(|e| invalid(e.to_string()))
}

/// Build a status-update record.
///
/// Fields passed as `None` are omitted from the request.
#[must_use]
pub fn make_order_status(
    reference: impl Into<String>,
    status: OrderStatus,
    timestamp: Option<i64>,
    tracking_number: Option<String>,
    shipping_vendor: Option<String>,
    shipping_method: Option<String>,
) -> StatusUpdate {
    StatusUpdate {
        reference: reference.into(),
        status,
        timestamp,
        tracking_number,
        shipping_vendor,
        shipping_method,
    }
}
