//! Paginated order collection.
//!
//! The Orders endpoint returns one page at a time inside an envelope:
//!
//! ```json
//! {"message": "...", "data": {"last_page": 3, "current_page": 1, "data": [...]}}
//! ```
//!
//! Page 1 is requested first and its `last_page` decides how many further
//! pages are fetched. Later pages are read for their records only; a
//! `last_page` on them is ignored. Pages are requested one after another so
//! the returned orders keep the vendor's order.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, instrument};
use wowcher_core::{DealId, Order};

use crate::api::Orders;
use crate::client::WowcherClient;
use crate::error::{Result, WowcherError};
use crate::transport::Transport;

/// Orders requested per page.
pub const PER_PAGE: u32 = 100;

/// Optional date filters for [`WowcherClient::get_orders`].
///
/// Unset dates default to the last 24 hours: `from_date` and `start_date`
/// one day ago, `end_date` now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderDates {
    /// Orders changed since this time.
    pub from_date: Option<DateTime<Utc>>,
    /// Lower bound on order date.
    pub start_date: Option<DateTime<Utc>>,
    /// Upper bound on order date.
    pub end_date: Option<DateTime<Utc>>,
}

impl OrderDates {
    /// Set `from_date`.
    #[must_use]
    pub const fn from_date(mut self, from_date: DateTime<Utc>) -> Self {
        self.from_date = Some(from_date);
        self
    }

    /// Set `start_date`.
    #[must_use]
    pub const fn start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Set `end_date`.
    #[must_use]
    pub const fn end_date(mut self, end_date: DateTime<Utc>) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Fill unset dates relative to `now`.
    #[must_use]
    pub fn resolve(self, now: DateTime<Utc>) -> ResolvedDates {
        let day_ago = now - TimeDelta::days(1);
        ResolvedDates {
            from_date: self.from_date.unwrap_or(day_ago),
            start_date: self.start_date.unwrap_or(day_ago),
            end_date: self.end_date.unwrap_or(now),
        }
    }
}

/// Date filters with every default applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDates {
    /// Orders changed since this time.
    pub from_date: DateTime<Utc>,
    /// Lower bound on order date.
    pub start_date: DateTime<Utc>,
    /// Upper bound on order date.
    pub end_date: DateTime<Utc>,
}

#[derive(Deserialize)]
struct OrdersEnvelope<P> {
    data: P,
}

/// Page 1: carries the page count.
#[derive(Deserialize)]
struct FirstPage {
    last_page: u32,
    data: Vec<Value>,
}

/// Pages 2 onwards: only the records are read.
#[derive(Deserialize)]
struct LaterPage {
    data: Vec<Value>,
}

/// Extract the page body from an Orders response.
fn parse_page<P: DeserializeOwned>(response: Value, page: u32) -> Result<P> {
    serde_json::from_value::<OrdersEnvelope<P>>(response)
        .map(|envelope| envelope.data)
        .map_err(|e| {
            error!(page, error = %e, "Unexpected Orders response envelope");
            WowcherError::Structural(format!("Orders page {page}: {e}"))
        })
}

/// Convert raw records into orders, appending them to `orders`.
fn materialize(records: Vec<Value>, page: u32, orders: &mut Vec<Order>) -> Result<()> {
    orders.reserve(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let order = serde_json::from_value::<Order>(record).map_err(|e| {
            error!(page, index, error = %e, "Order record could not be read");
            WowcherError::Structural(format!("Order {index} on page {page}: {e}"))
        })?;
        orders.push(order);
    }
    Ok(())
}

impl<T: Transport> WowcherClient<T> {
    /// Fetch every page of orders for a deal.
    ///
    /// Any malformed page or record aborts the collection; no partial result is
    /// returned.
    #[instrument(skip(self, dates), fields(deal_id = %deal_id))]
    pub(crate) async fn collect_orders(
        &self,
        deal_id: DealId,
        dates: ResolvedDates,
    ) -> Result<Vec<Order>> {
        let request = |page| Orders {
            page,
            per_page: PER_PAGE,
            from_date: dates.from_date,
            start_date: dates.start_date,
            end_date: dates.end_date,
            deal_id,
        };

        let first: FirstPage = parse_page(self.call(&request(1)).await?, 1)?;
        let last_page = first.last_page;
        debug!(last_page, "Fetched first page of orders");

        let mut orders = Vec::new();
        materialize(first.data, 1, &mut orders)?;

        for page in 2..=last_page {
            let response: LaterPage = parse_page(self.call(&request(page)).await?, page)?;
            debug!(page, count = response.data.len(), "Fetched page of orders");
            materialize(response.data, page, &mut orders)?;
        }

        info!(count = orders.len(), pages = last_page, "Collected orders");
        Ok(orders)
    }
}
