//! Integration tests for the Wowcher client.
//!
//! Tests run the public operations end to end against [`MockTransport`], which
//! answers requests from a queue of canned responses and records every request
//! it receives. No network access or real credentials are needed.
//!
//! # Test Categories
//!
//! - `echo` - Echo test round trip
//! - `orders` - Paginated order collection
//! - `status` - Order status updates and validation
//! - `credentials` - Credentials file resolution through the client
#![recursion_limit = "256"]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{Value, json};
use wowcher::{
    Credentials, HttpRequest, HttpResponse, Session, Transport, TransportError, WowcherClient,
};

/// Deal used by the order fixtures.
pub const DEAL_ID: u64 = 9_856_321;

#[derive(Default)]
struct MockState {
    responses: VecDeque<HttpResponse>,
    requests: Vec<HttpRequest>,
}

/// Transport answering from a queue of responses and recording requests.
///
/// Clones share state, so a test can keep a handle after moving one into a
/// client. An empty queue answers `500`.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Create a transport with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response.
    pub fn push_json(&self, status: u16, body: &Value) {
        self.push_raw(status, body.to_string().into_bytes());
    }

    /// Queue a response with a raw body.
    pub fn push_raw(&self, status: u16, body: Vec<u8>) {
        self.lock().responses.push_back(HttpResponse {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body,
        });
    }

    /// Requests received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A poisoned lock only means another test thread panicked.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut state = self.lock();
        state.requests.push(request);
        Ok(state.responses.pop_front().unwrap_or_else(|| HttpResponse {
            status: 500,
            headers: Vec::new(),
            body: b"no response queued".to_vec(),
        }))
    }
}

/// Session holding single-environment credentials `k` / `s`.
#[must_use]
pub fn test_session() -> Session {
    Session::with_credentials(Credentials::single("k", "s"))
}

/// Client over a fresh [`MockTransport`], plus a handle to that transport.
#[must_use]
pub fn mock_client(session: Session) -> (WowcherClient<MockTransport>, MockTransport) {
    let transport = MockTransport::new();
    let client = WowcherClient::with_transport(transport.clone(), session);
    (client, transport)
}

/// A complete order record as returned by the Orders endpoint.
///
/// `n` makes the id and Wowcher code unique.
#[must_use]
pub fn order_record(n: u64) -> Value {
    json!({
        "id": 1_000_000 + n,
        "items": [
            {"sku": format!("SKU-{n}"), "quantity": 1, "options": "Red, M"}
        ],
        "brand": "wowcher",
        "business_id": 10,
        "merchant_id": 20,
        "deal_id": DEAL_ID,
        "wowcher_code": format!("CODE-{n:06}"),
        "external_reference": null,
        "integration_module": "api",
        "merchant_warehouse_key": null,
        "custom_field": null,
        "currency": "GBP",
        "price": "19.99",
        "full_price": "39.99",
        "created_at": 1_546_300_800,
        "updated_at": 1_546_304_400,
        "redeemed_at": 1_546_300_900,
        "sent_at": null,
        "received_at": null,
        "ready_for_despatch_at": null,
        "despatched_at": null,
        "received_at_sent": 0,
        "ready_for_despatch_at_sent": 0,
        "despatched_at_sent": 0,
        "notification_eligible": 1,
        "delivery_title": "Ms",
        "delivery_first_name": "Jane",
        "delivery_last_name": "Doe",
        "delivery_line_1": "1 High Street",
        "delivery_line_2": null,
        "delivery_city": "London",
        "delivery_postcode": "SW1A 1AA",
        "delivery_country": "GB",
        "delivery_email": "jane@example.com",
        "delivery_telephone": "07700900000",
        "delivery_type": "standard",
        "shipping_method": null,
        "shipping_vendor": null,
        "tracking_number": null,
        "product_code": "P-1",
        "product_name": "T-Shirt",
        "product_options": "Red, M",
        "product_sku": "TSHIRT",
        "product_despatch_method": "courier"
    })
}

/// An Orders response envelope.
#[must_use]
pub fn orders_page(current_page: u32, last_page: u32, records: Vec<Value>) -> Value {
    let count = records.len();
    json!({
        "message": "Orders",
        "data": {
            "total": count,
            "per_page": wowcher::PER_PAGE,
            "current_page": current_page,
            "last_page": last_page,
            "from": 1,
            "to": count,
            "data": records,
        }
    })
}

/// Page `page` of a result with `per_page` orders on every page.
#[must_use]
pub fn full_orders_page(page: u32, last_page: u32, per_page: u64) -> Value {
    let first = u64::from(page - 1) * per_page;
    let records = (first..first + per_page).map(order_record).collect();
    orders_page(page, last_page, records)
}
