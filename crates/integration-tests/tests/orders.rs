//! Integration tests for paginated order collection.

use chrono::{TimeDelta, TimeZone, Utc};
use serde_json::json;
use wowcher::{OrderDates, WowcherError};
use wowcher_core::DealId;
use wowcher_integration_tests::{
    DEAL_ID, full_orders_page, mock_client, order_record, orders_page, test_session,
};

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_collects_every_page_in_order() {
    let (client, transport) = mock_client(test_session());
    for page in 1..=3 {
        transport.push_json(200, &full_orders_page(page, 3, 100));
    }

    let orders = client
        .get_orders(DealId::new(DEAL_ID), OrderDates::default())
        .await
        .expect("orders collected");

    assert_eq!(orders.len(), 300);
    for (n, order) in orders.iter().enumerate() {
        assert_eq!(order.wowcher_code, format!("CODE-{n:06}"));
    }

    let pages: Vec<_> = transport
        .requests()
        .iter()
        .map(|request| request.query_param("page").map(str::to_string))
        .collect();
    assert_eq!(
        pages,
        vec![
            Some("1".to_string()),
            Some("2".to_string()),
            Some("3".to_string())
        ]
    );
}

#[tokio::test]
async fn test_single_page_makes_one_request() {
    let (client, transport) = mock_client(test_session());
    transport.push_json(200, &orders_page(1, 1, vec![order_record(0), order_record(1)]));

    let orders = client
        .get_orders(DealId::new(DEAL_ID), OrderDates::default())
        .await
        .expect("orders collected");

    assert_eq!(orders.len(), 2);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_no_orders_returns_empty() {
    let (client, transport) = mock_client(test_session());
    transport.push_json(200, &orders_page(1, 1, Vec::new()));

    let orders = client
        .get_orders(DealId::new(DEAL_ID), OrderDates::default())
        .await
        .expect("orders collected");

    assert!(orders.is_empty());
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_page_count_comes_from_first_page() {
    let (client, transport) = mock_client(test_session());
    transport.push_json(200, &orders_page(1, 3, vec![order_record(0)]));
    transport.push_json(
        200,
        &json!({"message": "Orders", "data": {"current_page": 2, "data": [order_record(1)]}}),
    );
    transport.push_json(200, &orders_page(3, 7, vec![order_record(2)]));

    let orders = client
        .get_orders(DealId::new(DEAL_ID), OrderDates::default())
        .await
        .expect("orders collected");

    assert_eq!(orders.len(), 3);
    assert_eq!(orders.last().map(|order| order.wowcher_code.as_str()), Some("CODE-000002"));
    assert_eq!(transport.request_count(), 3);
}

// ============================================================================
// Query Parameters
// ============================================================================

#[tokio::test]
async fn test_query_parameters() {
    let (client, transport) = mock_client(test_session());
    transport.push_json(200, &orders_page(1, 1, Vec::new()));

    let end = Utc
        .with_ymd_and_hms(2019, 3, 12, 9, 30, 0)
        .single()
        .expect("valid date");
    let start = end - TimeDelta::days(7);
    let dates = OrderDates::default()
        .from_date(start)
        .start_date(start)
        .end_date(end);

    client
        .get_orders(DealId::new(DEAL_ID), dates)
        .await
        .expect("orders collected");

    let requests = transport.requests();
    let request = requests.first().expect("one request");
    assert_eq!(request.method, "GET");
    assert!(request.url.ends_with("/v1/orders"));
    assert_eq!(request.body, None);
    assert_eq!(request.query_param("page"), Some("1"));
    assert_eq!(request.query_param("per_page"), Some("100"));
    assert_eq!(request.query_param("deal_id"), Some("9856321"));
    assert_eq!(request.query_param("from_date"), Some("2019-03-05 09:30:00"));
    assert_eq!(request.query_param("start_date"), Some("2019-03-05 09:30:00"));
    assert_eq!(request.query_param("end_date"), Some("2019-03-12 09:30:00"));
}

#[tokio::test]
async fn test_default_dates_span_one_day() {
    let (client, transport) = mock_client(test_session());
    transport.push_json(200, &orders_page(1, 1, Vec::new()));

    client
        .get_orders(DealId::new(DEAL_ID), OrderDates::default())
        .await
        .expect("orders collected");

    let requests = transport.requests();
    let request = requests.first().expect("one request");
    let parse = |name| {
        let value = request.query_param(name).expect("date present");
        chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").expect("date format")
    };

    assert_eq!(parse("end_date") - parse("start_date"), TimeDelta::days(1));
    assert_eq!(parse("from_date"), parse("start_date"));
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_incomplete_record_aborts_collection() {
    let (client, transport) = mock_client(test_session());
    let mut broken = order_record(1);
    broken
        .as_object_mut()
        .expect("record is an object")
        .remove("delivery_city");
    transport.push_json(200, &orders_page(1, 2, vec![order_record(0)]));
    transport.push_json(200, &orders_page(2, 2, vec![broken]));

    let result = client
        .get_orders(DealId::new(DEAL_ID), OrderDates::default())
        .await;

    assert!(matches!(result, Err(WowcherError::Structural(_))));
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn test_missing_envelope_is_structural() {
    let (client, transport) = mock_client(test_session());
    transport.push_json(200, &json!({"message": "Orders"}));

    let result = client
        .get_orders(DealId::new(DEAL_ID), OrderDates::default())
        .await;

    assert!(matches!(result, Err(WowcherError::Structural(_))));
}

#[tokio::test]
async fn test_failed_page_propagates_http_error() {
    let (client, transport) = mock_client(test_session());
    transport.push_json(200, &full_orders_page(1, 2, 100));
    transport.push_raw(503, b"Service Unavailable".to_vec());

    let result = client
        .get_orders(DealId::new(DEAL_ID), OrderDates::default())
        .await;

    assert!(matches!(
        result,
        Err(WowcherError::Http { status: 503, .. })
    ));
}
