//! Orders endpoint.

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::Value;
use wowcher_core::DealId;

use super::ApiMethod;
use crate::error::Result;
use crate::transport::HttpResponse;

/// Date format used in Orders query parameters.
pub(crate) const QUERY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One page of orders for a deal.
///
/// All parameters are sent on every request; the response is returned
/// unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Orders {
    /// 1-based page number.
    pub page: u32,
    /// Orders per page.
    pub per_page: u32,
    /// Orders changed since this time.
    pub from_date: DateTime<Utc>,
    /// Lower bound on order date.
    pub start_date: DateTime<Utc>,
    /// Upper bound on order date.
    pub end_date: DateTime<Utc>,
    /// Deal the orders belong to.
    pub deal_id: DealId,
}

impl ApiMethod for Orders {
    const PATH: &'static str = "/v1/orders";
    const METHOD: Method = Method::GET;
    type Output = Value;

    fn query(&self) -> Vec<(String, String)> {
        let date = |d: &DateTime<Utc>| d.format(QUERY_DATE_FORMAT).to_string();
        vec![
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
            ("from_date".to_string(), date(&self.from_date)),
            ("start_date".to_string(), date(&self.start_date)),
            ("end_date".to_string(), date(&self.end_date)),
            ("deal_id".to_string(), self.deal_id.to_string()),
        ]
    }

    fn parse_response(response: &HttpResponse) -> Result<Value> {
        Ok(response.json()?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_query_carries_all_parameters() {
        let end = Utc.with_ymd_and_hms(2019, 3, 12, 9, 30, 0).single().expect("date");
        let start = Utc.with_ymd_and_hms(2019, 3, 11, 9, 30, 0).single().expect("date");
        let method = Orders {
            page: 2,
            per_page: 100,
            from_date: start,
            start_date: start,
            end_date: end,
            deal_id: DealId::new(9_856_321),
        };

        assert_eq!(
            method.query(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("per_page".to_string(), "100".to_string()),
                ("from_date".to_string(), "2019-03-11 09:30:00".to_string()),
                ("start_date".to_string(), "2019-03-11 09:30:00".to_string()),
                ("end_date".to_string(), "2019-03-12 09:30:00".to_string()),
                ("deal_id".to_string(), "9856321".to_string()),
            ]
        );
        assert_eq!(method.body().expect("body"), None);
    }
}
