//! Orders returned by the Orders endpoint.
//!
//! Every declared field must be present in the vendor record. Nullable fields
//! use `Option`, but a missing key is still a deserialization error: the
//! `deserialize_with = "Option::deserialize"` attribute disables serde's
//! implicit `None` for absent `Option` fields.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::id::{BusinessId, DealId, MerchantId, OrderId};
use super::status::{OrderStatus, StatusUpdate};

/// A line item of an [`Order`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// The product's stock keeping unit.
    pub sku: String,
    /// Quantity ordered.
    pub quantity: u32,
    /// Product options selected by the customer. Empty when none.
    #[serde(deserialize_with = "string_or_empty")]
    pub options: String,
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Wowcher item {}", self.sku)
    }
}

/// A customer order for a deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Vendor's stable order identifier.
    pub id: OrderId,
    /// Line items, in the order the vendor lists them.
    pub items: Vec<Item>,

    /// Brand of the deal.
    #[serde(deserialize_with = "Option::deserialize")]
    pub brand: Option<String>,
    /// Merchant's business ID.
    #[serde(deserialize_with = "Option::deserialize")]
    pub business_id: Option<BusinessId>,
    /// Merchant's Wowcher ID.
    #[serde(deserialize_with = "Option::deserialize")]
    pub merchant_id: Option<MerchantId>,
    /// Deal the order belongs to.
    pub deal_id: DealId,
    /// Wowcher's reference code for the order. Used to address status updates.
    pub wowcher_code: String,
    /// Merchant-side reference, if one was attached.
    #[serde(deserialize_with = "Option::deserialize")]
    pub external_reference: Option<String>,
    /// Integration the order was routed through.
    #[serde(deserialize_with = "Option::deserialize")]
    pub integration_module: Option<String>,
    /// Warehouse key configured for the merchant.
    #[serde(deserialize_with = "Option::deserialize")]
    pub merchant_warehouse_key: Option<String>,
    /// Free-form custom item information.
    pub custom_field: serde_json::Value,

    // Money
    /// ISO 4217 currency code, e.g. `GBP`.
    #[serde(deserialize_with = "Option::deserialize")]
    pub currency: Option<String>,
    /// Price paid.
    #[serde(deserialize_with = "Option::deserialize")]
    pub price: Option<Decimal>,
    /// Full (undiscounted) price.
    #[serde(deserialize_with = "Option::deserialize")]
    pub full_price: Option<Decimal>,

    // Timestamps (Unix seconds)
    /// When the order was created.
    #[serde(deserialize_with = "Option::deserialize")]
    pub created_at: Option<i64>,
    /// When the order was last updated.
    #[serde(deserialize_with = "Option::deserialize")]
    pub updated_at: Option<i64>,
    /// When the voucher was redeemed.
    #[serde(deserialize_with = "Option::deserialize")]
    pub redeemed_at: Option<i64>,
    /// When the order was sent to the merchant.
    #[serde(deserialize_with = "Option::deserialize")]
    pub sent_at: Option<i64>,
    /// When the merchant marked the order received.
    #[serde(deserialize_with = "Option::deserialize")]
    pub received_at: Option<i64>,
    /// When the order was marked ready for dispatch.
    #[serde(deserialize_with = "Option::deserialize")]
    pub ready_for_despatch_at: Option<i64>,
    /// When the order was dispatched.
    #[serde(deserialize_with = "Option::deserialize")]
    pub despatched_at: Option<i64>,

    // Status notification flags
    /// Whether the received status has been reported.
    #[serde(deserialize_with = "flag")]
    pub received_at_sent: Option<bool>,
    /// Whether the ready-for-dispatch status has been reported.
    #[serde(deserialize_with = "flag")]
    pub ready_for_despatch_at_sent: Option<bool>,
    /// Whether the dispatched status has been reported.
    #[serde(deserialize_with = "flag")]
    pub despatched_at_sent: Option<bool>,
    /// Whether the customer receives shipping notifications.
    #[serde(deserialize_with = "flag")]
    pub notification_eligible: Option<bool>,

    // Delivery address
    /// Customer's title, e.g. `Mr`.
    #[serde(deserialize_with = "Option::deserialize")]
    pub delivery_title: Option<String>,
    /// Customer's first name.
    #[serde(deserialize_with = "Option::deserialize")]
    pub delivery_first_name: Option<String>,
    /// Customer's last name.
    #[serde(deserialize_with = "Option::deserialize")]
    pub delivery_last_name: Option<String>,
    /// First address line.
    #[serde(deserialize_with = "Option::deserialize")]
    pub delivery_line_1: Option<String>,
    /// Second address line.
    #[serde(deserialize_with = "Option::deserialize")]
    pub delivery_line_2: Option<String>,
    /// City.
    #[serde(deserialize_with = "Option::deserialize")]
    pub delivery_city: Option<String>,
    /// Postal or zip code.
    #[serde(deserialize_with = "Option::deserialize")]
    pub delivery_postcode: Option<String>,
    /// Country.
    #[serde(deserialize_with = "Option::deserialize")]
    pub delivery_country: Option<String>,
    /// Contact email address.
    #[serde(deserialize_with = "Option::deserialize")]
    pub delivery_email: Option<String>,
    /// Contact phone number.
    #[serde(deserialize_with = "Option::deserialize")]
    pub delivery_telephone: Option<String>,
    /// Delivery type requested by the customer.
    #[serde(deserialize_with = "Option::deserialize")]
    pub delivery_type: Option<String>,

    // Shipping
    /// Method used to ship the order.
    #[serde(deserialize_with = "Option::deserialize")]
    pub shipping_method: Option<String>,
    /// Carrier used to ship the order.
    #[serde(deserialize_with = "Option::deserialize")]
    pub shipping_vendor: Option<String>,
    /// Carrier tracking number.
    #[serde(deserialize_with = "Option::deserialize")]
    pub tracking_number: Option<String>,

    // Product
    /// Wowcher's reference code for the product.
    #[serde(deserialize_with = "Option::deserialize")]
    pub product_code: Option<String>,
    /// Name of the sold product.
    #[serde(deserialize_with = "Option::deserialize")]
    pub product_name: Option<String>,
    /// Comma-separated product options such as colour or size.
    #[serde(deserialize_with = "Option::deserialize")]
    pub product_options: Option<String>,
    /// Merchant SKU for the sold product.
    #[serde(deserialize_with = "Option::deserialize")]
    pub product_sku: Option<String>,
    /// Dispatch method configured for the product.
    #[serde(deserialize_with = "Option::deserialize")]
    pub product_despatch_method: Option<String>,
}

impl Order {
    /// The reference used to address this order in status updates.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.wowcher_code
    }

    /// Start a status update for this order.
    #[must_use]
    pub fn status_update(&self, status: OrderStatus) -> StatusUpdate {
        StatusUpdate::new(self.wowcher_code.clone(), status)
    }

    /// Total quantity across all items.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Wowcher Order {}", self.wowcher_code)
    }
}

/// Wire representations the vendor uses for boolean flags.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Int(i64),
    Text(String),
}

/// Required, nullable flag sent as a bool, `0`/`1`, or a string of either.
fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawFlag>::deserialize(deserializer)?;
    raw.map(|raw| match raw {
        RawFlag::Bool(value) => Ok(value),
        RawFlag::Int(value) => Ok(value != 0),
        RawFlag::Text(text) => match text.trim() {
            "1" | "true" => Ok(true),
            "0" | "false" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "invalid flag value: {other}"
            ))),
        },
    })
    .transpose()
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::{Value, json};

    use super::*;

    fn sample_order() -> Value {
        json!({
            "id": 1_234_567,
            "items": [
                {"sku": "SKU-RED-M", "quantity": 2, "options": "Red, M"},
                {"sku": "SKU-BLU-L", "quantity": 1, "options": null}
            ],
            "brand": "wowcher",
            "business_id": 10,
            "merchant_id": 20,
            "deal_id": 9_856_321,
            "wowcher_code": "8UPGT3-KKQRNC",
            "external_reference": null,
            "integration_module": "api",
            "merchant_warehouse_key": null,
            "custom_field": "",
            "currency": "GBP",
            "price": "19.99",
            "full_price": 39.99,
            "created_at": 1_546_300_800,
            "updated_at": 1_546_304_400,
            "redeemed_at": 1_546_300_900,
            "sent_at": null,
            "received_at": null,
            "ready_for_despatch_at": null,
            "despatched_at": null,
            "received_at_sent": 0,
            "ready_for_despatch_at_sent": false,
            "despatched_at_sent": "0",
            "notification_eligible": 1,
            "delivery_title": "Mr",
            "delivery_first_name": "John",
            "delivery_last_name": "Smith",
            "delivery_line_1": "1 High Street",
            "delivery_line_2": "",
            "delivery_city": "London",
            "delivery_postcode": "SW1A 1AA",
            "delivery_country": "GB",
            "delivery_email": "john@example.com",
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

    #[test]
    fn test_order_deserializes() {
        let order: Order = serde_json::from_value(sample_order()).expect("valid order");

        assert_eq!(order.id, OrderId::new(1_234_567));
        assert_eq!(order.deal_id, DealId::new(9_856_321));
        assert_eq!(order.price, Some(Decimal::new(1999, 2)));
        assert_eq!(order.full_price, Some(Decimal::new(3999, 2)));
        assert_eq!(order.received_at_sent, Some(false));
        assert_eq!(order.despatched_at_sent, Some(false));
        assert_eq!(order.notification_eligible, Some(true));
        assert_eq!(order.sent_at, None);
        assert_eq!(order.total_quantity(), 3);
    }

    #[test]
    fn test_items_keep_vendor_order() {
        let order: Order = serde_json::from_value(sample_order()).expect("valid order");

        let skus: Vec<&str> = order.items.iter().map(|item| item.sku.as_str()).collect();
        assert_eq!(skus, ["SKU-RED-M", "SKU-BLU-L"]);
        assert_eq!(order.items.get(1).map(|item| item.options.as_str()), Some(""));
    }

    #[test]
    fn test_missing_nullable_field_is_rejected() {
        let mut value = sample_order();
        value
            .as_object_mut()
            .expect("object")
            .remove("tracking_number");

        let err = serde_json::from_value::<Order>(value).expect_err("missing field");
        assert!(err.to_string().contains("tracking_number"));
    }

    #[test]
    fn test_missing_flag_is_rejected() {
        let mut value = sample_order();
        value
            .as_object_mut()
            .expect("object")
            .remove("notification_eligible");

        assert!(serde_json::from_value::<Order>(value).is_err());
    }

    #[test]
    fn test_missing_item_field_is_rejected() {
        let mut value = sample_order();
        value["items"] = json!([{"sku": "SKU-RED-M", "options": ""}]);

        let err = serde_json::from_value::<Order>(value).expect_err("missing quantity");
        assert!(err.to_string().contains("quantity"));
    }

    #[test]
    fn test_display() {
        let order: Order = serde_json::from_value(sample_order()).expect("valid order");
        assert_eq!(order.to_string(), "Wowcher Order 8UPGT3-KKQRNC");
        assert_eq!(
            order.items.first().map(ToString::to_string),
            Some("Wowcher item SKU-RED-M".to_string())
        );
    }

    #[test]
    fn test_status_update_uses_wowcher_code() {
        let order: Order = serde_json::from_value(sample_order()).expect("valid order");
        let update = order.status_update(OrderStatus::ReadyForDispatch);
        assert_eq!(update.reference, "8UPGT3-KKQRNC");
        assert_eq!(update.status, OrderStatus::ReadyForDispatch);
    }
}
