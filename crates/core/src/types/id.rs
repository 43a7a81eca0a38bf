//! Newtype IDs for type-safe vendor references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally passing a merchant ID where a deal ID is expected.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `u64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_u64()`
/// - `From<u64>` and `Into<u64>` implementations
///
/// # Example
///
/// ```rust
/// # use wowcher_core::define_id;
/// define_id!(CampaignId);
/// define_id!(VoucherId);
///
/// let campaign = CampaignId::new(1);
/// let voucher = VoucherId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: CampaignId = voucher;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Create a new ID from a u64 value.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the underlying u64 value.
            #[must_use]
            pub const fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Vendor-side identifiers
define_id!(OrderId);
define_id!(DealId);
define_id!(MerchantId);
define_id!(BusinessId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrips_through_u64() {
        let deal = DealId::new(9_856_321);
        assert_eq!(deal.as_u64(), 9_856_321);
        assert_eq!(u64::from(deal), 9_856_321);
        assert_eq!(DealId::from(9_856_321), deal);
    }

    #[test]
    fn test_id_serializes_transparently() {
        let json = serde_json::to_string(&OrderId::new(42)).expect("serialize");
        assert_eq!(json, "42");

        let id: MerchantId = serde_json::from_str("7").expect("deserialize");
        assert_eq!(id, MerchantId::new(7));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(BusinessId::new(12).to_string(), "12");
    }
}
