//! Wowcher Core - Shared types library.
//!
//! This crate provides the types exchanged with the Wowcher redemption API:
//! - orders and their line items as returned by the Orders endpoint
//! - order-status update records sent to the Status endpoint
//! - the credentials file shapes and the live/staging environment selection
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! credential discovery. Those live in the `wowcher` client crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, orders, status updates and credentials

#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, recursion_limit = "256")]

pub mod types;

pub use types::*;
