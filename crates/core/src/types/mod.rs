//! Core types for the Wowcher client.
//!
//! This module provides type-safe wrappers for the vendor's domain concepts.

pub mod credential;
pub mod id;
pub mod order;
pub mod status;

pub use credential::{ApiKeyPair, Credentials, Environment};
pub use id::*;
pub use order::{Item, Order};
pub use status::*;
