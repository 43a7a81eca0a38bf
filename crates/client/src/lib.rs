//! Wowcher - Client for the Wowcher redemption API.
//!
//! Lets a merchant application:
//! - check connectivity with [`WowcherClient::echo_test`]
//! - collect every order for a deal with [`WowcherClient::get_orders`]
//! - report order progress with [`WowcherClient::set_order_status`]
//!
//! # Credentials
//!
//! Requests are signed with an API key and secret token. They are read from
//! the nearest `wowcher_credentials.yaml` above the working directory the
//! first time they are needed, unless set in memory first (see [`Session`]
//! and [`config`]). The file may hold separate live and staging key pairs;
//! `use_staging` selects between the two hosts.
//!
//! # Logging
//!
//! The crate emits `tracing` events and spans. Installing a subscriber is up to
//! the application.
//!
//! # Modules
//!
//! - [`api`] - Endpoint definitions (`Echo`, `Orders`, `Status`)
//! - [`config`] - Credentials file discovery and environment variables
//! - [`transport`] - HTTP transport trait and the `reqwest` implementation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
mod client;
mod collector;
pub mod config;
mod error;
mod operations;
mod session;
pub mod transport;

pub use client::WowcherClient;
pub use collector::{OrderDates, PER_PAGE, ResolvedDates};
pub use config::{
    CREDENTIALS_FILENAME, ConfigError, create_credentials_file, find_credentials_file,
    load_credentials_file,
};
pub use error::{Result, WowcherError};
pub use operations::make_order_status;
pub use session::{ActiveCredentials, CredentialsUpdate, Session};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};

pub use wowcher_core::{
    ApiKeyPair, BusinessId, Credentials, DealId, Environment, Item, MerchantId, Order, OrderId,
    OrderStatus, StatusUpdate,
};
