//! Bittrex Exchange API Library
//!
//! A blocking Rust client for the Bittrex v1.1 REST API.
//!
//! # Features
//!
//! - **Signed Requests**: `apikey`/`nonce` parameters and HMAC-SHA512 `apisign` header
//! - **Bounded Retry**: fixed or exponential pauses on connection failures
//! - **Typed Errors**: rejections and empty responses come back as [`crate::Error`]
//! - **Pluggable Transport**: any [`Transport`] can stand in for HTTP
//!
//! # Quick Start
//!
//! ```no_run
//! use bittrex_client::bittrex::{BittrexClient, ClientConfig, Credentials, OrderBookType};
//!
//! fn main() -> anyhow::Result<()> {
//!     // Public data needs no credentials
//!     let public = BittrexClient::public(ClientConfig::default())?;
//!     let book = public.order_book("BTC-LTC", OrderBookType::Both)?;
//!     println!("{}", book);
//!
//!     // Market and account endpoints are signed
//!     let client = BittrexClient::new(Credentials::new("api_key", "api_secret")?)?;
//!     let uuid = client.buy_limit("BTC-LTC", 5.0, 0.0035)?;
//!     println!("Order placed: {}", uuid);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```no_run
//! use std::time::Duration;
//! use bittrex_client::bittrex::{BittrexClient, ClientConfig, Credentials};
//! use bittrex_client::common::{Backoff, RetryPolicy};
//!
//! let config = ClientConfig::default()
//!     .with_timeout(Duration::from_secs(10))
//!     .with_retry_policy(
//!         RetryPolicy::default()
//!             .with_max_attempts(5)
//!             .with_backoff(Backoff::Exponential)
//!             .with_jitter(true),
//!     );
//!
//! let credentials = Credentials::new("api_key", "api_secret").unwrap();
//! let client = BittrexClient::with_config(credentials, config).unwrap();
//! ```
//!
//! # Modules
//!
//! - [`auth`]: HMAC-SHA512 signing, nonces and credentials
//! - [`query`]: parameter mapping and query-string encoding
//! - [`transport`]: the HTTP seam
//! - [`types`]: envelope and request types
//! - [`client`]: the signed request client

pub mod auth;
pub mod client;
mod endpoints;
pub mod query;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use auth::Credentials;
pub use client::{BittrexClient, ClientConfig, API_BASE_URL, DEFAULT_TIMEOUT};
pub use query::{parse_query, ParamValue, Params};
pub use transport::{HttpTransport, Transport, TransportResponse};
pub use types::{Envelope, OrderBookType, SignedRequest, TradingOptions};
