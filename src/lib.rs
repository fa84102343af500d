//! Bittrex Client
//!
//! A small, blocking client for the Bittrex v1.1 REST API: signed GET
//! requests with bounded retry, JSON file helpers and a password-protected
//! credential vault.
//!
//! ## Public market data
//! ```no_run
//! use bittrex_client::bittrex::{BittrexClient, ClientConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let client = BittrexClient::public(ClientConfig::default())?;
//!     let summary = client.market_summary("BTC-LTC")?;
//!     println!("{}", summary);
//!     Ok(())
//! }
//! ```
//!
//! ## Account data
//! ```no_run
//! use bittrex_client::{bittrex::BittrexClient, Config};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let credentials = config.credentials(None)?;
//!     let client = BittrexClient::with_config(credentials, config.client_config())?;
//!     println!("{}", client.balance("BTC")?);
//!     Ok(())
//! }
//! ```

pub mod bittrex;
pub mod common;
pub mod config;
pub mod error;
pub mod storage;
pub mod vault;

pub use config::Config;
pub use error::{Error, Result, TransportError};

// Re-export the client for convenience
pub use bittrex::BittrexClient;
