//! Common utilities shared by the exchange client
//!
//! - Retry policy with fixed or exponential backoff

pub mod retry;

pub use retry::{Backoff, RetryPolicy, CONNECT_RETRIES, CONNECT_WAIT};
