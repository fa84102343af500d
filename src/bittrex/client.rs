//! Bittrex API Client
//!
//! Synchronous HTTP client for the Bittrex v1.1 REST API with:
//! - HMAC-SHA512 request signing
//! - Bounded retry on connection failures
//! - Typed errors for rejected or empty responses
//!
//! # Example
//!
//! ```no_run
//! use bittrex_client::bittrex::{BittrexClient, Credentials};
//!
//! fn main() -> anyhow::Result<()> {
//!     let credentials = Credentials::new("api_key", "api_secret")?;
//!     let client = BittrexClient::new(credentials)?;
//!
//!     let ticker = client.ticker("BTC-LTC")?;
//!     println!("BTC-LTC: {}", ticker["Last"]);
//!
//!     let balances = client.balances()?;
//!     println!("{}", serde_json::to_string_pretty(&balances)?);
//!
//!     Ok(())
//! }
//! ```

use reqwest::Url;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use super::auth::{self, Credentials, API_KEY_PARAM, NONCE_PARAM, SIGNATURE_HEADER};
use super::query::Params;
use super::transport::{HttpTransport, Transport};
use super::types::{Envelope, SignedRequest, TradingOptions};
use crate::common::RetryPolicy;
use crate::error::{Error, Result};

/// Base URL for the Bittrex API, including the version segment
pub const API_BASE_URL: &str = "https://bittrex.com/api/v1.1/";

/// Per-attempt HTTP timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest body excerpt kept in an `InvalidResponse` error
const BODY_EXCERPT_LEN: usize = 256;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, always ending in `/`
    pub base_url: String,
    /// Per-attempt timeout, independent of the retry pause
    pub timeout: Duration,
    pub retry: RetryPolicy,
    /// Strategy options placeholder
    pub options: TradingOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            options: TradingOptions::default(),
        }
    }
}

impl ClientConfig {
    /// Set the API root. A parseable URL is stored in the normalized form the
    /// HTTP layer sends (lowercase host, default port dropped).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let mut base_url = match Url::parse(&base_url) {
            Ok(url) => url.to_string(),
            Err(_) => base_url,
        };
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_options(mut self, options: TradingOptions) -> Self {
        self.options = options;
        self
    }
}

/// Bittrex Exchange API Client
///
/// Holds the credential pair for its whole lifetime. A client built without
/// credentials can only call public endpoints; signed calls fail with
/// [`Error::Configuration`] before touching the network.
#[derive(Debug, Clone)]
pub struct BittrexClient<T = HttpTransport> {
    credentials: Option<Credentials>,
    transport: T,
    base_url: String,
    retry: RetryPolicy,
    options: TradingOptions,
}

impl BittrexClient<HttpTransport> {
    /// Create an authenticated client with default configuration
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::default())
    }

    /// Create an authenticated client with custom configuration
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout)?;
        Ok(Self::with_transport(Some(credentials), config, transport))
    }

    /// Create a client for public endpoints only
    pub fn public(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout)?;
        Ok(Self::with_transport(None, config, transport))
    }
}

impl<T: Transport> BittrexClient<T> {
    /// Create a client over an arbitrary transport
    pub fn with_transport(
        credentials: Option<Credentials>,
        config: ClientConfig,
        transport: T,
    ) -> Self {
        Self {
            credentials,
            transport,
            base_url: config.base_url,
            retry: config.retry,
            options: config.options,
        }
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn options(&self) -> &TradingOptions {
        &self.options
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Assemble the exact URL and headers for a call without sending it.
    ///
    /// When `signed`, `apikey` and `nonce` are added to `params` and the
    /// `apisign` header is computed over the final URL.
    pub fn prepare(
        &self,
        method: &str,
        mut params: Params,
        headers: Option<&BTreeMap<String, String>>,
        signed: bool,
    ) -> Result<SignedRequest> {
        let credentials = if signed {
            let credentials = self.credentials.as_ref().ok_or_else(|| {
                Error::Configuration(format!(
                    "'{}' requires API credentials but none were configured",
                    method
                ))
            })?;
            params.insert(API_KEY_PARAM, credentials.api_key());
            params.insert(NONCE_PARAM, auth::nonce());
            Some(credentials)
        } else {
            None
        };

        let target = format!("{}{}?{}", self.base_url, method, params.to_query());
        let url = Url::parse(&target)
            .map_err(|e| Error::Configuration(format!("invalid request URL {}: {}", target, e)))?
            .to_string();

        let mut headers = headers.cloned().unwrap_or_default();
        if let Some(credentials) = credentials {
            headers.insert(SIGNATURE_HEADER.to_string(), credentials.sign(&url));
        }

        Ok(SignedRequest { url, headers })
    }

    /// Send a GET to `method` and return the envelope's `result`.
    ///
    /// Connection failures are retried per the client's [`RetryPolicy`].
    /// Rejections (`success: false`) and empty responses are returned as
    /// errors on the first occurrence.
    pub fn request(
        &self,
        method: &str,
        params: Params,
        headers: Option<&BTreeMap<String, String>>,
        signed: bool,
    ) -> Result<Value> {
        let request = self.prepare(method, params, headers, signed)?;
        let max_attempts = self.retry.attempts();

        let response = self.retry.run(|attempt| {
            debug!(
                "GET {} (signed: {}, attempt {}/{})",
                method, signed, attempt, max_attempts
            );
            self.transport.get(&request.url, &request.headers)
        })?;

        decode(response.status, &response.body)
    }
}

/// Parse a response body and unwrap its envelope
fn decode(status: u16, body: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(body).map_err(|_| Error::InvalidResponse {
        status,
        body: excerpt(body),
    })?;

    if value.is_null() {
        return Err(Error::ConnectionTimeout);
    }

    let envelope: Envelope =
        serde_json::from_value(value).map_err(|_| Error::InvalidResponse {
            status,
            body: excerpt(body),
        })?;

    envelope.into_result()
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_LEN).collect()
}
