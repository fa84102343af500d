//! HTTP transport used by the client
//!
//! The client only needs "GET this exact URL with these headers". Keeping that
//! behind a trait lets tests script connection failures without a network.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result, TransportError};

/// Raw HTTP response: status and body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }
}

/// Issues one GET attempt. Retrying is the caller's concern.
pub trait Transport {
    fn get(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
    ) -> std::result::Result<TransportResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
    ) -> std::result::Result<TransportResponse, TransportError> {
        (**self).get(url, headers)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn get(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
    ) -> std::result::Result<TransportResponse, TransportError> {
        (**self).get(url, headers)
    }
}

/// Blocking reqwest transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport whose every attempt is bounded by `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    fn header_map(
        headers: &BTreeMap<String, String>,
    ) -> std::result::Result<HeaderMap, TransportError> {
        let mut map = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::Http(format!("invalid header name {}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::Http(format!("invalid value for {}: {}", name, e)))?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

impl Transport for HttpTransport {
    fn get(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .headers(Self::header_map(headers)?)
            .send()?;

        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(TransportResponse { status, body })
    }
}
