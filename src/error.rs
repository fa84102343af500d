//! Error types for the Bittrex client

use thiserror::Error;

/// Failure of a single HTTP attempt, before any envelope is inspected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Could not establish a connection
    #[error("connection failed: {0}")]
    Connect(String),

    /// The attempt exceeded the per-attempt timeout
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Any other HTTP-layer failure (bad header, body read, redirect loop)
    #[error("http error: {0}")]
    Http(String),
}

impl TransportError {
    /// Whether another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connect(_) | Self::Timeout(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("transport failure after {attempts} attempt(s): {source}")]
    Transport {
        attempts: u32,
        #[source]
        source: TransportError,
    },

    #[error("connection timeout: response carried no usable result")]
    ConnectionTimeout,

    #[error("Bittrex rejected the request: {message}")]
    ApiRejected { message: String },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid response (HTTP {status}): {body}")]
    InvalidResponse { status: u16, body: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("vault error: {0}")]
    Vault(String),
}

impl From<aes_gcm::Error> for Error {
    fn from(err: aes_gcm::Error) -> Self {
        Error::Vault(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
