//! Authentication utilities for the Bittrex API
//!
//! Signed requests carry `apikey` and `nonce` query parameters and an
//! `apisign` header holding the HMAC-SHA512 (hex) of the full request URL,
//! keyed with the API secret.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha512;
use std::fmt;

use crate::error::{Error, Result};

type HmacSha512 = Hmac<Sha512>;

/// Header carrying the request signature
pub const SIGNATURE_HEADER: &str = "apisign";

/// Query parameter carrying the public key identifier
pub const API_KEY_PARAM: &str = "apikey";

/// Query parameter carrying the nonce
pub const NONCE_PARAM: &str = "nonce";

/// Section name of the exchange inside a secrets file
pub const SECRETS_SECTION: &str = "bittrex";

/// Generate the HMAC-SHA512 signature of `message`, hex encoded
///
/// # Example
///
/// ```
/// use bittrex_client::bittrex::auth::sign_request;
///
/// let url = "https://bittrex.com/api/v1.1/account/getbalances?apikey=k&nonce=1";
/// let signature = sign_request(url, "secret");
/// assert_eq!(signature.len(), 128);
/// ```
pub fn sign_request(message: &str, secret: &str) -> String {
    let mut mac =
        HmacSha512::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a signature against the expected value
pub fn verify_signature(message: &str, secret: &str, signature: &str) -> bool {
    let computed = sign_request(message, secret);
    constant_time_eq(computed.as_bytes(), signature.as_bytes())
}

/// Constant-time byte comparison
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Current Unix time in whole seconds, as sent in the `nonce` parameter
///
/// Two signed calls within the same second share a nonce.
pub fn nonce() -> String {
    chrono::Utc::now().timestamp().to_string()
}

/// API credentials container
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

#[derive(Deserialize)]
struct SecretsEntry {
    #[serde(rename = "Key", alias = "bittrexKey")]
    key: Option<String>,
    #[serde(rename = "Secret", alias = "bittrexSecret")]
    secret: Option<String>,
}

impl Credentials {
    /// Create credentials, rejecting an empty key or secret
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        let api_secret = api_secret.into();

        if api_key.trim().is_empty() {
            return Err(Error::Configuration("API key is missing".to_string()));
        }
        if api_secret.trim().is_empty() {
            return Err(Error::Configuration("API secret is missing".to_string()));
        }

        Ok(Self {
            api_key,
            api_secret,
        })
    }

    /// Create credentials from environment variables
    ///
    /// Looks for `BITTREX_API_KEY` and `BITTREX_API_SECRET`
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("BITTREX_API_KEY")
            .map_err(|_| Error::Configuration("BITTREX_API_KEY is not set".to_string()))?;
        let api_secret = std::env::var("BITTREX_API_SECRET")
            .map_err(|_| Error::Configuration("BITTREX_API_SECRET is not set".to_string()))?;
        Self::new(api_key, api_secret)
    }

    /// Read the pair from a secrets document shaped like
    /// `{"bittrex": {"Key": "...", "Secret": "..."}}`
    pub fn from_secrets(secrets: &serde_json::Value) -> Result<Self> {
        let section = secrets.get(SECRETS_SECTION).ok_or_else(|| {
            Error::Configuration(format!("secrets have no '{}' section", SECRETS_SECTION))
        })?;

        let entry: SecretsEntry = serde_json::from_value(section.clone()).map_err(|e| {
            Error::Configuration(format!("malformed '{}' secrets: {}", SECRETS_SECTION, e))
        })?;

        Self::new(
            entry.key.unwrap_or_default(),
            entry.secret.unwrap_or_default(),
        )
    }

    /// Secrets document holding this pair, the inverse of [`Self::from_secrets`]
    pub fn to_secrets(&self) -> serde_json::Value {
        let mut root = serde_json::Map::new();
        root.insert(
            SECRETS_SECTION.to_string(),
            serde_json::json!({
                "Key": self.api_key,
                "Secret": self.api_secret,
            }),
        );
        serde_json::Value::Object(root)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }

    /// Sign a request URL
    pub fn sign(&self, url: &str) -> String {
        sign_request(url, &self.api_secret)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}
