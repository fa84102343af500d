//! Bittrex API type definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::auth::SIGNATURE_HEADER;
use crate::error::{Error, Result};

/// Outer JSON structure of every response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
}

impl Envelope {
    /// Unwrap the payload.
    ///
    /// `success: false` is a rejection. An absent or falsy `result` (`null`,
    /// `false`, `0`, `""`, `[]`, `{}`) means the exchange gave no usable
    /// answer.
    pub fn into_result(self) -> Result<Value> {
        if self.success == Some(false) {
            return Err(Error::ApiRejected {
                message: self.message.unwrap_or_default(),
            });
        }

        match self.result {
            Some(result) if !is_falsy(&result) => Ok(result),
            _ => Err(Error::ConnectionTimeout),
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Which side(s) of the order book to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBookType {
    Buy,
    Sell,
    #[default]
    Both,
}

impl OrderBookType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for OrderBookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderBookType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            "both" => Ok(Self::Both),
            other => Err(format!(
                "unknown order book type '{}', expected buy, sell or both",
                other
            )),
        }
    }
}

/// Reserved for trading-strategy options. Carried opaquely, no behaviour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradingOptions {
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// A fully assembled request: the exact URL that goes on the wire plus its
/// headers. Exists for the duration of one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
}

impl SignedRequest {
    /// The `apisign` header, if the request was signed
    pub fn signature(&self) -> Option<&str> {
        self.headers.get(SIGNATURE_HEADER).map(String::as_str)
    }

    /// Query string portion of the URL, without the `?`
    pub fn query(&self) -> &str {
        self.url.split_once('?').map(|(_, q)| q).unwrap_or("")
    }
}
