use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

// A single row of the order book dataset. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub timestamp: DateTime<FixedOffset>,
    pub code: String,
    pub price: u64,
}

/// One-hour candlestick. `open` goes over the wire as `ope`, which is what
/// existing clients of `/candle` read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(rename = "ope")]
    pub open: u64,
    pub close: u64,
    pub high: u64,
    pub low: u64,
}

// Absent fields bind as empty strings, like a form with blank inputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagRequest {
    pub flag: String,
}

// Body of every 4xx reply: `{"message": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
