use serde::{Deserialize, Serialize};

/// A single recorded price observation for a tracked token.
///
/// Samples are append-only; once recorded they are never edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSample {
    pub price: f64,
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquidity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_change_24h: Option<f64>,
}

/// One token's entry in a batched price-feed response.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceUpdate {
    pub price: f64,
    pub liquidity: Option<f64>,
    pub price_change_24h: Option<f64>,
}

impl PriceUpdate {
    /// A price is usable only when it is a finite, strictly positive number.
    pub fn is_valid(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}
