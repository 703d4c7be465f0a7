use serde::{Deserialize, Serialize};

/// OHLC aggregation of price samples over a fixed time window.
///
/// Immutable once finalized; the tracker never edits a candle retroactively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    /// Open time of the window, unix milliseconds.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}
