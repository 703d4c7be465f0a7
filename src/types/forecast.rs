use serde::{Deserialize, Serialize};

/// Request body for the forecasting service.
///
/// Field names follow the service's wire schema; covariate arrays are
/// optional and must be aligned to `prices` by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// Close price per candle, oldest first.
    pub prices: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi_history: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquidity_history: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_history: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_pressure: Option<Vec<f64>>,
    /// Candles ahead to predict.
    pub prediction_length: usize,
    /// Candle width in minutes, used by the service to build timestamps.
    pub candle_minutes: u64,
}

/// One predicted candle as a quantile band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantileForecast {
    /// 10th percentile, bear case.
    pub low: f64,
    /// 50th percentile, base case.
    pub median: f64,
    /// 90th percentile, bull case.
    pub high: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastDirection {
    Bullish,
    Bearish,
    Neutral,
}

/// Forecast produced by the external service. Advisory only: a stale
/// forecast is kept over a failed refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub current_price: f64,
    pub forecasts: Vec<QuantileForecast>,
    pub direction: ForecastDirection,
    /// Inverse of the average quantile spread, in [0, 1].
    pub confidence: f64,
    /// Median percent change vs the current price.
    pub pct_change: f64,
    pub covariates_used: Vec<String>,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_omits_missing_covariates() {
        let req = ForecastRequest {
            prices: vec![1.0, 1.1],
            token: Some("MINT".to_string()),
            rsi_history: None,
            liquidity_history: None,
            volume_history: None,
            buy_pressure: None,
            prediction_length: 3,
            candle_minutes: 5,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("rsi_history"));
        assert!(json.contains("prediction_length"));
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "token": "MINT",
            "current_price": 1.2,
            "forecasts": [{"low": 1.1, "median": 1.25, "high": 1.4}],
            "direction": "bullish",
            "confidence": 0.82,
            "pct_change": 4.16,
            "covariates_used": ["rsi", "liquidity"],
            "summary": "Median +4.16% over 3x5min"
        }"#;
        let forecast: Forecast = serde_json::from_str(json).unwrap();
        assert_eq!(forecast.direction, ForecastDirection::Bullish);
        assert_eq!(forecast.forecasts.len(), 1);
        assert_eq!(forecast.covariates_used.len(), 2);
    }
}
