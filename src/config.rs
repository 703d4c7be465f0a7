use crate::types::SmoothingType;
use std::env;

/// Application configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Base URL of the Jupiter lite-api.
    pub jupiter_base_url: Option<String>,
    /// Base URL of the forecasting service; forecasts are disabled when
    /// unset.
    pub forecast_url: Option<String>,
    /// Seconds between ingestion cycles.
    pub poll_interval_secs: u64,
    /// Candle width in seconds.
    pub candle_duration_secs: u64,
    /// Per-token sample and candle history capacity.
    pub history_capacity: usize,
    /// Momentum lookback period.
    pub momentum_period: usize,
    /// Smoothing-line window over the indicator series.
    pub smoothing_period: usize,
    /// EMA or SMA smoothing line.
    pub smoothing_type: SmoothingType,
    /// Candles ahead requested from the forecaster.
    pub prediction_length: usize,
    /// Discovery categories to scan, e.g. `toptrending/1h`.
    pub scan_categories: Vec<String>,
    /// Records requested per discovery category.
    pub scan_limit: usize,
    /// Absolute holder floor for single-token analysis.
    pub min_holders_floor: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let scan_categories = env::var("SCAN_CATEGORIES")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| {
                vec!["toptrending/1h".to_string(), "toptraded/1h".to_string()]
            });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            jupiter_base_url: env::var("JUPITER_BASE_URL").ok(),
            forecast_url: env::var("FORECAST_URL").ok(),
            poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            candle_duration_secs: env::var("CANDLE_DURATION_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            history_capacity: env::var("HISTORY_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            momentum_period: env::var("MOMENTUM_PERIOD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(14),
            smoothing_period: env::var("SMOOTHING_PERIOD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(9),
            smoothing_type: env::var("SMOOTHING_TYPE")
                .ok()
                .and_then(|v| SmoothingType::from_str(&v))
                .unwrap_or(SmoothingType::Ema),
            prediction_length: env::var("PREDICTION_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            scan_categories,
            scan_limit: env::var("SCAN_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            min_holders_floor: env::var("MIN_HOLDERS_FLOOR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
