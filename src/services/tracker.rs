//! Token tracker: per-mint sample history, candle rollup, momentum
//! recompute, and forecast dispatch.
//!
//! The tracker owns the only shared mutable state in the system, a
//! `DashMap` keyed by mint. The polling loop is the sole writer per mint
//! and updates one mint's fields under a single map-entry guard, so
//! readers always observe a consistent candle/momentum pair.

use crate::services::momentum;
use crate::sources::{Forecaster, PriceFeed};
use crate::types::{
    Candle, Forecast, ForecastRequest, MomentumReading, PriceSample, SmoothingType,
};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Number of recent sample prices exposed for dashboard sparklines.
const SPARKLINE_POINTS: usize = 20;

/// Tracker tuning knobs.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Capacity of both the sample and candle histories per mint.
    pub history_capacity: usize,
    /// Candle width in milliseconds.
    pub candle_duration_ms: i64,
    /// Spacing between ingestion cycles.
    pub poll_interval: Duration,
    pub momentum_period: usize,
    pub smoothing_period: usize,
    pub smoothing_type: SmoothingType,
    /// Candles ahead requested from the forecaster.
    pub prediction_length: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            history_capacity: 100,
            candle_duration_ms: 5 * 60 * 1000,
            poll_interval: Duration::from_secs(10),
            momentum_period: 14,
            smoothing_period: 9,
            smoothing_type: SmoothingType::Ema,
            prediction_length: 3,
        }
    }
}

/// In-progress candle accumulator. `close` stays pending until the window
/// elapses.
#[derive(Debug, Clone)]
struct CandleBuilder {
    open_time: i64,
    open: f64,
    high: f64,
    low: f64,
}

impl CandleBuilder {
    fn new(open_time: i64, price: f64) -> Self {
        Self {
            open_time,
            open: price,
            high: price,
            low: price,
        }
    }

    fn extend(&mut self, price: f64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
    }

    /// Close the window. High/low stay as accumulated; the closing tick
    /// belongs to the next candle.
    fn finalize(&self, close: f64) -> Candle {
        Candle {
            timestamp: self.open_time,
            open: self.open,
            high: self.high,
            low: self.low,
            close,
        }
    }
}

/// Mutable per-mint state. Never handed out; readers get [`TokenSnapshot`]
/// copies.
struct TokenState {
    label: Option<String>,
    samples: VecDeque<PriceSample>,
    candles: VecDeque<Candle>,
    building: Option<CandleBuilder>,
    momentum: MomentumReading,
    forecast: Option<Forecast>,
    last_updated: i64,
}

impl TokenState {
    fn new(label: Option<String>, config: &TrackerConfig) -> Self {
        Self {
            label,
            samples: VecDeque::with_capacity(config.history_capacity),
            candles: VecDeque::with_capacity(config.history_capacity),
            building: None,
            momentum: MomentumReading::insufficient(
                0,
                config.momentum_period,
                config.smoothing_period,
                config.smoothing_type,
            ),
            forecast: None,
            last_updated: 0,
        }
    }
}

/// Read-only view of one tracked token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSnapshot {
    pub mint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_change_24h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquidity: Option<f64>,
    pub momentum: MomentumReading,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<Forecast>,
    pub candle_count: usize,
    pub sample_count: usize,
    pub sparkline: Vec<f64>,
    pub last_updated: i64,
}

/// The aggregation store. Explicit lifecycle: construct, `start`, `stop`;
/// restart after `stop` is allowed.
pub struct TokenTracker {
    config: TrackerConfig,
    /// Shared with forecast completion tasks, which write back one mint's
    /// forecast field without holding the tracker itself.
    tokens: Arc<DashMap<String, TokenState>>,
    price_feed: Arc<dyn PriceFeed>,
    forecaster: Option<Arc<dyn Forecaster>>,
    poll_handle: Mutex<Option<JoinHandle<()>>>,
}

impl TokenTracker {
    /// Construct a tracker. Zero capacities and periods are programming
    /// errors, rejected here rather than tolerated.
    pub fn new(
        config: TrackerConfig,
        price_feed: Arc<dyn PriceFeed>,
        forecaster: Option<Arc<dyn Forecaster>>,
    ) -> Arc<Self> {
        assert!(config.history_capacity > 0, "history capacity must be positive");
        assert!(config.candle_duration_ms > 0, "candle duration must be positive");
        assert!(config.momentum_period > 0, "momentum period must be positive");
        assert!(config.smoothing_period > 0, "smoothing period must be positive");

        Arc::new(Self {
            config,
            tokens: Arc::new(DashMap::new()),
            price_feed,
            forecaster,
            poll_handle: Mutex::new(None),
        })
    }

    /// Start watching a mint. Idempotent: repeat calls keep existing state
    /// and at most refresh the label.
    pub fn watch(&self, mint: &str, label: Option<String>) {
        let mut entry = self
            .tokens
            .entry(mint.to_string())
            .or_insert_with(|| {
                info!("watching {}", mint);
                TokenState::new(None, &self.config)
            });
        if label.is_some() {
            entry.label = label;
        }
    }

    /// Stop watching a mint and drop its state. No error when absent.
    pub fn unwatch(&self, mint: &str) {
        if self.tokens.remove(mint).is_some() {
            info!("unwatched {}", mint);
        }
    }

    pub fn is_watching(&self, mint: &str) -> bool {
        self.tokens.contains_key(mint)
    }

    pub fn watched(&self) -> Vec<String> {
        self.tokens.iter().map(|e| e.key().clone()).collect()
    }

    /// Owned snapshot of one token, or `None` when not watched.
    pub fn snapshot(&self, mint: &str) -> Option<TokenSnapshot> {
        let state = self.tokens.get(mint)?;
        Some(Self::to_snapshot(mint, &state))
    }

    /// Owned snapshots of every tracked token.
    pub fn snapshots(&self) -> Vec<TokenSnapshot> {
        self.tokens
            .iter()
            .map(|entry| Self::to_snapshot(entry.key(), entry.value()))
            .collect()
    }

    fn to_snapshot(mint: &str, state: &TokenState) -> TokenSnapshot {
        let last = state.samples.back();
        let sparkline: Vec<f64> = state
            .samples
            .iter()
            .rev()
            .take(SPARKLINE_POINTS)
            .rev()
            .map(|s| s.price)
            .collect();

        TokenSnapshot {
            mint: mint.to_string(),
            label: state.label.clone(),
            price: last.map(|s| s.price),
            price_change_24h: last.and_then(|s| s.price_change_24h),
            liquidity: last.and_then(|s| s.liquidity),
            momentum: state.momentum.clone(),
            forecast: state.forecast.clone(),
            candle_count: state.candles.len(),
            sample_count: state.samples.len(),
            sparkline,
            last_updated: state.last_updated,
        }
    }

    /// Finalized candles for one mint, oldest first. Owned copies.
    pub fn candles(&self, mint: &str) -> Option<Vec<Candle>> {
        let state = self.tokens.get(mint)?;
        Some(state.candles.iter().cloned().collect())
    }

    /// Last `k` raw indicator values for charting, computed over finalized
    /// closes plus the live price so it never drifts from the current
    /// reading.
    pub fn momentum_history(&self, mint: &str, k: usize) -> Option<Vec<f64>> {
        let state = self.tokens.get(mint)?;
        let closes = Self::closes_with_live(&state);
        Some(momentum::momentum_history(
            &closes,
            self.config.momentum_period,
            k,
        ))
    }

    fn closes_with_live(state: &TokenState) -> Vec<f64> {
        let mut closes: Vec<f64> = state.candles.iter().map(|c| c.close).collect();
        if let Some(sample) = state.samples.back() {
            closes.push(sample.price);
        }
        closes
    }

    /// Record one price tick for a watched mint. Returns whether a candle
    /// was finalized by this tick.
    ///
    /// The caller supplies the timestamp, which keeps the rollup
    /// deterministic and drivable from tests; the polling cycle passes
    /// wall-clock time.
    pub fn record_tick(
        &self,
        mint: &str,
        price: f64,
        liquidity: Option<f64>,
        price_change_24h: Option<f64>,
        timestamp: i64,
    ) -> bool {
        let Some(mut entry) = self.tokens.get_mut(mint) else {
            return false;
        };
        let state = entry.value_mut();
        let capacity = self.config.history_capacity;

        state.samples.push_back(PriceSample {
            price,
            timestamp,
            liquidity,
            price_change_24h,
        });
        while state.samples.len() > capacity {
            state.samples.pop_front();
        }

        let mut finalized = false;
        match state.building.as_mut() {
            None => {
                state.building = Some(CandleBuilder::new(timestamp, price));
            }
            Some(builder) => {
                if timestamp - builder.open_time >= self.config.candle_duration_ms {
                    state.candles.push_back(builder.finalize(price));
                    while state.candles.len() > capacity {
                        state.candles.pop_front();
                    }
                    state.building = Some(CandleBuilder::new(timestamp, price));
                    finalized = true;
                } else {
                    builder.extend(price);
                }
            }
        }

        // The dashboard reading uses the live price as a provisional close
        // so it moves between candle boundaries.
        let closes = Self::closes_with_live(state);
        state.momentum = momentum::compute_momentum(
            &closes,
            self.config.momentum_period,
            self.config.smoothing_period,
            self.config.smoothing_type,
        );
        state.last_updated = timestamp;

        finalized
    }

    /// One ingestion cycle: a single batched fetch for the watched set,
    /// then per-mint updates. Nothing here aborts the batch; a bad price
    /// or missing mint only skips that mint.
    pub async fn run_cycle(&self) {
        let mints = self.watched();
        if mints.is_empty() {
            return;
        }

        let updates = match self.price_feed.fetch_prices(&mints).await {
            Ok(updates) => updates,
            Err(e) => {
                warn!("price batch fetch failed, skipping cycle: {}", e);
                return;
            }
        };

        let now = chrono::Utc::now().timestamp_millis();
        for mint in &mints {
            let Some(update) = updates.get(mint) else {
                debug!("no price for {} this cycle", mint);
                continue;
            };
            if !update.is_valid() {
                warn!("rejecting price {} for {}", update.price, mint);
                continue;
            }

            let finalized = self.record_tick(
                mint,
                update.price,
                update.liquidity,
                update.price_change_24h,
                now,
            );
            if finalized {
                self.dispatch_forecast(mint);
            }
        }
    }

    /// Fire-and-forget forecast refresh for one mint. The completion task
    /// writes only this mint's forecast field; a failure keeps the
    /// previous (stale-but-valid) forecast. An unwatch racing the
    /// completion wins: the entry is gone and the result is dropped.
    fn dispatch_forecast(&self, mint: &str) {
        let Some(forecaster) = self.forecaster.clone() else {
            return;
        };
        let Some(request) = self.forecast_request(mint) else {
            return;
        };

        let tokens = self.tokens.clone();
        let mint = mint.to_string();
        tokio::spawn(async move {
            match forecaster.forecast(&request).await {
                Ok(forecast) => {
                    if let Some(mut state) = tokens.get_mut(&mint) {
                        debug!("forecast for {}: {:?}", mint, forecast.direction);
                        state.forecast = Some(forecast);
                    }
                }
                Err(e) => {
                    warn!("forecast for {} failed, keeping previous: {}", mint, e);
                }
            }
        });
    }

    /// Build the forecast request from strictly finalized candles, with
    /// covariates aligned to the close window.
    fn forecast_request(&self, mint: &str) -> Option<ForecastRequest> {
        let state = self.tokens.get(mint)?;
        let closes: Vec<f64> = state.candles.iter().map(|c| c.close).collect();
        let need = self.config.momentum_period + self.config.smoothing_period + 1;
        if closes.len() < need {
            return None;
        }

        let series = momentum::momentum_series(&closes, self.config.momentum_period);
        let rsi_history = align(&series, closes.len());

        let liquidity: Vec<f64> = state.samples.iter().filter_map(|s| s.liquidity).collect();
        let liquidity_history = if liquidity.is_empty() {
            None
        } else {
            Some(align(&liquidity, closes.len()))
        };

        Some(ForecastRequest {
            token: Some(mint.to_string()),
            prices: closes,
            rsi_history: Some(rsi_history),
            liquidity_history,
            volume_history: None,
            buy_pressure: None,
            prediction_length: self.config.prediction_length,
            candle_minutes: (self.config.candle_duration_ms / 60_000).max(1) as u64,
        })
    }

    /// Start the polling loop. A second call while running is a no-op.
    /// Call as `tracker.clone().start()`.
    pub fn start(self: Arc<Self>) {
        let mut guard = self.poll_handle.lock().expect("poll handle lock poisoned");
        if guard.is_some() {
            debug!("tracker already polling");
            return;
        }

        info!("starting tracker polling every {:?}", self.config.poll_interval);
        let tracker = self.clone();
        *guard = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(tracker.config.poll_interval);
            // Cycles are strictly serialized; a slow cycle delays the next
            // tick instead of overlapping it.
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                tracker.run_cycle().await;
            }
        }));
    }

    /// Stop the polling loop. Idempotent; `start` may be called again
    /// afterwards.
    pub fn stop(&self) {
        let mut guard = self.poll_handle.lock().expect("poll handle lock poisoned");
        if let Some(handle) = guard.take() {
            handle.abort();
            info!("tracker polling stopped");
        }
    }
}

/// Trim or front-pad `values` to exactly `length`, the alignment the
/// forecast service applies to covariates.
fn align(values: &[f64], length: usize) -> Vec<f64> {
    if values.len() >= length {
        return values[values.len() - length..].to_vec();
    }
    let Some(&first) = values.first() else {
        return vec![0.0; length];
    };
    let mut padded = vec![first; length - values.len()];
    padded.extend_from_slice(values);
    padded
}
