//! External data-source clients and the trait seams the core consumes
//! them through.

pub mod chronos;
pub mod jupiter;

pub use chronos::ChronosClient;
pub use jupiter::{JupiterClient, JupiterDiscovery};

use crate::types::{DiscoveryRecord, Forecast, ForecastRequest, PriceUpdate};
use async_trait::async_trait;
use std::collections::HashMap;

/// Batched price source for the tracker's ingestion cycle.
///
/// A mint missing from the returned map simply gets no update this cycle.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn fetch_prices(&self, mints: &[String]) -> anyhow::Result<HashMap<String, PriceUpdate>>;
}

/// A discovery feed the scanner can pull candidate records from.
#[async_trait]
pub trait DiscoveryFeed: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// Pull the feed's current batch of records.
    async fn discover(&self) -> anyhow::Result<Vec<DiscoveryRecord>>;

    /// Resolve one identifier (mint address or symbol) to its record.
    async fn search(&self, query: &str) -> anyhow::Result<Option<DiscoveryRecord>>;
}

/// Asynchronous price forecaster. Best-effort: callers treat any failure
/// as "keep the previous forecast".
#[async_trait]
pub trait Forecaster: Send + Sync {
    async fn forecast(&self, request: &ForecastRequest) -> anyhow::Result<Forecast>;
}
