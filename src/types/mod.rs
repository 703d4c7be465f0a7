pub mod candidate;
pub mod candle;
pub mod forecast;
pub mod momentum;
pub mod price;
pub mod scoring;

pub use candidate::{Candidate, CandidateStatus, DiscoveryRecord, ScanFilters, ScanPage};
pub use candle::Candle;
pub use forecast::{Forecast, ForecastDirection, ForecastRequest, QuantileForecast};
pub use momentum::{Crossover, MomentumReading, MomentumSignal, SmoothingType};
pub use price::{PriceSample, PriceUpdate};
pub use scoring::{OrganicLabel, ScoreResult, TradingSnapshot, Verdict};
