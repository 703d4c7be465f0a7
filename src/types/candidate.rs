use serde::{Deserialize, Serialize};

use super::scoring::{OrganicLabel, TradingSnapshot, Verdict};

/// Normalized discovery-feed record.
///
/// Raw feed payloads are loosely typed; sources validate and normalize them
/// into this shape at the boundary and drop rows that cannot be normalized.
#[derive(Debug, Clone)]
pub struct DiscoveryRecord {
    pub mint: String,
    pub name: String,
    pub symbol: String,
    pub price: Option<f64>,
    pub liquidity: Option<f64>,
    pub market_cap: Option<f64>,
    pub holder_count: u64,
    pub organic_score: f64,
    pub organic_label: OrganicLabel,
    pub mint_authority_disabled: bool,
    pub freeze_authority_disabled: bool,
    pub buy_volume: f64,
    pub sell_volume: f64,
    pub num_buys: u64,
    pub num_sells: u64,
    pub num_net_buyers: i64,
    pub price_change_24h: Option<f64>,
    pub created_at: Option<String>,
}

impl DiscoveryRecord {
    /// Project the trading statistics used by the scoring engine.
    pub fn trading_snapshot(&self) -> TradingSnapshot {
        TradingSnapshot {
            buy_volume: self.buy_volume,
            sell_volume: self.sell_volume,
            num_buys: self.num_buys,
            num_sells: self.num_sells,
            num_net_buyers: self.num_net_buyers,
            liquidity: self.liquidity.unwrap_or(0.0),
            market_cap: self.market_cap.unwrap_or(0.0),
            holder_count: self.holder_count,
            organic_score: self.organic_score,
            organic_label: self.organic_label,
            mint_authority_disabled: self.mint_authority_disabled,
            freeze_authority_disabled: self.freeze_authority_disabled,
        }
    }
}

/// Lifecycle stage of a scanned candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStatus {
    Watching,
    Consolidating,
    Pumping,
    Exited,
}

/// A token that passed scoring and eligibility filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub mint: String,
    pub name: String,
    pub symbol: String,
    pub holder_count: u64,
    pub score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquidity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub status: CandidateStatus,
    pub signals: Vec<String>,
    pub verdict: Verdict,
    pub warnings: Vec<String>,
}

/// Eligibility thresholds for a scan.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanFilters {
    pub min_holders: u64,
    pub max_holders: u64,
    pub min_score: u32,
    pub min_total_trades: u64,
}

impl Default for ScanFilters {
    fn default() -> Self {
        Self {
            min_holders: 0,
            max_holders: u64::MAX,
            min_score: 0,
            min_total_trades: 0,
        }
    }
}

impl ScanFilters {
    pub fn accepts(&self, holder_count: u64, score: u32, total_trades: u64) -> bool {
        holder_count >= self.min_holders
            && holder_count <= self.max_holders
            && score >= self.min_score
            && total_trades >= self.min_total_trades
    }
}

/// One page of ranked scan results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanPage {
    pub candidates: Vec<Candidate>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_default_accepts_everything() {
        let filters = ScanFilters::default();
        assert!(filters.accepts(0, 0, 0));
        assert!(filters.accepts(u64::MAX, 100, u64::MAX));
    }

    #[test]
    fn test_filters_bounds() {
        let filters = ScanFilters {
            min_holders: 100,
            max_holders: 1000,
            min_score: 40,
            min_total_trades: 50,
        };
        assert!(filters.accepts(500, 60, 80));
        assert!(!filters.accepts(99, 60, 80), "below holder floor");
        assert!(!filters.accepts(1001, 60, 80), "above holder ceiling");
        assert!(!filters.accepts(500, 39, 80), "below min score");
        assert!(!filters.accepts(500, 60, 49), "too few trades");
    }
}
