//! Candidate scanner: discovery, scoring, filtering, ranking, pagination.
//!
//! Feeds are independent views of the same external market; overlapping
//! records are expected and deduplicated by mint before scoring.

use crate::services::scoring;
use crate::sources::DiscoveryFeed;
use crate::types::{
    Candidate, CandidateStatus, DiscoveryRecord, ScanFilters, ScanPage,
};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Liquidity below this is flagged as too thin to trust.
const THIN_LIQUIDITY_USD: f64 = 10_000.0;

/// Scanner tuning knobs.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Absolute holder floor for single-token analysis, independent of
    /// caller-supplied filters. Records below it are too sparse to score
    /// meaningfully.
    pub min_holders_floor: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            min_holders_floor: 100,
        }
    }
}

/// Combines discovery feeds into a ranked, paginated candidate set.
pub struct CandidateScanner {
    config: ScannerConfig,
    feeds: Vec<Arc<dyn DiscoveryFeed>>,
}

impl CandidateScanner {
    pub fn new(config: ScannerConfig, feeds: Vec<Arc<dyn DiscoveryFeed>>) -> Arc<Self> {
        Arc::new(Self { config, feeds })
    }

    /// Scan all feeds and return one page of ranked candidates.
    ///
    /// A failing feed is logged and skipped; filtering is expected, not
    /// exceptional, so dropped records are not reported.
    pub async fn scan(&self, filters: &ScanFilters, page: usize, limit: usize) -> ScanPage {
        let mut by_mint: HashMap<String, DiscoveryRecord> = HashMap::new();

        for feed in &self.feeds {
            match feed.discover().await {
                Ok(records) => {
                    debug!("{}: {} records", feed.name(), records.len());
                    for record in records {
                        // Last-seen-wins; feeds are equivalent views.
                        by_mint.insert(record.mint.clone(), record);
                    }
                }
                Err(e) => {
                    warn!("discovery feed {} failed, skipping: {}", feed.name(), e);
                }
            }
        }

        let mut candidates: Vec<Candidate> = by_mint
            .into_values()
            .filter_map(|record| {
                let candidate = build_candidate(&record);
                let total_trades = record.num_buys + record.num_sells;
                filters
                    .accepts(candidate.holder_count, candidate.score, total_trades)
                    .then_some(candidate)
            })
            .collect();

        candidates.sort_by(rank);
        paginate(candidates, page, limit)
    }

    /// Resolve and score a single token on demand.
    ///
    /// `None` when no feed knows the query or the record is below the
    /// absolute holder floor.
    pub async fn analyze(&self, query: &str) -> Option<Candidate> {
        for feed in &self.feeds {
            match feed.search(query).await {
                Ok(Some(record)) => {
                    if record.holder_count < self.config.min_holders_floor {
                        debug!(
                            "{} has {} holders, below analysis floor {}",
                            record.mint, record.holder_count, self.config.min_holders_floor
                        );
                        return None;
                    }
                    return Some(build_candidate(&record));
                }
                Ok(None) => continue,
                Err(e) => {
                    warn!("search on {} failed: {}", feed.name(), e);
                }
            }
        }
        None
    }
}

/// Score a normalized record and assemble the candidate view.
fn build_candidate(record: &DiscoveryRecord) -> Candidate {
    let snapshot = record.trading_snapshot();
    let result = scoring::score(&snapshot);

    Candidate {
        mint: record.mint.clone(),
        name: record.name.clone(),
        symbol: record.symbol.clone(),
        holder_count: record.holder_count,
        score: result.score,
        price: record.price,
        liquidity: record.liquidity,
        market_cap: record.market_cap,
        created_at: record.created_at.clone(),
        status: derive_status(record, snapshot.buy_pressure()),
        signals: result.signals,
        verdict: result.verdict,
        warnings: collect_warnings(record),
    }
}

/// Lifecycle stage from 24h price action and buy pressure.
fn derive_status(record: &DiscoveryRecord, buy_pressure: f64) -> CandidateStatus {
    let change = record.price_change_24h.unwrap_or(0.0);
    if change <= -50.0 {
        CandidateStatus::Exited
    } else if change > 25.0 && buy_pressure > 0.6 {
        CandidateStatus::Pumping
    } else if change.abs() < 5.0 {
        CandidateStatus::Consolidating
    } else {
        CandidateStatus::Watching
    }
}

fn collect_warnings(record: &DiscoveryRecord) -> Vec<String> {
    let mut warnings = Vec::new();
    if !record.mint_authority_disabled {
        warnings.push("mint authority active".to_string());
    }
    if !record.freeze_authority_disabled {
        warnings.push("freeze authority active".to_string());
    }
    if record.liquidity.unwrap_or(0.0) < THIN_LIQUIDITY_USD {
        warnings.push("thin liquidity".to_string());
    }
    if record.organic_score < 30.0 {
        warnings.push("low organic activity".to_string());
    }
    warnings
}

/// Score descending, holder count descending, then mint ascending so
/// pagination is fully deterministic.
fn rank(a: &Candidate, b: &Candidate) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.holder_count.cmp(&a.holder_count))
        .then_with(|| a.mint.cmp(&b.mint))
}

fn paginate(candidates: Vec<Candidate>, page: usize, limit: usize) -> ScanPage {
    let limit = limit.clamp(1, 100);
    let page = page.max(1);
    let total = candidates.len();
    let total_pages = total.div_ceil(limit);

    let start = (page - 1) * limit;
    let slice = if start >= total {
        Vec::new()
    } else {
        candidates[start..(start + limit).min(total)].to_vec()
    };

    ScanPage {
        candidates: slice,
        total,
        page,
        limit,
        total_pages,
        has_more: page < total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrganicLabel;

    fn record(mint: &str, holders: u64, change: Option<f64>) -> DiscoveryRecord {
        DiscoveryRecord {
            mint: mint.to_string(),
            name: format!("Token {}", mint),
            symbol: mint.to_string(),
            price: Some(1.0),
            liquidity: Some(50_000.0),
            market_cap: Some(250_000.0),
            holder_count: holders,
            organic_score: 55.0,
            organic_label: OrganicLabel::Medium,
            mint_authority_disabled: true,
            freeze_authority_disabled: true,
            buy_volume: 4000.0,
            sell_volume: 2000.0,
            num_buys: 120,
            num_sells: 60,
            num_net_buyers: 80,
            price_change_24h: change,
            created_at: None,
        }
    }

    #[test]
    fn test_rank_is_deterministic_on_ties() {
        let a = build_candidate(&record("AAA", 500, None));
        let b = build_candidate(&record("BBB", 500, None));
        assert_eq!(rank(&a, &b), Ordering::Less);
        assert_eq!(rank(&b, &a), Ordering::Greater);
    }

    #[test]
    fn test_status_derivation() {
        let pressure = 0.8;
        assert_eq!(
            derive_status(&record("A", 10, Some(-60.0)), pressure),
            CandidateStatus::Exited
        );
        assert_eq!(
            derive_status(&record("A", 10, Some(40.0)), pressure),
            CandidateStatus::Pumping
        );
        assert_eq!(
            derive_status(&record("A", 10, Some(2.0)), pressure),
            CandidateStatus::Consolidating
        );
        assert_eq!(
            derive_status(&record("A", 10, Some(15.0)), pressure),
            CandidateStatus::Watching
        );
        assert_eq!(
            derive_status(&record("A", 10, Some(40.0)), 0.3),
            CandidateStatus::Watching
        );
    }

    #[test]
    fn test_warnings_for_risky_record() {
        let mut r = record("A", 10, None);
        r.mint_authority_disabled = false;
        r.liquidity = Some(2_000.0);
        r.organic_score = 10.0;
        let warnings = collect_warnings(&r);
        assert!(warnings.contains(&"mint authority active".to_string()));
        assert!(warnings.contains(&"thin liquidity".to_string()));
        assert!(warnings.contains(&"low organic activity".to_string()));
        assert!(!warnings.contains(&"freeze authority active".to_string()));
    }

    #[test]
    fn test_paginate_empty() {
        let result = paginate(Vec::new(), 1, 10);
        assert_eq!(result.total, 0);
        assert_eq!(result.total_pages, 0);
        assert!(!result.has_more);
        assert!(result.candidates.is_empty());
    }

    #[test]
    fn test_paginate_past_end() {
        let candidates: Vec<Candidate> =
            (0..5).map(|i| build_candidate(&record(&format!("M{}", i), 10, None))).collect();
        let result = paginate(candidates, 7, 10);
        assert_eq!(result.total, 5);
        assert!(result.candidates.is_empty());
        assert!(!result.has_more);
    }
}
