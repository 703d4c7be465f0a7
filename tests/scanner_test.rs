//! Scanner integration tests: dedup, filtering, ranking, pagination, and
//! single-token analysis against mock discovery feeds.

use async_trait::async_trait;
use std::sync::Arc;

use vigil::services::{CandidateScanner, ScannerConfig};
use vigil::sources::DiscoveryFeed;
use vigil::types::{DiscoveryRecord, OrganicLabel, ScanFilters};

/// Discovery feed serving a fixed record list.
struct MockFeed {
    label: String,
    records: Vec<DiscoveryRecord>,
}

impl MockFeed {
    fn new(label: &str, records: Vec<DiscoveryRecord>) -> Arc<dyn DiscoveryFeed> {
        Arc::new(Self {
            label: label.to_string(),
            records,
        })
    }
}

#[async_trait]
impl DiscoveryFeed for MockFeed {
    fn name(&self) -> &str {
        &self.label
    }

    async fn discover(&self) -> anyhow::Result<Vec<DiscoveryRecord>> {
        Ok(self.records.clone())
    }

    async fn search(&self, query: &str) -> anyhow::Result<Option<DiscoveryRecord>> {
        Ok(self
            .records
            .iter()
            .find(|r| r.mint == query || r.symbol == query)
            .cloned())
    }
}

/// Feed that always fails, for outage resilience tests.
struct BrokenFeed;

#[async_trait]
impl DiscoveryFeed for BrokenFeed {
    fn name(&self) -> &str {
        "broken"
    }

    async fn discover(&self) -> anyhow::Result<Vec<DiscoveryRecord>> {
        anyhow::bail!("upstream 502")
    }

    async fn search(&self, _query: &str) -> anyhow::Result<Option<DiscoveryRecord>> {
        anyhow::bail!("upstream 502")
    }
}

/// A solid mid-tier record; tests tweak fields from here.
fn record(mint: &str, holders: u64) -> DiscoveryRecord {
    DiscoveryRecord {
        mint: mint.to_string(),
        name: format!("Token {}", mint),
        symbol: mint.to_string(),
        price: Some(0.002),
        liquidity: Some(50_000.0),
        market_cap: Some(400_000.0),
        holder_count: holders,
        organic_score: 60.0,
        organic_label: OrganicLabel::Medium,
        mint_authority_disabled: true,
        freeze_authority_disabled: true,
        buy_volume: 4_000.0,
        sell_volume: 2_000.0,
        num_buys: 120,
        num_sells: 60,
        num_net_buyers: 80,
        price_change_24h: Some(12.0),
        created_at: None,
    }
}

fn scanner(feeds: Vec<Arc<dyn DiscoveryFeed>>) -> Arc<CandidateScanner> {
    CandidateScanner::new(ScannerConfig::default(), feeds)
}

#[tokio::test]
async fn test_dedup_across_feeds() {
    let shared = record("DUP", 300);
    let feed_a = MockFeed::new("a", vec![shared.clone(), record("A1", 200)]);
    let feed_b = MockFeed::new("b", vec![shared, record("B1", 250)]);
    let scanner = scanner(vec![feed_a, feed_b]);

    let page = scanner.scan(&ScanFilters::default(), 1, 20).await;
    assert_eq!(page.total, 3);
    let dup_count = page.candidates.iter().filter(|c| c.mint == "DUP").count();
    assert_eq!(dup_count, 1);
}

#[tokio::test]
async fn test_pagination_27_records() {
    // Distinct holder counts give a fully deterministic ranking.
    let records: Vec<DiscoveryRecord> = (0..27)
        .map(|i| record(&format!("M{:02}", i), 200 + i))
        .collect();
    let scanner = scanner(vec![MockFeed::new("a", records)]);
    let filters = ScanFilters::default();

    let page1 = scanner.scan(&filters, 1, 10).await;
    assert_eq!(page1.total, 27);
    assert_eq!(page1.total_pages, 3);
    assert_eq!(page1.candidates.len(), 10);
    assert!(page1.has_more);
    // Highest holder count ranks first among equal scores.
    assert_eq!(page1.candidates[0].holder_count, 226);

    let page2 = scanner.scan(&filters, 2, 10).await;
    assert_eq!(page2.candidates.len(), 10);
    assert!(page2.has_more);

    let page3 = scanner.scan(&filters, 3, 10).await;
    assert_eq!(page3.candidates.len(), 7);
    assert!(!page3.has_more);

    // Pages do not overlap.
    let mut seen: Vec<String> = Vec::new();
    for page in [&page1, &page2, &page3] {
        for candidate in &page.candidates {
            assert!(!seen.contains(&candidate.mint));
            seen.push(candidate.mint.clone());
        }
    }
    assert_eq!(seen.len(), 27);
}

#[tokio::test]
async fn test_ranking_prefers_higher_scores() {
    // Deeper liquidity lifts both the liquidity and churn factors.
    let mut strong = record("STRONG", 200);
    strong.liquidity = Some(120_000.0);
    strong.buy_volume = 8_000.0;
    strong.sell_volume = 2_000.0;
    let scanner = scanner(vec![MockFeed::new(
        "a",
        vec![record("WEAK", 5_000), strong],
    )]);

    let page = scanner.scan(&ScanFilters::default(), 1, 10).await;
    assert_eq!(page.candidates[0].mint, "STRONG");
    assert!(page.candidates[0].score > page.candidates[1].score);
}

#[tokio::test]
async fn test_filters_drop_ineligible_records() {
    let records = vec![
        record("SMALL", 50),
        record("MID", 500),
        record("BIG", 20_000),
    ];
    let scanner = scanner(vec![MockFeed::new("a", records)]);

    let filters = ScanFilters {
        min_holders: 100,
        max_holders: 10_000,
        min_score: 0,
        min_total_trades: 0,
    };
    let page = scanner.scan(&filters, 1, 10).await;
    assert_eq!(page.total, 1);
    assert_eq!(page.candidates[0].mint, "MID");
}

#[tokio::test]
async fn test_min_score_and_trade_filters() {
    let mut quiet = record("QUIET", 500);
    quiet.num_buys = 5;
    quiet.num_sells = 3;
    let scanner = scanner(vec![MockFeed::new("a", vec![record("ACTIVE", 500), quiet])]);

    let filters = ScanFilters {
        min_total_trades: 50,
        ..ScanFilters::default()
    };
    let page = scanner.scan(&filters, 1, 10).await;
    assert_eq!(page.total, 1);
    assert_eq!(page.candidates[0].mint, "ACTIVE");

    // An unreachable score threshold empties the result set.
    let filters = ScanFilters {
        min_score: 99,
        ..ScanFilters::default()
    };
    let page = scanner.scan(&filters, 1, 10).await;
    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 0);
    assert!(!page.has_more);
}

#[tokio::test]
async fn test_scan_survives_broken_feed() {
    let scanner = scanner(vec![
        Arc::new(BrokenFeed) as Arc<dyn DiscoveryFeed>,
        MockFeed::new("ok", vec![record("OK", 400)]),
    ]);
    let page = scanner.scan(&ScanFilters::default(), 1, 10).await;
    assert_eq!(page.total, 1);
    assert_eq!(page.candidates[0].mint, "OK");
}

#[tokio::test]
async fn test_analyze_resolves_and_scores() {
    let mut target = record("TARGET", 800);
    target.buy_volume = 8_000.0;
    let scanner = scanner(vec![MockFeed::new("a", vec![target])]);
    let candidate = scanner.analyze("TARGET").await.expect("record exists");
    assert_eq!(candidate.mint, "TARGET");
    assert!(candidate.score > 0);
    assert!(candidate
        .signals
        .iter()
        .any(|s| s == "strong buy pressure"));
}

#[tokio::test]
async fn test_analyze_enforces_holder_floor() {
    // 40 holders is below the default floor of 100, regardless of filters.
    let scanner = scanner(vec![MockFeed::new("a", vec![record("SPARSE", 40)])]);
    assert!(scanner.analyze("SPARSE").await.is_none());
}

#[tokio::test]
async fn test_analyze_unknown_mint_is_absent() {
    let scanner = scanner(vec![MockFeed::new("a", vec![record("KNOWN", 500)])]);
    assert!(scanner.analyze("UNKNOWN").await.is_none());
}
