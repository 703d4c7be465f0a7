use crate::types::{DiscoveryRecord, OrganicLabel, PriceUpdate};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

const JUPITER_API_URL: &str = "https://lite-api.jup.ag";
const API_TIMEOUT_SECS: u64 = 10;
/// The search endpoint accepts at most this many comma-joined mints.
const SEARCH_BATCH_SIZE: usize = 100;

/// Token record as returned by the Jupiter token endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JupiterToken {
    id: Option<String>,
    name: Option<String>,
    symbol: Option<String>,
    usd_price: Option<f64>,
    liquidity: Option<f64>,
    mcap: Option<f64>,
    holder_count: Option<u64>,
    organic_score: Option<f64>,
    organic_score_label: Option<String>,
    audit: Option<JupiterAudit>,
    first_pool: Option<JupiterFirstPool>,
    #[serde(rename = "stats24h")]
    stats_24h: Option<JupiterStats>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JupiterAudit {
    mint_authority_disabled: Option<bool>,
    freeze_authority_disabled: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JupiterFirstPool {
    created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JupiterStats {
    buy_volume: Option<f64>,
    sell_volume: Option<f64>,
    num_buys: Option<u64>,
    num_sells: Option<u64>,
    num_net_buyers: Option<i64>,
    price_change: Option<f64>,
}

impl JupiterToken {
    /// Normalize the raw payload. Rows without an identity are unusable
    /// and dropped here, at the boundary.
    fn into_record(self) -> Option<DiscoveryRecord> {
        let mint = self.id.filter(|id| !id.is_empty())?;
        let symbol = self.symbol.unwrap_or_default();
        if symbol.is_empty() {
            return None;
        }
        let stats = self.stats_24h.unwrap_or(JupiterStats {
            buy_volume: None,
            sell_volume: None,
            num_buys: None,
            num_sells: None,
            num_net_buyers: None,
            price_change: None,
        });
        let audit = self.audit.unwrap_or(JupiterAudit {
            mint_authority_disabled: None,
            freeze_authority_disabled: None,
        });

        Some(DiscoveryRecord {
            mint,
            name: self.name.unwrap_or_else(|| symbol.clone()),
            symbol,
            price: self.usd_price,
            liquidity: self.liquidity,
            market_cap: self.mcap,
            holder_count: self.holder_count.unwrap_or(0),
            organic_score: self.organic_score.unwrap_or(0.0),
            organic_label: self
                .organic_score_label
                .as_deref()
                .map(OrganicLabel::from_label)
                .unwrap_or(OrganicLabel::Low),
            mint_authority_disabled: audit.mint_authority_disabled.unwrap_or(false),
            freeze_authority_disabled: audit.freeze_authority_disabled.unwrap_or(false),
            buy_volume: stats.buy_volume.unwrap_or(0.0),
            sell_volume: stats.sell_volume.unwrap_or(0.0),
            num_buys: stats.num_buys.unwrap_or(0),
            num_sells: stats.num_sells.unwrap_or(0),
            num_net_buyers: stats.num_net_buyers.unwrap_or(0),
            price_change_24h: stats.price_change,
            created_at: self.first_pool.and_then(|p| p.created_at),
        })
    }
}

/// Jupiter lite-api REST client.
///
/// Serves both roles: batched price lookups for tracked mints and token
/// discovery/search for the scanner.
#[derive(Clone)]
pub struct JupiterClient {
    client: Client,
    base_url: String,
}

impl JupiterClient {
    pub fn new(base_url: Option<String>) -> Self {
        let client = Client::builder()
            .user_agent("Vigil/0.1 (Token Momentum Tracker)")
            .timeout(Duration::from_secs(API_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.unwrap_or_else(|| JUPITER_API_URL.to_string()),
        }
    }

    /// Fetch full token records for a comma-joined query string.
    async fn search_tokens(&self, query: &str) -> anyhow::Result<Vec<JupiterToken>> {
        let url = format!("{}/tokens/v2/search?query={}", self.base_url, query);
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(
                "Jupiter search returned {}: {}",
                status,
                &text[..text.len().min(200)]
            );
            anyhow::bail!("Jupiter API error: {}", status);
        }

        Ok(response.json().await?)
    }

    /// Fetch a category listing, e.g. `toptrending/1h` or `toptraded/24h`.
    async fn category_tokens(
        &self,
        category: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<JupiterToken>> {
        let url = format!(
            "{}/tokens/v2/{}?limit={}",
            self.base_url, category, limit
        );
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Jupiter API error for {}: {}", category, status);
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl super::PriceFeed for JupiterClient {
    /// One batched lookup for the whole watched set. Mints the feed does
    /// not know stay absent from the result map.
    async fn fetch_prices(&self, mints: &[String]) -> anyhow::Result<HashMap<String, PriceUpdate>> {
        let mut updates = HashMap::with_capacity(mints.len());

        for chunk in mints.chunks(SEARCH_BATCH_SIZE) {
            let query = chunk.join(",");
            let tokens = self.search_tokens(&query).await?;
            debug!("Jupiter price batch: {} of {} mints", tokens.len(), chunk.len());

            for token in tokens {
                let Some(record) = token.into_record() else {
                    continue;
                };
                let Some(price) = record.price else {
                    continue;
                };
                updates.insert(
                    record.mint.clone(),
                    PriceUpdate {
                        price,
                        liquidity: record.liquidity,
                        price_change_24h: record.price_change_24h,
                    },
                );
            }
        }

        Ok(updates)
    }
}

/// One configured discovery category backed by the shared Jupiter client.
pub struct JupiterDiscovery {
    client: JupiterClient,
    category: String,
    limit: usize,
}

impl JupiterDiscovery {
    pub fn new(client: JupiterClient, category: impl Into<String>, limit: usize) -> Self {
        Self {
            client,
            category: category.into(),
            limit,
        }
    }
}

#[async_trait]
impl super::DiscoveryFeed for JupiterDiscovery {
    fn name(&self) -> &str {
        &self.category
    }

    async fn discover(&self) -> anyhow::Result<Vec<DiscoveryRecord>> {
        let tokens = self.client.category_tokens(&self.category, self.limit).await?;
        let records: Vec<DiscoveryRecord> =
            tokens.into_iter().filter_map(JupiterToken::into_record).collect();
        debug!("{}: {} discovery records", self.category, records.len());
        Ok(records)
    }

    async fn search(&self, query: &str) -> anyhow::Result<Option<DiscoveryRecord>> {
        let tokens = self.client.search_tokens(query).await?;
        Ok(tokens.into_iter().filter_map(JupiterToken::into_record).next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_normalization() {
        let json = r#"{
            "id": "So11111111111111111111111111111111111111112",
            "name": "Wrapped SOL",
            "symbol": "SOL",
            "usdPrice": 147.2,
            "liquidity": 1200000.0,
            "mcap": 69000000000.0,
            "holderCount": 1500000,
            "organicScore": 99.1,
            "organicScoreLabel": "high",
            "audit": {"mintAuthorityDisabled": true, "freezeAuthorityDisabled": true},
            "stats24h": {
                "buyVolume": 1000.0, "sellVolume": 900.0,
                "numBuys": 50, "numSells": 40, "numNetBuyers": 5,
                "priceChange": -1.3
            }
        }"#;
        let token: JupiterToken = serde_json::from_str(json).unwrap();
        let record = token.into_record().expect("valid token");
        assert_eq!(record.symbol, "SOL");
        assert_eq!(record.holder_count, 1_500_000);
        assert_eq!(record.organic_label, OrganicLabel::High);
        assert!(record.mint_authority_disabled);
        assert_eq!(record.price_change_24h, Some(-1.3));
    }

    #[test]
    fn test_token_without_identity_dropped() {
        let token: JupiterToken = serde_json::from_str(r#"{"usdPrice": 1.0}"#).unwrap();
        assert!(token.into_record().is_none());
    }

    #[test]
    fn test_sparse_token_defaults() {
        let token: JupiterToken =
            serde_json::from_str(r#"{"id": "Mint111", "symbol": "TKN"}"#).unwrap();
        let record = token.into_record().expect("identity is enough");
        assert_eq!(record.name, "TKN");
        assert_eq!(record.holder_count, 0);
        assert_eq!(record.organic_label, OrganicLabel::Low);
        assert!(!record.mint_authority_disabled);
        assert!(record.price.is_none());
    }
}
