use serde::{Deserialize, Serialize};

/// Feed-supplied organic-activity tier distinguishing genuine trading
/// activity from wash activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganicLabel {
    High,
    Medium,
    Low,
}

impl OrganicLabel {
    /// Unknown labels are treated as the lowest tier.
    pub fn from_label(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "high" => OrganicLabel::High,
            "medium" => OrganicLabel::Medium,
            _ => OrganicLabel::Low,
        }
    }
}

/// Per-token trading statistics for a lookback window.
///
/// An immutable input to the scoring engine; the engine never retains it.
#[derive(Debug, Clone, PartialEq)]
pub struct TradingSnapshot {
    pub buy_volume: f64,
    pub sell_volume: f64,
    pub num_buys: u64,
    pub num_sells: u64,
    pub num_net_buyers: i64,
    /// Pool liquidity in USD.
    pub liquidity: f64,
    pub market_cap: f64,
    pub holder_count: u64,
    pub organic_score: f64,
    pub organic_label: OrganicLabel,
    pub mint_authority_disabled: bool,
    pub freeze_authority_disabled: bool,
}

impl TradingSnapshot {
    pub fn total_volume(&self) -> f64 {
        self.buy_volume + self.sell_volume
    }

    pub fn total_trades(&self) -> u64 {
        self.num_buys + self.num_sells
    }

    /// Fraction of volume on the buy side; 0 when there is no volume.
    pub fn buy_pressure(&self) -> f64 {
        let total = self.total_volume();
        if total > 0.0 {
            self.buy_volume / total
        } else {
            0.0
        }
    }
}

/// Discrete verdict derived from the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "healthy")]
    Healthy,
    #[serde(rename = "risky")]
    Risky,
    #[serde(rename = "red-flag")]
    RedFlag,
}

/// Composite health score with advisory signal tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Clamped to [0, 100].
    pub score: u32,
    pub verdict: Verdict,
    pub signals: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organic_label_parsing() {
        assert_eq!(OrganicLabel::from_label("High"), OrganicLabel::High);
        assert_eq!(OrganicLabel::from_label("medium"), OrganicLabel::Medium);
        assert_eq!(OrganicLabel::from_label("low"), OrganicLabel::Low);
        assert_eq!(OrganicLabel::from_label("garbage"), OrganicLabel::Low);
    }

    #[test]
    fn test_buy_pressure_zero_volume() {
        let snapshot = TradingSnapshot {
            buy_volume: 0.0,
            sell_volume: 0.0,
            num_buys: 0,
            num_sells: 0,
            num_net_buyers: 0,
            liquidity: 0.0,
            market_cap: 0.0,
            holder_count: 0,
            organic_score: 0.0,
            organic_label: OrganicLabel::Low,
            mint_authority_disabled: false,
            freeze_authority_disabled: false,
        };
        assert_eq!(snapshot.buy_pressure(), 0.0);
    }

    #[test]
    fn test_verdict_serialization() {
        assert_eq!(
            serde_json::to_string(&Verdict::RedFlag).unwrap(),
            "\"red-flag\""
        );
        assert_eq!(
            serde_json::to_string(&Verdict::Healthy).unwrap(),
            "\"healthy\""
        );
    }
}
