//! Scoring engine: composite token-health score from trading statistics.
//!
//! Additive over independent capped factors, deterministic, no I/O. The
//! factor caps sum to exactly 100; the clamp guards future factor edits.

use crate::types::{OrganicLabel, ScoreResult, TradingSnapshot, Verdict};

const VERDICT_HEALTHY: u32 = 70;
const VERDICT_RISKY: u32 = 40;

/// Score a trading snapshot.
///
/// Identical input always yields identical output; the snapshot is never
/// retained.
pub fn score(snapshot: &TradingSnapshot) -> ScoreResult {
    let total = buy_pressure_points(snapshot)
        + liquidity_points(snapshot.liquidity)
        + volume_ratio_points(snapshot)
        + organic_points(snapshot.organic_label)
        + net_buyer_points(snapshot.num_net_buyers)
        + holder_points(snapshot.holder_count)
        + security_points(snapshot);

    let score = total.min(100);
    let verdict = if score >= VERDICT_HEALTHY {
        Verdict::Healthy
    } else if score >= VERDICT_RISKY {
        Verdict::Risky
    } else {
        Verdict::RedFlag
    };

    ScoreResult {
        score,
        verdict,
        signals: signal_tags(snapshot),
    }
}

/// Buy pressure, 0-25 points.
fn buy_pressure_points(snapshot: &TradingSnapshot) -> u32 {
    let pressure = snapshot.buy_pressure();
    if pressure > 0.65 {
        25
    } else if pressure > 0.55 {
        20
    } else if pressure > 0.45 {
        10
    } else {
        0
    }
}

/// Pool liquidity in USD, 0-20 points.
fn liquidity_points(liquidity: f64) -> u32 {
    if liquidity > 100_000.0 {
        20
    } else if liquidity > 50_000.0 {
        15
    } else if liquidity > 20_000.0 {
        10
    } else if liquidity > 10_000.0 {
        5
    } else {
        0
    }
}

/// Window volume as a percentage of pool liquidity, 0-15 points.
///
/// 3-20% churn is the sweet spot; volume above half the pool reads as
/// wash activity and scores nothing. Zero liquidity means zero ratio.
fn volume_ratio_points(snapshot: &TradingSnapshot) -> u32 {
    let ratio = if snapshot.liquidity > 0.0 {
        snapshot.total_volume() / snapshot.liquidity * 100.0
    } else {
        0.0
    };
    if ratio > 3.0 && ratio < 20.0 {
        15
    } else if ratio > 1.0 && ratio < 50.0 {
        10
    } else {
        0
    }
}

/// Feed-supplied organic-activity tier, 0-15 points.
fn organic_points(label: OrganicLabel) -> u32 {
    match label {
        OrganicLabel::High => 15,
        OrganicLabel::Medium => 8,
        OrganicLabel::Low => 0,
    }
}

/// Net unique buyers over the window, 0-10 points.
fn net_buyer_points(net_buyers: i64) -> u32 {
    if net_buyers > 500 {
        10
    } else if net_buyers > 200 {
        7
    } else if net_buyers > 50 {
        5
    } else {
        0
    }
}

/// Holder count, 0-10 points.
fn holder_points(holders: u64) -> u32 {
    if holders > 1000 {
        10
    } else if holders > 500 {
        7
    } else if holders > 100 {
        5
    } else {
        0
    }
}

/// Both authorities revoked, 0 or 5 points.
fn security_points(snapshot: &TradingSnapshot) -> u32 {
    if snapshot.mint_authority_disabled && snapshot.freeze_authority_disabled {
        5
    } else {
        0
    }
}

/// Advisory annotations derived from the same snapshot. Not inputs to the
/// score.
fn signal_tags(snapshot: &TradingSnapshot) -> Vec<String> {
    let mut tags = Vec::new();
    let pressure = snapshot.buy_pressure();

    if pressure > 0.7 {
        tags.push("strong buy pressure".to_string());
    } else if pressure < 0.4 && snapshot.total_volume() > 0.0 {
        tags.push("heavy selling".to_string());
    }

    if snapshot.liquidity > 100_000.0 {
        tags.push("deep liquidity".to_string());
    }

    if snapshot.organic_label == OrganicLabel::High {
        tags.push("organic activity".to_string());
    }

    if snapshot.num_net_buyers > 500 {
        tags.push("strong net inflow".to_string());
    }

    if snapshot.holder_count > 1000 {
        tags.push("broad holder base".to_string());
    }

    if !snapshot.mint_authority_disabled || !snapshot.freeze_authority_disabled {
        tags.push("security risk".to_string());
    }

    tags
}
