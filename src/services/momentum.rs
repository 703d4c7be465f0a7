//! Momentum engine: RSI-style oscillator with a smoothed signal line.
//!
//! Pure functions over a close-price sequence. The tracker feeds these with
//! finalized candle closes plus the live price as a provisional close; the
//! engine itself holds no state.

use crate::types::{Crossover, MomentumReading, MomentumSignal, SmoothingType};

/// Compute the full indicator series using Wilder's recursive smoothing.
///
/// Produces `closes.len() - period` values (empty when fewer than
/// `period + 1` closes are available). The same series backs both the
/// current reading and the charting history so the two never drift.
pub fn momentum_series(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period + 1 {
        return Vec::new();
    }

    let mut gains = Vec::with_capacity(closes.len() - 1);
    let mut losses = Vec::with_capacity(closes.len() - 1);

    for i in 1..closes.len() {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(-change);
        }
    }

    // Seed with the simple mean of the first `period` deltas.
    let mut avg_gain: f64 = gains.iter().take(period).sum::<f64>() / period as f64;
    let mut avg_loss: f64 = losses.iter().take(period).sum::<f64>() / period as f64;

    let mut series = Vec::with_capacity(gains.len() - period + 1);
    series.push(value_from_averages(avg_gain, avg_loss));

    for i in period..gains.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
        series.push(value_from_averages(avg_gain, avg_loss));
    }

    series
}

fn value_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Smooth the indicator series down to a single signal-line value.
///
/// Returns `None` when the series is shorter than the smoothing window.
fn smoothing_line(series: &[f64], smoothing_period: usize, smoothing: SmoothingType) -> Option<f64> {
    if smoothing_period == 0 || series.len() < smoothing_period {
        return None;
    }

    match smoothing {
        SmoothingType::Sma => {
            let sum: f64 = series.iter().rev().take(smoothing_period).sum();
            Some(sum / smoothing_period as f64)
        }
        SmoothingType::Ema => {
            let multiplier = 2.0 / (smoothing_period as f64 + 1.0);
            // First EMA is the SMA of the opening window.
            let seed: f64 =
                series.iter().take(smoothing_period).sum::<f64>() / smoothing_period as f64;
            let mut ema = seed;
            for value in series.iter().skip(smoothing_period) {
                ema = (value - ema) * multiplier + ema;
            }
            Some(ema)
        }
    }
}

/// Compute the current momentum reading for a close-price sequence.
///
/// Fewer than `period + smoothing_period + 1` closes is not an error: the
/// reading comes back with `insufficient_data` set and progress counters so
/// callers can show how far along the warm-up is.
pub fn compute_momentum(
    closes: &[f64],
    period: usize,
    smoothing_period: usize,
    smoothing: SmoothingType,
) -> MomentumReading {
    let need = period + smoothing_period + 1;
    if period == 0 || closes.len() < need {
        return MomentumReading::insufficient(closes.len(), period, smoothing_period, smoothing);
    }

    let series = momentum_series(closes, period);
    let value = series.last().copied().unwrap_or(0.0);
    let line = smoothing_line(&series, smoothing_period, smoothing);

    let signal = if value < 30.0 {
        MomentumSignal::Oversold
    } else if value > 70.0 {
        MomentumSignal::Overbought
    } else {
        MomentumSignal::Neutral
    };

    let crossover = line.and_then(|l| {
        if value > l {
            Some(Crossover::Above)
        } else if value < l {
            Some(Crossover::Below)
        } else {
            None
        }
    });

    MomentumReading {
        value,
        signal,
        smoothing_line: line,
        crossover,
        period,
        smoothing_period,
        smoothing_type: smoothing,
        insufficient_data: false,
        samples_have: closes.len(),
        samples_need: need,
    }
}

/// Last `k` values of the raw indicator series, oldest first.
///
/// Reuses the same recursive computation as [`compute_momentum`]; no
/// classification is applied.
pub fn momentum_history(closes: &[f64], period: usize, k: usize) -> Vec<f64> {
    let series = momentum_series(closes, period);
    let start = series.len().saturating_sub(k);
    series[start..].to_vec()
}
