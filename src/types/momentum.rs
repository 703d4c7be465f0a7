use serde::{Deserialize, Serialize};

/// Classification of a momentum reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MomentumSignal {
    Oversold,
    Overbought,
    Neutral,
}

/// Position of the current reading relative to its smoothing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crossover {
    Above,
    Below,
}

/// Moving-average type used for the smoothing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SmoothingType {
    Ema,
    Sma,
}

impl SmoothingType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "EMA" => Some(SmoothingType::Ema),
            "SMA" => Some(SmoothingType::Sma),
            _ => None,
        }
    }
}

/// Result of a momentum computation over a close-price series.
///
/// A pure value: the engine never mutates token state, the tracker stores
/// the latest reading per token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentumReading {
    /// Bounded oscillator value in [0, 100]. Zero when `insufficient_data`.
    pub value: f64,
    pub signal: MomentumSignal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoothing_line: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crossover: Option<Crossover>,
    pub period: usize,
    pub smoothing_period: usize,
    pub smoothing_type: SmoothingType,
    pub insufficient_data: bool,
    pub samples_have: usize,
    pub samples_need: usize,
}

impl MomentumReading {
    /// The empty reading reported before enough closes have accumulated.
    pub fn insufficient(
        have: usize,
        period: usize,
        smoothing_period: usize,
        smoothing_type: SmoothingType,
    ) -> Self {
        Self {
            value: 0.0,
            signal: MomentumSignal::Neutral,
            smoothing_line: None,
            crossover: None,
            period,
            smoothing_period,
            smoothing_type,
            insufficient_data: true,
            samples_have: have,
            samples_need: period + smoothing_period + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothing_type_from_str() {
        assert_eq!(SmoothingType::from_str("ema"), Some(SmoothingType::Ema));
        assert_eq!(SmoothingType::from_str("SMA"), Some(SmoothingType::Sma));
        assert_eq!(SmoothingType::from_str("wma"), None);
    }

    #[test]
    fn test_insufficient_reading_shape() {
        let reading = MomentumReading::insufficient(5, 14, 9, SmoothingType::Ema);
        assert!(reading.insufficient_data);
        assert_eq!(reading.value, 0.0);
        assert_eq!(reading.signal, MomentumSignal::Neutral);
        assert_eq!(reading.samples_have, 5);
        assert_eq!(reading.samples_need, 24);
        assert!(reading.smoothing_line.is_none());
        assert!(reading.crossover.is_none());
    }
}
