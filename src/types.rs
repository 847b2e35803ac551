// =============================================================================
// Shared types used across the Pulso analysis engine
// =============================================================================

use serde::{Deserialize, Serialize};

/// A single OHLCV price bar for a fixed time interval.
///
/// Identity is the open `timestamp` (milliseconds since epoch); within one
/// store timestamps are unique and strictly increasing in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Whether every price/volume field is a finite number.
    ///
    /// Candles failing this check are rejected at ingestion so that NaN never
    /// reaches the indicator pipeline.
    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite()
    }
}

/// Discrete trading recommendation derived from the indicator pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalLabel {
    Buy,
    Sell,
    Hold,
}

impl std::fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::Hold => write!(f, "HOLD"),
        }
    }
}

/// A fully scored signal for the most recent candle.
///
/// Recomputed per query from the current window; never cached or persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub label: SignalLabel,
    /// Sum of the three ±1 contributions; always in [-3, 3].
    pub score: i32,
    pub close: f64,
    pub rsi: f64,
    pub ema9: f64,
    pub ema21: f64,
    pub macd: f64,
    pub macd_signal: f64,
    /// Open timestamp (ms) of the candle the signal was derived from.
    pub time: i64,
    /// Human-readable justification, fixed order: trend, momentum, MACD.
    pub reasons: Vec<String>,
}
