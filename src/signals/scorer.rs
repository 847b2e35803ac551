// =============================================================================
// Signal Scorer — three-factor BUY/SELL/HOLD decision
// =============================================================================
//
// Three independent contributions, each worth ±1, summed into a score in
// [-3, 3]:
//
//   Trend     — EMA9 vs EMA21
//   Momentum  — RSI vs the 30/70 oversold/overbought bands
//   MACD      — MACD line vs its signal line
//
// Label mapping: score >= 2 => BUY, score <= -2 => SELL, else HOLD.
//
// Exactly one reason string is appended per factor, always in the order
// trend, momentum, MACD — neutral branches included — so the justification
// reads the same way regardless of which factors fired.
// =============================================================================

use crate::error::EngineError;
use crate::types::{Signal, SignalLabel};

/// The latest fully-defined indicator row for one candle.
///
/// Callers must only build this once every field is available; the scorer
/// still refuses non-finite values rather than folding them into the score.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorRow {
    pub close: f64,
    pub ema9: f64,
    pub ema21: f64,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    /// Open timestamp (ms) of the candle the row belongs to.
    pub time: i64,
}

impl IndicatorRow {
    fn is_finite(&self) -> bool {
        self.close.is_finite()
            && self.ema9.is_finite()
            && self.ema21.is_finite()
            && self.rsi.is_finite()
            && self.macd.is_finite()
            && self.macd_signal.is_finite()
    }
}

/// Score the latest indicator row into a [`Signal`].
pub fn score_latest(row: IndicatorRow) -> Result<Signal, EngineError> {
    if !row.is_finite() {
        return Err(EngineError::Computation(format!(
            "non-finite indicator row at t={}",
            row.time
        )));
    }

    let mut score = 0;
    let mut reasons = Vec::with_capacity(3);

    // ── Trend: EMA9 vs EMA21 ─────────────────────────────────────────────
    if row.ema9 > row.ema21 {
        score += 1;
        reasons.push(format!(
            "EMA9 {:.2} above EMA21 {:.2} (bullish trend)",
            row.ema9, row.ema21
        ));
    } else if row.ema9 < row.ema21 {
        score -= 1;
        reasons.push(format!(
            "EMA9 {:.2} below EMA21 {:.2} (bearish trend)",
            row.ema9, row.ema21
        ));
    } else {
        reasons.push(format!("EMA9 equal to EMA21 at {:.2} (neutral trend)", row.ema9));
    }

    // ── Momentum: RSI bands ──────────────────────────────────────────────
    if row.rsi < 30.0 {
        score += 1;
        reasons.push(format!("RSI {:.1} below 30 (oversold)", row.rsi));
    } else if row.rsi > 70.0 {
        score -= 1;
        reasons.push(format!("RSI {:.1} above 70 (overbought)", row.rsi));
    } else {
        reasons.push(format!("RSI {:.1} in neutral range", row.rsi));
    }

    // ── Momentum confirmation: MACD vs signal line ───────────────────────
    if row.macd > row.macd_signal {
        score += 1;
        reasons.push(format!(
            "MACD {:.4} above signal {:.4} (bullish momentum)",
            row.macd, row.macd_signal
        ));
    } else if row.macd < row.macd_signal {
        score -= 1;
        reasons.push(format!(
            "MACD {:.4} below signal {:.4} (bearish momentum)",
            row.macd, row.macd_signal
        ));
    } else {
        reasons.push(format!(
            "MACD equal to signal at {:.4} (neutral momentum)",
            row.macd
        ));
    }

    let label = if score >= 2 {
        SignalLabel::Buy
    } else if score <= -2 {
        SignalLabel::Sell
    } else {
        SignalLabel::Hold
    };

    Ok(Signal {
        label,
        score,
        close: row.close,
        rsi: row.rsi,
        ema9: row.ema9,
        ema21: row.ema21,
        macd: row.macd,
        macd_signal: row.macd_signal,
        time: row.time,
        reasons,
    })
}
