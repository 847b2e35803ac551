// =============================================================================
// Snapshot / Analysis Service — read-only query surface
// =============================================================================
//
// Combines Store + Indicator Engine + Scorer into response payloads.
//
// Pipeline (per request, nothing cached):
//   1. Take a store snapshot (the only locked step).
//   2. Compute EMA9 / EMA21 / RSI14 / MACD over the full window.
//   3. Snapshot: return the aligned tails.
//      Analyze: score the latest row, build a compact numeric summary, and
//      delegate the narrative to the text-generation collaborator.
// =============================================================================

use serde::Serialize;

use crate::app_state::AppState;
use crate::error::EngineError;
use crate::indicators::{ema, macd_default, rsi};
use crate::signals::{score_latest, IndicatorRow};
use crate::types::{Candle, Signal};

/// Candles required before every indicator in the row is defined: the MACD
/// signal line is the slowest to warm up (26 + 9 - 1).
const MIN_CANDLES_FOR_SIGNAL: usize = 34;

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub symbol: String,
    pub interval: String,
    pub candles: Vec<Candle>,
    pub ema9: Vec<Option<f64>>,
    pub ema21: Vec<Option<f64>>,
    pub rsi14: Vec<Option<f64>>,
    pub last: Option<Candle>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub resposta: String,
    pub signal: Signal,
}

/// Build the snapshot payload: aligned tails of the price and indicator
/// series plus the most recent candle. An empty window is not an error here —
/// the caller simply gets empty sequences and `last: null`.
pub fn build_snapshot(state: &AppState) -> SnapshotResponse {
    let candles = state.store.snapshot();
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let ema9_series = ema(&closes, 9);
    let ema21_series = ema(&closes, 21);
    let rsi14_series = rsi(&closes, 14);

    let tail_len = state.config.tail_len;
    let last = candles.last().cloned();

    SnapshotResponse {
        symbol: state.config.symbol.clone(),
        interval: state.config.interval.clone(),
        candles: tail(candles, tail_len),
        ema9: tail(ema9_series, tail_len),
        ema21: tail(ema21_series, tail_len),
        rsi14: tail(rsi14_series, tail_len),
        last,
    }
}

/// Score the current window and produce the narrative answer.
///
/// Fails with `InsufficientData` when the window is empty or still warming
/// up; narrative-collaborator failures are absorbed by the narrator and never
/// fail the request.
pub async fn analyze(state: &AppState, note: &str) -> Result<AnalyzeResponse, EngineError> {
    let candles = state.store.snapshot();
    if candles.is_empty() {
        return Err(EngineError::InsufficientData(format!(
            "no candles ingested yet for {} {} — try again shortly",
            state.config.symbol, state.config.interval
        )));
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let ema9_series = ema(&closes, 9);
    let ema21_series = ema(&closes, 21);
    let rsi14_series = rsi(&closes, 14);
    let macd_series = macd_default(&closes);

    let last_candle = candles.last().expect("window checked non-empty");

    // Every indicator must be defined on the latest row before scoring.
    let row = match (
        ema9_series.last().copied().flatten(),
        ema21_series.last().copied().flatten(),
        rsi14_series.last().copied().flatten(),
        macd_series.macd.last().copied().flatten(),
        macd_series.signal.last().copied().flatten(),
    ) {
        (Some(ema9), Some(ema21), Some(rsi), Some(macd), Some(macd_signal)) => IndicatorRow {
            close: last_candle.close,
            ema9,
            ema21,
            rsi,
            macd,
            macd_signal,
            time: last_candle.timestamp,
        },
        _ => {
            return Err(EngineError::InsufficientData(format!(
                "indicators still warming up for {} {}: {} candles, need {}",
                state.config.symbol,
                state.config.interval,
                candles.len(),
                MIN_CANDLES_FOR_SIGNAL
            )));
        }
    };

    let signal = score_latest(row)?;
    let summary = build_summary(state, &closes, &signal);
    let resposta = state.narrator.narrate(&signal, &summary, note).await;

    Ok(AnalyzeResponse { resposta, signal })
}

/// Compact numeric summary handed to the text-generation collaborator.
///
/// Only the last `summary_points` closes are included to bound payload size;
/// the indicator values are the already-scored latest row.
fn build_summary(state: &AppState, closes: &[f64], signal: &Signal) -> String {
    let points = state.config.summary_points;
    let start = closes.len().saturating_sub(points);
    let recent: Vec<String> = closes[start..].iter().map(|c| format!("{c:.2}")).collect();

    format!(
        "Symbol: {} ({})\n\
         Last {} closes: {}\n\
         Close {:.2} | EMA9 {:.2} | EMA21 {:.2} | RSI14 {:.1} | MACD {:.4} | MACD signal {:.4}\n\
         Rule-based signal: {} (score {})\n\
         Reasons: {}",
        state.config.symbol,
        state.config.interval,
        recent.len(),
        recent.join(", "),
        signal.close,
        signal.ema9,
        signal.ema21,
        signal.rsi,
        signal.macd,
        signal.macd_signal,
        signal.label,
        signal.score,
        signal.reasons.join("; "),
    )
}

/// Keep only the last `n` elements, preserving order.
fn tail<T>(mut values: Vec<T>, n: usize) -> Vec<T> {
    if values.len() > n {
        values.drain(..values.len() - n);
    }
    values
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::test_support::test_state;
    use crate::types::SignalLabel;

    fn fill_ascending(state: &AppState, n: usize) {
        for i in 0..n {
            let close = 100.0 + i as f64;
            state.store.append(Candle::new(
                i as i64 * 60_000,
                close,
                close + 1.0,
                close - 1.0,
                close,
                10.0,
            ));
        }
    }

    #[test]
    fn tail_keeps_last_elements() {
        assert_eq!(tail(vec![1, 2, 3, 4, 5], 3), vec![3, 4, 5]);
        assert_eq!(tail(vec![1, 2], 5), vec![1, 2]);
        assert_eq!(tail(Vec::<i32>::new(), 3), Vec::<i32>::new());
    }

    #[test]
    fn snapshot_of_empty_store() {
        let state = test_state(300);
        let snap = build_snapshot(&state);
        assert!(snap.candles.is_empty());
        assert!(snap.ema9.is_empty());
        assert!(snap.last.is_none());
        assert_eq!(snap.symbol, "BTCUSDT");
    }

    #[test]
    fn snapshot_tails_are_bounded_and_aligned() {
        let state = test_state(300);
        fill_ascending(&state, 200);

        let snap = build_snapshot(&state);
        assert_eq!(snap.candles.len(), 120);
        assert_eq!(snap.ema9.len(), 120);
        assert_eq!(snap.ema21.len(), 120);
        assert_eq!(snap.rsi14.len(), 120);

        // Tails stay index-aligned: the last close matches the last candle,
        // and the last candle matches `last`.
        let last = snap.last.as_ref().unwrap();
        assert_eq!(snap.candles.last().unwrap().timestamp, last.timestamp);
        // Deep in the series every indicator is defined.
        assert!(snap.ema9.last().unwrap().is_some());
        assert!(snap.rsi14.last().unwrap().is_some());
    }

    #[test]
    fn snapshot_short_window_keeps_none_markers() {
        let state = test_state(300);
        fill_ascending(&state, 10);

        let snap = build_snapshot(&state);
        assert_eq!(snap.candles.len(), 10);
        assert_eq!(snap.ema21.len(), 10);
        // 10 < 21: EMA21 completely undefined, markers preserved.
        assert!(snap.ema21.iter().all(Option::is_none));
    }

    #[tokio::test]
    async fn analyze_empty_window_is_insufficient_data() {
        let state = test_state(300);
        let err = analyze(&state, "").await.unwrap_err();
        assert!(matches!(err, EngineError::InsufficientData(_)));
    }

    #[tokio::test]
    async fn analyze_during_warmup_is_insufficient_data() {
        let state = test_state(300);
        fill_ascending(&state, 10);

        let err = analyze(&state, "").await.unwrap_err();
        match err {
            EngineError::InsufficientData(msg) => assert!(msg.contains("warming up")),
            other => panic!("expected InsufficientData, got {other}"),
        }
    }

    #[tokio::test]
    async fn analyze_scores_and_narrates() {
        let state = test_state(300);
        fill_ascending(&state, 60);

        let out = analyze(&state, "how does it look?").await.unwrap();

        // Steadily rising series: bullish trend (+1), bullish MACD (+1),
        // but RSI pinned at 100 => overbought (-1) => score 1 => HOLD.
        assert_eq!(out.signal.score, 1);
        assert_eq!(out.signal.label, SignalLabel::Hold);
        assert_eq!(out.signal.reasons.len(), 3);
        assert_eq!(out.signal.time, 59 * 60_000);

        // Local narrator: deterministic template with the numeric fields.
        assert!(out.resposta.contains("HOLD"));
        assert!(out.resposta.contains("how does it look?"));
    }

    #[tokio::test]
    async fn analyze_is_repeatable() {
        let state = test_state(300);
        fill_ascending(&state, 60);

        let a = analyze(&state, "").await.unwrap();
        let b = analyze(&state, "").await.unwrap();
        assert_eq!(a.signal.score, b.signal.score);
        assert_eq!(a.resposta, b.resposta);
    }

    #[test]
    fn summary_bounds_the_close_count() {
        let state = test_state(300);
        fill_ascending(&state, 60);
        let closes: Vec<f64> = state.store.snapshot().iter().map(|c| c.close).collect();

        let signal = Signal {
            label: SignalLabel::Hold,
            score: 0,
            close: 159.0,
            rsi: 50.0,
            ema9: 150.0,
            ema21: 140.0,
            macd: 1.0,
            macd_signal: 1.0,
            time: 0,
            reasons: vec!["a".into(), "b".into(), "c".into()],
        };

        let summary = build_summary(&state, &closes, &signal);
        assert!(summary.contains("Last 30 closes"));
        assert!(summary.contains("Symbol: BTCUSDT"));
    }
}
