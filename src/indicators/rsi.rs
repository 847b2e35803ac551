// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Seed average gain / average loss with the SMA of the first `period`
//          gains / losses; the first RSI value sits at index `period`.
// Step 3 — Apply Wilder's exponential smoothing:
//            avg_gain = (prev_avg_gain * (period - 1) + current_gain) / period
//            avg_loss = (prev_avg_loss * (period - 1) + current_loss) / period
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// When avg_loss == 0 the RSI is exactly 100.0 (division by zero guard).
// =============================================================================

/// Compute the RSI series for the given `values` and `period`.
///
/// The output is index-aligned with the input: `out.len() == values.len()`,
/// `None` for every index below `period` and whenever there is insufficient
/// history (`values.len() < period + 1` yields all `None`).
///
/// Result values are always within [0, 100].
pub fn rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if period == 0 || values.len() < period + 1 {
        return result;
    }

    // Per-step gain/loss from consecutive deltas; delta at index 0 is 0.
    let deltas: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    // Seed averages over the first `period` deltas (input indices 1..=period).
    let (sum_gain, sum_loss) = deltas[..period]
        .iter()
        .fold((0.0_f64, 0.0_f64), |(g, l), &d| {
            if d > 0.0 {
                (g + d, l)
            } else {
                (g, l - d)
            }
        });

    let period_f = period as f64;
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;

    result[period] = Some(rsi_from_averages(avg_gain, avg_loss));

    // Wilder's smoothing for every subsequent close.
    for (i, &delta) in deltas.iter().enumerate().skip(period) {
        let gain = if delta > 0.0 { delta } else { 0.0 };
        let loss = if delta < 0.0 { -delta } else { 0.0 };

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;

        // Delta i sits between input i and i+1.
        result[i + 1] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    result
}

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// A zero average loss means no down moves inside the window: RSI is pinned
/// to exactly 100.0 rather than dividing by zero.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_empty_input() {
        assert!(rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_period_zero() {
        assert_eq!(rsi(&[1.0, 2.0, 3.0], 0), vec![None, None, None]);
    }

    #[test]
    fn rsi_insufficient_data_is_all_none() {
        // Need period+1 closes; 14 closes give only 13 deltas.
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        let out = rsi(&closes, 14);
        assert_eq!(out.len(), 14);
        assert!(out.iter().all(Option::is_none));
    }

    #[test]
    fn rsi_ten_flat_closes_all_none() {
        let closes = vec![100.0; 10];
        let out = rsi(&closes, 14);
        assert_eq!(out.len(), 10);
        assert!(out.iter().all(Option::is_none));
    }

    #[test]
    fn rsi_first_value_placement() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let out = rsi(&closes, 14);
        assert!(out[..14].iter().all(Option::is_none));
        assert!(out[14..].iter().all(Option::is_some));
    }

    #[test]
    fn rsi_all_gains_is_exactly_100() {
        // Strictly ascending prices: avg_loss stays 0 => RSI pinned to 100.
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let out = rsi(&closes, 14);
        for v in out.iter().flatten() {
            assert!((v - 100.0).abs() < 1e-12, "expected exactly 100, got {v}");
        }
    }

    #[test]
    fn rsi_flat_market_is_100() {
        // No movement at all: zero losses => 100 by the avg_loss == 0 rule.
        let closes = vec![100.0; 30];
        let out = rsi(&closes, 14);
        assert!(out[14..].iter().all(|v| v == &Some(100.0)));
    }

    #[test]
    fn rsi_all_losses_near_zero() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let out = rsi(&closes, 14);
        for v in out.iter().flatten() {
            assert!(v.abs() < 1e-10, "expected 0, got {v}");
        }
    }

    #[test]
    fn rsi_range_check() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let out = rsi(&closes, 14);
        assert_eq!(out.len(), closes.len());
        for v in out.iter().flatten() {
            assert!((0.0..=100.0).contains(v), "RSI {v} out of range");
        }
    }
}
