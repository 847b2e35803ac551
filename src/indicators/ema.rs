// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   k     = 2 / (period + 1)
//   EMA_t = close_t * k + EMA_{t-1} * (1 - k)
//
// The first EMA value is seeded with the SMA of the first `period` closes and
// sits at index `period - 1`; everything before that is undefined.
// =============================================================================

/// Compute the EMA series for the given `values` and look-back `period`.
///
/// The output is index-aligned with the input: `out.len() == values.len()`,
/// with `None` at every position where the indicator is undefined
/// (insufficient history).
///
/// # Edge cases
/// - `period == 0` => all `None` (division by zero guard)
/// - `values.len() < period` => all `None`
pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return result;
    }

    let k = 2.0 / (period + 1) as f64;

    // Seed: SMA of the first `period` values, placed at index `period - 1`.
    let seed: f64 = values[..period].iter().sum::<f64>() / period as f64;
    result[period - 1] = Some(seed);

    let mut prev = seed;
    for i in period..values.len() {
        let next = values[i] * k + prev * (1.0 - k);
        result[i] = Some(next);
        prev = next;
    }

    result
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_empty_input() {
        assert!(ema(&[], 5).is_empty());
    }

    #[test]
    fn ema_period_zero() {
        assert_eq!(ema(&[1.0, 2.0, 3.0], 0), vec![None, None, None]);
    }

    #[test]
    fn ema_insufficient_data_is_all_none() {
        let out = ema(&[1.0, 2.0], 5);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(Option::is_none));
    }

    #[test]
    fn ema_output_length_matches_input() {
        for n in 0..20 {
            let values: Vec<f64> = (0..n).map(|i| i as f64).collect();
            assert_eq!(ema(&values, 5).len(), n);
        }
    }

    #[test]
    fn ema_seed_placement_and_recurrence() {
        // closes 1..10, period 3: seed at index 2 = mean(1,2,3) = 2.0,
        // k = 2/4 = 0.5, so index 3 = 4*0.5 + 2.0*0.5 = 3.0.
        let closes: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let out = ema(&closes, 3);

        assert!(out[0].is_none());
        assert!(out[1].is_none());
        assert!((out[2].unwrap() - 2.0).abs() < 1e-10);
        assert!((out[3].unwrap() - 3.0).abs() < 1e-10);

        // Everything from the seed onwards is defined.
        assert!(out[2..].iter().all(Option::is_some));
    }

    #[test]
    fn ema_known_values() {
        // 5-period EMA of [1..10]: SMA of first 5 = 3.0, k = 2/6 = 1/3.
        let closes: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let out = ema(&closes, 5);

        let k = 2.0 / 6.0;
        let mut expected = 3.0;
        assert!((out[4].unwrap() - expected).abs() < 1e-10);
        for (i, &c) in closes.iter().enumerate().skip(5) {
            expected = c * k + expected * (1.0 - k);
            let got = out[i].unwrap();
            assert!((got - expected).abs() < 1e-10, "index {i}: got {got}, expected {expected}");
        }
    }

    #[test]
    fn ema_deterministic() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + (i % 7) as f64).collect();
        assert_eq!(ema(&closes, 9), ema(&closes, 9));
    }
}
