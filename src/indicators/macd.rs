// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
// MACD line   = EMA(fast) - EMA(slow), element-wise
// Signal line = EMA(signal) of the MACD line
//
// Alignment is preserved end to end: the MACD line is undefined wherever
// either operand EMA is undefined, and the signal line applies the EMA
// insufficient-history rule to the defined stretch of the MACD line before
// being mapped back onto the original indices.
// =============================================================================

use crate::indicators::ema::ema;

/// MACD and signal line, both index-aligned with the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
}

/// Compute MACD over `values` with the given periods.
///
/// Both output series have the same length as the input. With the defaults
/// (12/26/9) the MACD line is first defined at index 25 and the signal line
/// at index 33.
pub fn macd(values: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);

    // Undefined positions propagate through the subtraction.
    let macd_line: Vec<Option<f64>> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    // The defined stretch of the MACD line is contiguous and starts at the
    // first index where both EMAs exist; run the signal EMA over just that
    // stretch and map its results back onto the original indices.
    let first_defined = macd_line.iter().position(Option::is_some);

    let mut signal_line = vec![None; values.len()];
    if let Some(start) = first_defined {
        let compact: Vec<f64> = macd_line[start..].iter().copied().flatten().collect();
        for (offset, v) in ema(&compact, signal).into_iter().enumerate() {
            signal_line[start + offset] = v;
        }
    }

    MacdSeries {
        macd: macd_line,
        signal: signal_line,
    }
}

/// Compute MACD with the standard 12/26/9 periods.
pub fn macd_default(values: &[f64]) -> MacdSeries {
    macd(values, 12, 26, 9)
}
