// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators used by the
// analysis engine.  Every series function returns a `Vec<Option<f64>>` that is
// index-aligned with its input so that callers never have to re-derive
// offsets; `None` marks positions with insufficient history.

pub mod ema;
pub mod macd;
pub mod rsi;

pub use ema::ema;
pub use macd::{macd, macd_default, MacdSeries};
pub use rsi::rsi;
