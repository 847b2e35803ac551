// =============================================================================
// Signals Module
// =============================================================================
//
// Turns the latest indicator row into a discrete BUY/SELL/HOLD signal with an
// ordered list of human-readable reasons.

pub mod scorer;

pub use scorer::{score_latest, IndicatorRow};
