// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   fast   = EMA(close, 12)
//   slow   = EMA(close, 26)
//   MACD   = fast - slow
//   signal = EMA(MACD, 9)
//
// Both EMAs are seeded with the first close, so every line is defined from
// index 0.  The first ~`MACD_SLOW` values are still dominated by the seed and
// should be read as warm-up, not as a trading signal.
// =============================================================================

use super::rolling::{defined, exponential_moving_average, Column};

pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

/// MACD line and its signal line, index-aligned with the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdResult {
    pub macd: Column,
    pub signal: Column,
}

/// Compute the MACD and signal columns for `closes`.
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdResult {
    let closes = defined(closes);
    let fast_ema = exponential_moving_average(&closes, fast);
    let slow_ema = exponential_moving_average(&closes, slow);

    let macd: Column = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| {
            let value = (*f)? - (*s)?;
            value.is_finite().then_some(value)
        })
        .collect();
    let signal = exponential_moving_average(&macd, signal);

    MacdResult { macd, signal }
}
