// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators computed by the
// engine.  Every public function returns a full index-aligned column of
// `Option<f64>`, so callers must handle warm-up and degenerate windows
// explicitly instead of receiving a silently-wrong number.

pub mod rolling;
pub mod rsi;
pub mod macd;
pub mod atr;
pub mod adx;
pub mod bollinger;

pub use rolling::Column;

/// Lengths of the simple moving averages drawn on the price panel.
pub const SMA_PERIODS: [usize; 3] = [20, 50, 200];
