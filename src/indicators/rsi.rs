// =============================================================================
// Relative Strength Index (RSI) — simple-average variant
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — delta[i] = close[i] - close[i-1]   (undefined at i = 0)
// Step 2 — gain = max(delta, 0), loss = max(-delta, 0)
// Step 3 — avg_gain = SMA(gain, period), avg_loss = SMA(loss, period)
//          (plain rolling means, not Wilder's smoothing)
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Thresholds:  RSI > 70 => Overbought,  RSI < 30 => Oversold.
// =============================================================================

use super::rolling::{diff, simple_moving_average, Column};

/// Standard RSI look-back.
pub const RSI_PERIOD: usize = 14;

/// Compute the RSI column for `closes`.
///
/// The first defined value sits at index `period`: one bar is consumed by the
/// first difference and `period` deltas fill the averaging window.
///
/// # Edge cases
/// - Only gains in the window (avg_loss == 0) => 100.0.
/// - No movement at all (both averages zero) => undefined.
/// - Only losses in the window => 0.0.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Column {
    let deltas = diff(closes);
    let gains: Column = deltas.iter().map(|d| d.map(|d| d.max(0.0))).collect();
    let losses: Column = deltas.iter().map(|d| d.map(|d| (-d).max(0.0))).collect();

    let avg_gain = simple_moving_average(&gains, period);
    let avg_loss = simple_moving_average(&losses, period);

    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(g, l)| rsi_from_averages((*g)?, (*l)?))
        .collect()
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// A window with no movement has no meaningful strength ratio (0 / 0), so it
/// is reported as undefined instead of inventing a neutral reading.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { None } else { Some(100.0) };
    }
    let rs = avg_gain / avg_loss;
    let rsi = 100.0 - 100.0 / (1.0 + rs);
    rsi.is_finite().then_some(rsi)
}
