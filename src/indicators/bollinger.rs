// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), with σ the sample standard deviation of the
// same window.

use super::rolling::{defined, rolling_std, simple_moving_average, Column};

pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_NUM_STD: f64 = 2.0;

/// Result of a Bollinger Band calculation, one entry per input close.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerResult {
    pub upper: Column,
    pub middle: Column,
    pub lower: Column,
}

/// Calculate Bollinger Bands for the given closing prices.
///
/// - `upper`  = SMA + `num_std` * σ
/// - `middle` = SMA
/// - `lower`  = SMA - `num_std` * σ
///
/// All three bands are undefined for the first `period - 1` closes.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> BollingerResult {
    let closes = defined(closes);
    let middle = simple_moving_average(&closes, period);
    let std_dev = rolling_std(&closes, period);

    let band = |sign: f64| -> Column {
        middle
            .iter()
            .zip(&std_dev)
            .map(|(m, s)| {
                let value = (*m)? + sign * num_std * (*s)?;
                value.is_finite().then_some(value)
            })
            .collect()
    };
    let upper = band(1.0);
    let lower = band(-1.0);

    BollingerResult {
        upper,
        middle,
        lower,
    }
}
