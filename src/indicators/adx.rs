// =============================================================================
// Average Directional Index (ADX)
// =============================================================================
//
// ADX quantifies trend **strength**.
//
// Calculation pipeline (rolling sums, no Wilder smoothing):
//   1. +DM[i] = high[i] - high[i-1], set to 0 when negative.
//      -DM[i] = low[i]  - low[i-1],  set to 0 when positive.
//      Each side is clamped on its own sign only; there is no "larger move
//      wins" rule, and -DM keeps its (non-positive) sign.
//   2. TR from the ATR stage.
//   3. TR14 = Σ TR, +DI = 100 * Σ +DM / TR14, -DI = 100 * Σ -DM / TR14
//   4. DX  = 100 * |+DI - -DI| / (+DI + -DI)
//   5. ADX = SMA(DX, period)
//
// Warm-up compounds: DI/DX need `period` defined TR values (index `period`),
// and ADX needs `period` DX values on top (index `2 * period - 1`).
//
// Interpretation:
//   ADX > 25  => trending market
// =============================================================================

use super::rolling::{diff, rolling_sum, simple_moving_average, Column};
use crate::types::Bar;

pub const ADX_PERIOD: usize = 14;

/// Intermediate directional columns, exposed for inspection and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalIndex {
    pub plus_di: Column,
    pub minus_di: Column,
    pub dx: Column,
}

/// Compute +DI, -DI and DX from `bars` and their precomputed `true_range`.
pub fn directional_index(bars: &[Bar], true_range: &[Option<f64>], period: usize) -> DirectionalIndex {
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();

    let plus_dm: Column = diff(&highs).iter().map(|d| d.map(|d| d.max(0.0))).collect();
    let minus_dm: Column = diff(&lows).iter().map(|d| d.map(|d| d.min(0.0))).collect();

    let tr_sum = rolling_sum(true_range, period);
    let plus_di = di_column(&rolling_sum(&plus_dm, period), &tr_sum);
    let minus_di = di_column(&rolling_sum(&minus_dm, period), &tr_sum);

    let dx = plus_di
        .iter()
        .zip(&minus_di)
        .map(|(p, m)| compute_dx((*p)?, (*m)?))
        .collect();

    DirectionalIndex {
        plus_di,
        minus_di,
        dx,
    }
}

/// ADX column from `bars` and their precomputed `true_range`.
pub fn calculate_adx(bars: &[Bar], true_range: &[Option<f64>], period: usize) -> Column {
    let di = directional_index(bars, true_range, period);
    simple_moving_average(&di.dx, period)
}

// =============================================================================
// Internal helpers
// =============================================================================

/// 100 * dm_sum / tr_sum.  A window without any range has no directional
/// movement either, so a zero TR sum resolves to 0.0.
fn di_column(dm_sum: &[Option<f64>], tr_sum: &[Option<f64>]) -> Column {
    dm_sum
        .iter()
        .zip(tr_sum)
        .map(|(dm, tr)| {
            let (dm, tr) = ((*dm)?, (*tr)?);
            if tr == 0.0 {
                return Some(0.0);
            }
            let di = 100.0 * dm / tr;
            di.is_finite().then_some(di)
        })
        .collect()
}

/// DX from the two directional indicators.  A zero DI sum resolves to 0.0.
fn compute_dx(plus_di: f64, minus_di: f64) -> Option<f64> {
    let di_sum = plus_di + minus_di;
    if di_sum == 0.0 {
        return Some(0.0);
    }

    let dx = (plus_di - minus_di).abs() / di_sum * 100.0;
    dx.is_finite().then_some(dx)
}
