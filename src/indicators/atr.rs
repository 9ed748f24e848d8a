// =============================================================================
// Average True Range (ATR) — simple average of True Range
// =============================================================================
//
// ATR measures market volatility by decomposing the entire range of a bar.
//
// True Range (TR) for each bar:
//   TR = max(H - L, |H - prevClose|, |L - prevClose|)
//
// The first bar has no previous close, so its TR is undefined.
//
// ATR is the plain rolling mean of TR over `period` bars (not Wilder's
// recursive smoothing), so the first defined ATR sits at index `period`.
//
// Default period: 14
// =============================================================================

use super::rolling::{simple_moving_average, Column};
use crate::types::Bar;

pub const ATR_PERIOD: usize = 14;

/// Per-bar True Range, index-aligned with `bars`.
///
/// Also the input to the ADX stage.  A range that overflows `f64` is
/// undefined.
pub fn true_range(bars: &[Bar]) -> Column {
    let mut out = Vec::with_capacity(bars.len());
    if bars.is_empty() {
        return out;
    }
    out.push(None);
    out.extend(bars.windows(2).map(|w| {
        let (prev, bar) = (&w[0], &w[1]);
        let hl = bar.high - bar.low;
        let hc = (bar.high - prev.close).abs();
        let lc = (bar.low - prev.close).abs();
        let tr = hl.max(hc).max(lc);
        tr.is_finite().then_some(tr)
    }));
    out
}

/// ATR column for `bars`.
pub fn calculate_atr(bars: &[Bar], period: usize) -> Column {
    simple_moving_average(&true_range(bars), period)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    /// Build a test bar with the given OHLC values, one day apart.
    fn candle(i: i64, open: f64, high: f64, low: f64, close: f64) -> Bar {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(i);
        Bar::new(ts, open, high, low, close)
    }

    #[test]
    fn atr_period_zero() {
        let bars: Vec<Bar> = (0..20).map(|i| candle(i, 100.0, 105.0, 95.0, 102.0)).collect();
        assert!(calculate_atr(&bars, 0).iter().all(Option::is_none));
    }

    #[test]
    fn atr_insufficient_data() {
        // 14 bars give only 13 TR values.
        let bars: Vec<Bar> = (0..14).map(|i| candle(i, 100.0, 105.0, 95.0, 102.0)).collect();
        assert!(calculate_atr(&bars, 14).iter().all(Option::is_none));
    }

    #[test]
    fn atr_exact_minimum_data() {
        let bars = vec![
            candle(0, 100.0, 102.0, 98.0, 101.0),
            candle(1, 101.0, 104.0, 99.0, 103.0),
            candle(2, 103.0, 106.0, 100.0, 105.0),
            candle(3, 105.0, 108.0, 102.0, 107.0),
        ];
        let atr = calculate_atr(&bars, 3);
        assert_eq!(atr[..3], [None, None, None]);
        // TR = 5, 6, 6
        let v = atr[3].unwrap();
        assert!((v - 17.0 / 3.0).abs() < 1e-10, "got {v}");
    }

    #[test]
    fn true_range_first_bar_undefined() {
        let bars = vec![candle(0, 1.0, 2.0, 0.5, 1.5)];
        assert_eq!(true_range(&bars), vec![None]);
        assert!(true_range(&[]).is_empty());
    }

    #[test]
    fn true_range_uses_prev_close() {
        // Gap scenario: |H - prevClose| > H - L
        let bars = vec![
            candle(0, 100.0, 105.0, 95.0, 95.0),
            candle(1, 110.0, 115.0, 108.0, 112.0),
            // Gap down: |L - prevClose| = 22 > H - L = 5
            candle(2, 92.0, 95.0, 90.0, 91.0),
        ];
        let tr = true_range(&bars);
        assert_eq!(tr[1], Some(20.0));
        assert_eq!(tr[2], Some(22.0));
    }

    #[test]
    fn overflowing_range_is_undefined() {
        let bars = vec![
            candle(0, 0.0, 1.0, -1.0, 0.0),
            candle(1, 0.0, 1e308, -1e308, 0.0),
            candle(2, 0.0, 1.0, -1.0, 0.0),
        ];
        assert_eq!(true_range(&bars), vec![None, None, Some(2.0)]);
    }

    #[test]
    fn atr_constant_range() {
        // Every bar spans 10 around a flat close, so TR and ATR are exactly 10.
        let bars: Vec<Bar> = (0..30).map(|i| candle(i, 100.0, 105.0, 95.0, 100.0)).collect();
        let atr = calculate_atr(&bars, ATR_PERIOD);
        assert!(atr[..14].iter().all(Option::is_none));
        for v in atr[14..].iter() {
            assert_eq!(*v, Some(10.0));
        }
    }

    #[test]
    fn atr_is_non_negative() {
        let bars: Vec<Bar> = (0..50)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.5).sin() * 10.0;
                candle(i, base - 0.5, base + 2.0, base - 2.0, base + 0.5)
            })
            .collect();
        for v in calculate_atr(&bars, ATR_PERIOD).into_iter().flatten() {
            assert!(v > 0.0, "ATR must be positive, got {v}");
        }
    }
}
