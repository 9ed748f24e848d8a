// =============================================================================
// Signal classification over the latest frame row
// =============================================================================
//
//   RSI_Status          RSI < 30 => Oversold, RSI > 70 => Overbought, else Neutral
//   MACD_Signal         MACD > Signal_Line => Buy, else Sell
//   ADX_Trend_Strength  ADX > 25 => Strong, else Weak
//   SMA_Status          close > SMA200 => Bullish, else Bearish
//
// Classification never guesses: if any referenced value is undefined at the
// last row, it fails with `InsufficientData` naming that indicator.

use serde::Serialize;

use crate::engine::{IndicatorColumn, IndicatorFrame};
use crate::error::AnalysisError;
use crate::types::{MacdSignal, RsiStatus, SmaStatus, TrendStrength};

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const ADX_STRONG_TREND: f64 = 25.0;

/// The four categorical signals derived from the final bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TechnicalAnalysis {
    #[serde(rename = "RSI_Status")]
    pub rsi_status: RsiStatus,
    #[serde(rename = "MACD_Signal")]
    pub macd_signal: MacdSignal,
    #[serde(rename = "ADX_Trend_Strength")]
    pub adx_trend_strength: TrendStrength,
    #[serde(rename = "SMA_Status")]
    pub sma_status: SmaStatus,
}

impl TechnicalAnalysis {
    /// Classify the last row of `frame`.
    pub fn from_frame(frame: &IndicatorFrame) -> Result<Self, AnalysisError> {
        let value = |column: IndicatorColumn| -> Result<f64, AnalysisError> {
            frame
                .len()
                .checked_sub(1)
                .and_then(|last| frame.column(column)[last])
                .ok_or(AnalysisError::InsufficientData {
                    indicator: column.name(),
                    required: column.min_bars(),
                    actual: frame.len(),
                })
        };

        let rsi = value(IndicatorColumn::Rsi)?;
        let macd = value(IndicatorColumn::Macd)?;
        let signal = value(IndicatorColumn::SignalLine)?;
        let adx = value(IndicatorColumn::Adx)?;
        let sma200 = value(IndicatorColumn::Sma200)?;
        let close = frame
            .series()
            .last()
            .map(|b| b.close)
            .ok_or(AnalysisError::InsufficientData {
                indicator: "Close",
                required: 1,
                actual: 0,
            })?;

        Ok(Self {
            rsi_status: classify_rsi(rsi),
            macd_signal: if macd > signal {
                MacdSignal::Buy
            } else {
                MacdSignal::Sell
            },
            adx_trend_strength: if adx > ADX_STRONG_TREND {
                TrendStrength::Strong
            } else {
                TrendStrength::Weak
            },
            sma_status: if close > sma200 {
                SmaStatus::Bullish
            } else {
                SmaStatus::Bearish
            },
        })
    }

    /// Summary block printed under a `Technical Analysis Summary` heading.
    pub fn summary(&self, symbol: &str) -> String {
        format!("Technical Analysis Summary for {symbol}:\n{self}")
    }
}

impl std::fmt::Display for TechnicalAnalysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "RSI_Status: {}", self.rsi_status)?;
        writeln!(f, "MACD_Signal: {}", self.macd_signal)?;
        writeln!(f, "ADX_Trend_Strength: {}", self.adx_trend_strength)?;
        write!(f, "SMA_Status: {}", self.sma_status)
    }
}

fn classify_rsi(rsi: f64) -> RsiStatus {
    if rsi < RSI_OVERSOLD {
        RsiStatus::Oversold
    } else if rsi > RSI_OVERBOUGHT {
        RsiStatus::Overbought
    } else {
        RsiStatus::Neutral
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::IndicatorEngine;
    use crate::types::{Bar, Series};
    use chrono::{Duration, TimeZone, Utc};

    fn series_from_closes(closes: &[f64]) -> Series {
        let start = Utc.with_ymd_and_hms(2022, 1, 3, 0, 0, 0).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let open = if i == 0 { c } else { closes[i - 1] };
                Bar::new(
                    start + Duration::days(i as i64),
                    open,
                    open.max(c) * 1.005,
                    open.min(c) * 0.995,
                    c,
                )
            })
            .collect();
        Series::new(bars).unwrap()
    }

    fn analyse(closes: &[f64]) -> Result<TechnicalAnalysis, AnalysisError> {
        TechnicalAnalysis::from_frame(&IndicatorEngine::new().compute(&series_from_closes(closes)))
    }

    #[test]
    fn rsi_thresholds() {
        assert_eq!(classify_rsi(29.9), RsiStatus::Oversold);
        assert_eq!(classify_rsi(30.0), RsiStatus::Neutral);
        assert_eq!(classify_rsi(70.0), RsiStatus::Neutral);
        assert_eq!(classify_rsi(70.1), RsiStatus::Overbought);
    }

    #[test]
    fn strictly_increasing_is_bullish_buy() {
        let closes: Vec<f64> = (0..260).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        let analysis = analyse(&closes).unwrap();
        assert_eq!(analysis.sma_status, SmaStatus::Bullish);
        assert_eq!(analysis.macd_signal, MacdSignal::Buy);
        assert_eq!(analysis.rsi_status, RsiStatus::Overbought);
        assert_eq!(analysis.adx_trend_strength, TrendStrength::Strong);
    }

    #[test]
    fn accelerating_decline_is_bearish_sell() {
        let closes: Vec<f64> = (0..260).map(|i| 600.0 - 0.005 * (i * i) as f64).collect();
        let analysis = analyse(&closes).unwrap();
        assert_eq!(analysis.sma_status, SmaStatus::Bearish);
        assert_eq!(analysis.macd_signal, MacdSignal::Sell);
        assert_eq!(analysis.rsi_status, RsiStatus::Oversold);
    }

    #[test]
    fn short_history_names_missing_indicator() {
        let closes: Vec<f64> = (0..100).map(|i| 100.0 + (i as f64 * 0.4).sin()).collect();
        assert_eq!(
            analyse(&closes),
            Err(AnalysisError::InsufficientData {
                indicator: "SMA200",
                required: 200,
                actual: 100,
            })
        );
    }

    #[test]
    fn flat_history_has_no_rsi() {
        let closes = vec![100.0; 250];
        assert!(matches!(
            analyse(&closes),
            Err(AnalysisError::InsufficientData { indicator: "RSI", .. })
        ));
    }

    #[test]
    fn empty_frame_is_insufficient() {
        let frame = IndicatorEngine::new().compute(&Series::new(Vec::new()).unwrap());
        assert!(matches!(
            TechnicalAnalysis::from_frame(&frame),
            Err(AnalysisError::InsufficientData { actual: 0, .. })
        ));
    }

    #[test]
    fn summary_lists_all_fields() {
        let analysis = TechnicalAnalysis {
            rsi_status: RsiStatus::Neutral,
            macd_signal: MacdSignal::Buy,
            adx_trend_strength: TrendStrength::Weak,
            sma_status: SmaStatus::Bullish,
        };
        assert_eq!(
            analysis.summary("TECHM.NS"),
            "Technical Analysis Summary for TECHM.NS:\n\
             RSI_Status: Neutral\n\
             MACD_Signal: Buy\n\
             ADX_Trend_Strength: Weak\n\
             SMA_Status: Bullish"
        );
        let json = serde_json::to_value(analysis).unwrap();
        assert_eq!(json["ADX_Trend_Strength"], "Weak");
    }
}
