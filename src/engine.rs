// =============================================================================
// Indicator Engine
// =============================================================================
//
// One pass of chained, pure transforms over a validated `Series`:
//
//   closes ──► RSI(14)
//          ├─► MACD(12, 26) ──► Signal(9)
//          ├─► SMA(20 / 50 / 200)
//          └─► Bollinger(20, 2σ)
//   bars   ──► TR ──► ATR(14)
//                 └─► ADX(14)  (+DM / -DM from the bars)
//
// No stage mutates another stage's output.  Short input is never an error:
// every column simply stays undefined until its own warm-up is satisfied.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::indicators::adx::{calculate_adx, ADX_PERIOD};
use crate::indicators::atr::{true_range, ATR_PERIOD};
use crate::indicators::bollinger::{calculate_bollinger, BOLLINGER_NUM_STD, BOLLINGER_PERIOD};
use crate::indicators::macd::{calculate_macd, MACD_FAST, MACD_SIGNAL, MACD_SLOW};
use crate::indicators::rolling::{defined, first_defined, simple_moving_average};
use crate::indicators::rsi::{calculate_rsi, RSI_PERIOD};
use crate::indicators::{Column, SMA_PERIODS};
use crate::types::Series;

// =============================================================================
// Column identifiers
// =============================================================================

/// Named indicator columns of an [`IndicatorFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorColumn {
    Rsi,
    Macd,
    SignalLine,
    Atr,
    Adx,
    Sma20,
    Sma50,
    Sma200,
    BbUpper,
    BbMiddle,
    BbLower,
}

impl IndicatorColumn {
    pub const ALL: [IndicatorColumn; 11] = [
        Self::Rsi,
        Self::Macd,
        Self::SignalLine,
        Self::Atr,
        Self::Adx,
        Self::Sma20,
        Self::Sma50,
        Self::Sma200,
        Self::BbUpper,
        Self::BbMiddle,
        Self::BbLower,
    ];

    /// Column name as exposed to chart and report consumers.
    pub fn name(self) -> &'static str {
        match self {
            Self::Rsi => "RSI",
            Self::Macd => "MACD",
            Self::SignalLine => "Signal_Line",
            Self::Atr => "ATR",
            Self::Adx => "ADX",
            Self::Sma20 => "SMA20",
            Self::Sma50 => "SMA50",
            Self::Sma200 => "SMA200",
            Self::BbUpper => "BB_upper",
            Self::BbMiddle => "BB_middle",
            Self::BbLower => "BB_lower",
        }
    }

    /// Minimum number of bars before the column can hold a defined value.
    pub fn min_bars(self) -> usize {
        match self {
            Self::Rsi => RSI_PERIOD + 1,
            Self::Macd | Self::SignalLine => 1,
            Self::Atr => ATR_PERIOD + 1,
            Self::Adx => 2 * ADX_PERIOD,
            Self::Sma20 => SMA_PERIODS[0],
            Self::Sma50 => SMA_PERIODS[1],
            Self::Sma200 => SMA_PERIODS[2],
            Self::BbUpper | Self::BbMiddle | Self::BbLower => BOLLINGER_PERIOD,
        }
    }
}

impl std::fmt::Display for IndicatorColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// IndicatorFrame
// =============================================================================

/// The input series plus every indicator column, index-aligned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorFrame {
    #[serde(rename = "bars")]
    series: Series,
    #[serde(rename = "RSI")]
    rsi: Column,
    #[serde(rename = "MACD")]
    macd: Column,
    #[serde(rename = "Signal_Line")]
    signal_line: Column,
    #[serde(rename = "ATR")]
    atr: Column,
    #[serde(rename = "ADX")]
    adx: Column,
    #[serde(rename = "SMA20")]
    sma20: Column,
    #[serde(rename = "SMA50")]
    sma50: Column,
    #[serde(rename = "SMA200")]
    sma200: Column,
    #[serde(rename = "BB_upper")]
    bb_upper: Column,
    #[serde(rename = "BB_middle")]
    bb_middle: Column,
    #[serde(rename = "BB_lower")]
    bb_lower: Column,
}

/// Every value of one frame row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRow {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub signal_line: Option<f64>,
    pub atr: Option<f64>,
    pub adx: Option<f64>,
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
}

impl IndicatorFrame {
    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn column(&self, column: IndicatorColumn) -> &[Option<f64>] {
        match column {
            IndicatorColumn::Rsi => &self.rsi,
            IndicatorColumn::Macd => &self.macd,
            IndicatorColumn::SignalLine => &self.signal_line,
            IndicatorColumn::Atr => &self.atr,
            IndicatorColumn::Adx => &self.adx,
            IndicatorColumn::Sma20 => &self.sma20,
            IndicatorColumn::Sma50 => &self.sma50,
            IndicatorColumn::Sma200 => &self.sma200,
            IndicatorColumn::BbUpper => &self.bb_upper,
            IndicatorColumn::BbMiddle => &self.bb_middle,
            IndicatorColumn::BbLower => &self.bb_lower,
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = (IndicatorColumn, &[Option<f64>])> + '_ {
        IndicatorColumn::ALL.into_iter().map(|c| (c, self.column(c)))
    }

    /// Index from which MACD and its signal line are past their EMA warm-up.
    ///
    /// Values before it are defined but still dominated by the seed close.
    pub fn macd_settled_from(&self) -> usize {
        MACD_SLOW.min(self.len())
    }

    pub fn row(&self, index: usize) -> Option<FrameRow> {
        let bar = self.series.bars().get(index)?;
        Some(FrameRow {
            timestamp: bar.timestamp,
            close: bar.close,
            rsi: self.rsi[index],
            macd: self.macd[index],
            signal_line: self.signal_line[index],
            atr: self.atr[index],
            adx: self.adx[index],
            sma20: self.sma20[index],
            sma50: self.sma50[index],
            sma200: self.sma200[index],
            bb_upper: self.bb_upper[index],
            bb_middle: self.bb_middle[index],
            bb_lower: self.bb_lower[index],
        })
    }

    pub fn last_row(&self) -> Option<FrameRow> {
        self.row(self.len().checked_sub(1)?)
    }
}

// =============================================================================
// IndicatorEngine
// =============================================================================

/// Stateless indicator pipeline with the conventional fixed windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorEngine;

impl IndicatorEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compute every indicator column for `series`.
    pub fn compute(&self, series: &Series) -> IndicatorFrame {
        let bars = series.bars();
        let closes = series.closes();
        let close_col = defined(&closes);

        if bars.len() < IndicatorColumn::Sma200.min_bars() {
            warn!(
                bars = bars.len(),
                required = IndicatorColumn::Sma200.min_bars(),
                "series shorter than the longest warm-up; SMA200 will be undefined"
            );
        }

        // Momentum
        let rsi = calculate_rsi(&closes, RSI_PERIOD);

        // Trend
        let macd = calculate_macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);

        // Volatility + trend strength share the true range
        let tr = true_range(bars);
        let atr = simple_moving_average(&tr, ATR_PERIOD);
        let adx = calculate_adx(bars, &tr, ADX_PERIOD);

        let [p20, p50, p200] = SMA_PERIODS;
        let sma20 = simple_moving_average(&close_col, p20);
        let sma50 = simple_moving_average(&close_col, p50);
        let sma200 = simple_moving_average(&close_col, p200);

        let bb = calculate_bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_NUM_STD);

        let frame = IndicatorFrame {
            series: series.clone(),
            rsi,
            macd: macd.macd,
            signal_line: macd.signal,
            atr,
            adx,
            sma20,
            sma50,
            sma200,
            bb_upper: bb.upper,
            bb_middle: bb.middle,
            bb_lower: bb.lower,
        };

        debug!(
            bars = frame.len(),
            rsi_from = ?first_defined(&frame.rsi),
            atr_from = ?first_defined(&frame.atr),
            adx_from = ?first_defined(&frame.adx),
            sma200_from = ?first_defined(&frame.sma200),
            macd_settled_from = frame.macd_settled_from(),
            "indicator frame computed"
        );

        frame
    }
}
