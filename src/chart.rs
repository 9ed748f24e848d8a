// =============================================================================
// Chart layout export
// =============================================================================
//
// Describes the four stacked panels a renderer should draw, sharing one
// date axis:
//
//   1. Price (0.4)  candlesticks + SMA20/50/200 + Bollinger upper/lower
//   2. MACD  (0.2)  MACD + signal line
//   3. RSI   (0.2)  RSI with 70 / 30 guides
//   4. ADX   (0.2)  ADX with a 25 guide
//
// Undefined indicator values serialize as `null` so the renderer leaves gaps
// instead of drawing a fabricated line.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::analysis::{ADX_STRONG_TREND, RSI_OVERBOUGHT, RSI_OVERSOLD};
use crate::engine::{IndicatorColumn, IndicatorFrame};
use crate::indicators::Column;

const FIGURE_HEIGHT: u32 = 1200;
const VERTICAL_SPACING: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineDash {
    Solid,
    Dash,
}

/// One drawable series inside a panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trace {
    Candlestick {
        name: String,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    },
    Line {
        name: String,
        y: Column,
        color: &'static str,
        dash: LineDash,
    },
}

impl Trace {
    fn line(name: &str, y: &[Option<f64>], color: &'static str, dash: LineDash) -> Self {
        Self::Line {
            name: name.to_string(),
            y: y.to_vec(),
            color,
            dash,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Candlestick { name, .. } | Self::Line { name, .. } => name,
        }
    }
}

/// Horizontal guide line drawn across a panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub y: f64,
    pub color: &'static str,
    pub dash: LineDash,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub y_title: &'static str,
    pub height_ratio: f64,
    pub traces: Vec<Trace>,
    pub reference_lines: Vec<ReferenceLine>,
}

/// Renderer-agnostic description of the technical-analysis figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub title: String,
    pub height: u32,
    pub vertical_spacing: f64,
    pub shared_x: bool,
    pub x_title: &'static str,
    pub show_legend: bool,
    pub range_slider: bool,
    pub x: Vec<DateTime<Utc>>,
    pub panels: Vec<Panel>,
}

impl ChartLayout {
    pub fn from_frame(frame: &IndicatorFrame, symbol: &str) -> Self {
        let series = frame.series();
        let col = |c: IndicatorColumn| frame.column(c);

        let price = Panel {
            y_title: "Price",
            height_ratio: 0.4,
            traces: vec![
                Trace::Candlestick {
                    name: "OHLC".to_string(),
                    open: series.opens(),
                    high: series.highs(),
                    low: series.lows(),
                    close: series.closes(),
                },
                Trace::line("SMA20", col(IndicatorColumn::Sma20), "blue", LineDash::Solid),
                Trace::line("SMA50", col(IndicatorColumn::Sma50), "orange", LineDash::Solid),
                Trace::line("SMA200", col(IndicatorColumn::Sma200), "red", LineDash::Solid),
                Trace::line("BB Upper", col(IndicatorColumn::BbUpper), "gray", LineDash::Dash),
                Trace::line("BB Lower", col(IndicatorColumn::BbLower), "gray", LineDash::Dash),
            ],
            reference_lines: Vec::new(),
        };

        let macd = Panel {
            y_title: "MACD",
            height_ratio: 0.2,
            traces: vec![
                Trace::line("MACD", col(IndicatorColumn::Macd), "blue", LineDash::Solid),
                Trace::line("Signal Line", col(IndicatorColumn::SignalLine), "orange", LineDash::Solid),
            ],
            reference_lines: Vec::new(),
        };

        let rsi = Panel {
            y_title: "RSI",
            height_ratio: 0.2,
            traces: vec![Trace::line("RSI", col(IndicatorColumn::Rsi), "purple", LineDash::Solid)],
            reference_lines: vec![
                ReferenceLine {
                    y: RSI_OVERBOUGHT,
                    color: "red",
                    dash: LineDash::Dash,
                },
                ReferenceLine {
                    y: RSI_OVERSOLD,
                    color: "green",
                    dash: LineDash::Dash,
                },
            ],
        };

        let adx = Panel {
            y_title: "ADX",
            height_ratio: 0.2,
            traces: vec![Trace::line("ADX", col(IndicatorColumn::Adx), "brown", LineDash::Solid)],
            reference_lines: vec![ReferenceLine {
                y: ADX_STRONG_TREND,
                color: "gray",
                dash: LineDash::Dash,
            }],
        };

        Self {
            title: format!("Technical Analysis for {symbol}"),
            height: FIGURE_HEIGHT,
            vertical_spacing: VERTICAL_SPACING,
            shared_x: true,
            x_title: "Date",
            show_legend: true,
            range_slider: false,
            x: series.timestamps(),
            panels: vec![price, macd, rsi, adx],
        }
    }

    /// Write the layout as pretty JSON (atomic tmp + rename).
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content =
            serde_json::to_string_pretty(self).context("failed to serialise chart layout")?;
        crate::util::write_atomic(path, &content)?;
        info!(path = %path.display(), panels = self.panels.len(), "chart layout written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::IndicatorEngine;
    use crate::types::{Bar, Series};
    use chrono::{Duration, TimeZone};

    fn frame(n: usize) -> IndicatorFrame {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let bars = (0..n)
            .map(|i| {
                let c = 50.0 + (i as f64 * 0.5).sin() * 4.0;
                Bar::new(start + Duration::days(i as i64), c, c + 1.0, c - 1.0, c)
            })
            .collect();
        IndicatorEngine::new().compute(&Series::new(bars).unwrap())
    }

    #[test]
    fn layout_has_four_panels_summing_to_one() {
        let layout = ChartLayout::from_frame(&frame(40), "AAPL");
        assert_eq!(layout.title, "Technical Analysis for AAPL");
        let titles: Vec<_> = layout.panels.iter().map(|p| p.y_title).collect();
        assert_eq!(titles, ["Price", "MACD", "RSI", "ADX"]);
        let total: f64 = layout.panels.iter().map(|p| p.height_ratio).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn traces_are_aligned_with_x_axis() {
        let layout = ChartLayout::from_frame(&frame(40), "AAPL");
        assert_eq!(layout.x.len(), 40);
        for trace in layout.panels.iter().flat_map(|p| &p.traces) {
            let len = match trace {
                Trace::Candlestick { close, .. } => close.len(),
                Trace::Line { y, .. } => y.len(),
            };
            assert_eq!(len, 40, "{} misaligned", trace.name());
        }
    }

    #[test]
    fn reference_lines_match_thresholds() {
        let layout = ChartLayout::from_frame(&frame(10), "X");
        let rsi: Vec<f64> = layout.panels[2].reference_lines.iter().map(|l| l.y).collect();
        assert_eq!(rsi, [70.0, 30.0]);
        assert_eq!(layout.panels[3].reference_lines[0].y, 25.0);
    }

    #[test]
    fn undefined_values_serialize_as_null() {
        let layout = ChartLayout::from_frame(&frame(30), "X");
        let json = serde_json::to_value(&layout).unwrap();
        let sma20 = &json["panels"][0]["traces"][1];
        assert_eq!(sma20["type"], "line");
        assert_eq!(sma20["name"], "SMA20");
        assert!(sma20["y"][0].is_null());
        assert!(sma20["y"][19].is_number());
        assert_eq!(json["panels"][0]["traces"][4]["dash"], "dash");
    }

    #[test]
    fn write_produces_json_file() {
        let path = std::env::temp_dir().join(format!("ohlc_ta_chart_{}.json", std::process::id()));
        ChartLayout::from_frame(&frame(25), "X").write(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["panels"].as_array().unwrap().len(), 4);
        let _ = std::fs::remove_file(&path);
    }
}
