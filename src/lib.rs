// =============================================================================
// ohlc-ta — technical indicators over a daily OHLC series
// =============================================================================
//
// `IndicatorEngine::compute` is a pure function from a validated `Series` to
// an `IndicatorFrame`.  Data acquisition (`market_data`), chart description
// (`chart`) and the four-field signal report (`analysis`) sit around it and
// are wired together by the binary.
// =============================================================================

pub mod analysis;
pub mod chart;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod runtime_config;
pub mod types;

mod util;

pub use analysis::TechnicalAnalysis;
pub use chart::ChartLayout;
pub use engine::{FrameRow, IndicatorColumn, IndicatorEngine, IndicatorFrame};
pub use error::AnalysisError;
pub use runtime_config::AnalysisConfig;
pub use types::{Bar, MacdSignal, RsiStatus, Series, SmaStatus, TrendStrength};
