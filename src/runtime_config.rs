// =============================================================================
// Runtime Configuration — analysis run settings with atomic save
// =============================================================================
//
// Everything the binary needs to acquire a series and publish results.  The
// indicator windows are NOT configurable; they are fixed constants of the
// engine.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.  All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
//
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Range strings understood by the Yahoo chart endpoint.
pub const SUPPORTED_PERIODS: &[&str] = &[
    "1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max",
];

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_symbol() -> String {
    "TECHM.NS".to_string()
}

fn default_period() -> String {
    "1y".to_string()
}

fn default_chart_output() -> PathBuf {
    PathBuf::from("chart_layout.json")
}

fn default_yahoo_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

// =============================================================================
// AnalysisConfig
// =============================================================================

/// Top-level configuration for one analysis run.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Ticker to analyse (Yahoo notation, e.g. `AAPL`, `TECHM.NS`).
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// History window to fetch, e.g. `1y`, `6mo`, `3mo`.
    #[serde(default = "default_period")]
    pub period: String,

    /// Local JSON bar file.  When set, it replaces the HTTP fetch.
    #[serde(default)]
    pub input_path: Option<PathBuf>,

    /// Where the chart layout JSON is written.
    #[serde(default = "default_chart_output")]
    pub chart_output: PathBuf,

    /// Base URL of the Yahoo Finance chart API.
    #[serde(default = "default_yahoo_base_url")]
    pub yahoo_base_url: String,

    /// Request timeout for market-data downloads.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            period: default_period(),
            input_path: None,
            chart_output: default_chart_output(),
            yahoo_base_url: default_yahoo_base_url(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read analysis config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse analysis config from {}", path.display()))?;

        info!(
            path = %path.display(),
            symbol = %config.symbol,
            period = %config.period,
            "analysis config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise analysis config to JSON")?;

        crate::util::write_atomic(path, &content)?;

        info!(path = %path.display(), "analysis config saved (atomic)");
        Ok(())
    }

    /// Reject settings the data source cannot serve.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            anyhow::bail!("symbol must not be empty");
        }
        if self.input_path.is_none() && !SUPPORTED_PERIODS.contains(&self.period.as_str()) {
            anyhow::bail!(
                "unsupported period '{}' (expected one of {})",
                self.period,
                SUPPORTED_PERIODS.join(", ")
            );
        }
        if self.http_timeout_secs == 0 {
            anyhow::bail!("http_timeout_secs must be greater than zero");
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.symbol, "TECHM.NS");
        assert_eq!(cfg.period, "1y");
        assert!(cfg.input_path.is_none());
        assert_eq!(cfg.chart_output, PathBuf::from("chart_layout.json"));
        assert_eq!(cfg.http_timeout_secs, 10);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: AnalysisConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, AnalysisConfig::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "symbol": "AAPL", "period": "6mo" }"#;
        let cfg: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.symbol, "AAPL");
        assert_eq!(cfg.period, "6mo");
        assert_eq!(cfg.yahoo_base_url, "https://query1.finance.yahoo.com");
    }

    #[test]
    fn validate_rejects_unknown_period() {
        let cfg = AnalysisConfig {
            period: "7w".into(),
            ..AnalysisConfig::default()
        };
        assert!(cfg.validate().is_err());

        // A local file does not need a fetch range.
        let cfg = AnalysisConfig {
            input_path: Some(PathBuf::from("bars.json")),
            ..cfg
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_symbol() {
        let cfg = AnalysisConfig {
            symbol: "  ".into(),
            ..AnalysisConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir().join(format!("ohlc_ta_cfg_{}.json", std::process::id()));
        let cfg = AnalysisConfig {
            symbol: "MSFT".into(),
            period: "3mo".into(),
            ..AnalysisConfig::default()
        };
        cfg.save(&path).unwrap();
        let loaded = AnalysisConfig::load(&path).unwrap();
        assert_eq!(loaded, cfg);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_missing_file_errors() {
        assert!(AnalysisConfig::load("/nonexistent/ohlc_ta.json").is_err());
    }
}
