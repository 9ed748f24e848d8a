// =============================================================================
// ohlc-ta — Main Entry Point
// =============================================================================
//
// fetch (or load) → compute → chart layout → classify → print summary.
// Each step receives its inputs explicitly; there is no process-wide state.
// =============================================================================

use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ohlc_ta::market_data::{load_bars_json, YahooClient};
use ohlc_ta::{AnalysisConfig, ChartLayout, IndicatorEngine, Series, TechnicalAnalysis};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::var("TA_CONFIG").unwrap_or_else(|_| "ta_config.json".into());
    let mut config = AnalysisConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AnalysisConfig::default()
    });

    if let Ok(symbol) = std::env::var("TA_SYMBOL") {
        config.symbol = symbol.trim().to_uppercase();
    }
    if let Ok(period) = std::env::var("TA_PERIOD") {
        config.period = period.trim().to_string();
    }
    if let Ok(input) = std::env::var("TA_INPUT") {
        config.input_path = Some(input.into());
    }
    config.validate()?;

    info!(symbol = %config.symbol, period = %config.period, "Starting technical analysis");

    // ── 2. Acquire the series ────────────────────────────────────────────
    let series: Series = match &config.input_path {
        Some(path) => load_bars_json(path)?,
        None => {
            let client = YahooClient::new(
                config.yahoo_base_url.clone(),
                Duration::from_secs(config.http_timeout_secs),
            )?;
            client.get_daily_bars(&config.symbol, &config.period).await?
        }
    };
    info!(bars = series.len(), "Series acquired");

    // ── 3. Indicators ────────────────────────────────────────────────────
    let frame = IndicatorEngine::new().compute(&series);

    // ── 4. Chart layout ──────────────────────────────────────────────────
    ChartLayout::from_frame(&frame, &config.symbol)
        .write(&config.chart_output)
        .context("failed to export chart layout")?;

    // ── 5. Classification & report ───────────────────────────────────────
    let analysis = TechnicalAnalysis::from_frame(&frame)
        .with_context(|| format!("cannot classify {}", config.symbol))?;

    println!("\n{}", analysis.summary(&config.symbol));
    Ok(())
}
