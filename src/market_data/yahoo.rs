// =============================================================================
// Yahoo Finance chart client — daily OHLC history
// =============================================================================
//
// GET {base}/v8/finance/chart/{symbol}?range={period}&interval=1d
//
// Response shape (trimmed):
// ```json
// { "chart": {
//     "result": [{
//       "timestamp": [1700000000, ...],
//       "indicators": { "quote": [{ "open": [...], "high": [...],
//                                   "low": [...], "close": [...],
//                                   "volume": [...] }] }
//     }],
//     "error": null } }
// ```
// Individual price entries may be `null` (halted sessions); such rows are
// skipped rather than fabricated.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, instrument, warn};

use crate::types::{Bar, Series};

/// Yahoo rejects requests without a browser-like agent.
const AGENT: &str = "Mozilla/5.0 (compatible; ohlc-ta/1.0)";

/// Minimal client for the public chart endpoint.
#[derive(Clone)]
pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
}

impl YahooClient {
    /// Create a new `YahooClient` against `base_url` with a request `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(AGENT));

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "YahooClient initialised");

        Ok(Self { base_url, client })
    }

    /// Download daily bars for `symbol` over `period` (e.g. `1y`).
    #[instrument(skip(self), name = "yahoo::get_daily_bars")]
    pub async fn get_daily_bars(&self, symbol: &str, period: &str) -> Result<Series> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        let resp = self
            .client
            .get(&url)
            .query(&[("range", period), ("interval", "1d")])
            .send()
            .await
            .context("GET /v8/finance/chart request failed")?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse chart response")?;

        // The API reports unknown symbols through `chart.error`, often with a
        // 404, so look there first for the more useful message.
        if let Some(message) = chart_error(&body) {
            anyhow::bail!("Yahoo chart API error for {symbol}: {message}");
        }
        if !status.is_success() {
            anyhow::bail!("Yahoo GET /v8/finance/chart returned {}: {}", status, body);
        }

        let bars = parse_chart_response(&body)?;
        debug!(symbol, period, count = bars.len(), "daily bars fetched");

        Series::new(bars).with_context(|| format!("invalid bar sequence for {symbol}"))
    }
}

impl std::fmt::Debug for YahooClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

// =============================================================================
// Response parsing
// =============================================================================

fn chart_error(body: &serde_json::Value) -> Option<String> {
    let err = body.get("chart")?.get("error")?;
    if err.is_null() {
        return None;
    }
    let description = err["description"]
        .as_str()
        .or_else(|| err["code"].as_str())
        .unwrap_or("unknown error");
    Some(description.to_string())
}

fn quote_column<'a>(quote: &'a serde_json::Value, name: &str) -> Result<&'a Vec<serde_json::Value>> {
    quote[name]
        .as_array()
        .with_context(|| format!("missing field indicators.quote[0].{name}"))
}

/// Convert a chart response into bars, oldest first.
pub fn parse_chart_response(body: &serde_json::Value) -> Result<Vec<Bar>> {
    if let Some(message) = chart_error(body) {
        anyhow::bail!("chart API error: {message}");
    }

    let result = body["chart"]["result"]
        .as_array()
        .and_then(|r| r.first())
        .context("chart response has no result")?;

    // A symbol with no trades in range comes back without a timestamp array.
    let Some(timestamps) = result["timestamp"].as_array() else {
        return Ok(Vec::new());
    };

    let quote = &result["indicators"]["quote"][0];
    let opens = quote_column(quote, "open")?;
    let highs = quote_column(quote, "high")?;
    let lows = quote_column(quote, "low")?;
    let closes = quote_column(quote, "close")?;
    let volumes = quote["volume"].as_array();

    let mut bars = Vec::with_capacity(timestamps.len());
    let mut skipped = 0usize;

    for (i, ts) in timestamps.iter().enumerate() {
        let secs = ts
            .as_i64()
            .with_context(|| format!("timestamp[{i}] is not an integer"))?;
        let timestamp = Utc
            .timestamp_opt(secs, 0)
            .single()
            .with_context(|| format!("timestamp[{i}] out of range: {secs}"))?;

        let price = |col: &Vec<serde_json::Value>| col.get(i).and_then(serde_json::Value::as_f64);
        let (Some(open), Some(high), Some(low), Some(close)) =
            (price(opens), price(highs), price(lows), price(closes))
        else {
            skipped += 1;
            continue;
        };

        let mut bar = Bar::new(timestamp, open, high, low, close);
        if let Some(volume) = volumes.and_then(|v| v.get(i)).and_then(serde_json::Value::as_f64) {
            bar = bar.with_volume(volume);
        }
        bars.push(bar);
    }

    if skipped > 0 {
        warn!(skipped, "skipping chart rows with missing prices");
    }

    Ok(bars)
}
