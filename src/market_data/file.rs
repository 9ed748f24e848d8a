// =============================================================================
// Local bar files
// =============================================================================
//
// A JSON array of bars, oldest first:
// ```json
// [ { "timestamp": "2024-01-02T00:00:00Z",
//     "open": 1.0, "high": 1.2, "low": 0.9, "close": 1.1, "volume": 1000 } ]
// ```

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::types::{Bar, Series};

/// Read and validate a bar file.
pub fn load_bars_json(path: impl AsRef<Path>) -> Result<Series> {
    let path = path.as_ref();

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bar file {}", path.display()))?;

    let bars: Vec<Bar> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse bar file {}", path.display()))?;

    let series = Series::new(bars)
        .with_context(|| format!("invalid bar sequence in {}", path.display()))?;

    info!(path = %path.display(), bars = series.len(), "bar file loaded");
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    fn temp_file(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("ohlc_ta_{}_{name}", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_valid_file() {
        let path = temp_file(
            "valid.json",
            r#"[
                {"timestamp": "2024-01-02T00:00:00Z", "open": 10.0, "high": 11.0, "low": 9.5, "close": 10.5, "volume": 1200},
                {"timestamp": "2024-01-03T00:00:00Z", "open": 10.5, "high": 10.8, "low": 9.9, "close": 10.1}
            ]"#,
        );
        let series = load_bars_json(&path).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars()[0].volume, Some(1200.0));
        assert_eq!(series.bars()[1].volume, None);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_rejects_unordered_file() {
        let path = temp_file(
            "unordered.json",
            r#"[
                {"timestamp": "2024-01-03T00:00:00Z", "open": 1.0, "high": 1.0, "low": 1.0, "close": 1.0},
                {"timestamp": "2024-01-02T00:00:00Z", "open": 1.0, "high": 1.0, "low": 1.0, "close": 1.0}
            ]"#,
        );
        let err = load_bars_json(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::NonMonotonicInput { index: 1, .. })
        ));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_missing_file_errors() {
        assert!(load_bars_json("/nonexistent/bars.json").is_err());
    }
}
