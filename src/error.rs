// =============================================================================
// Analysis error taxonomy
// =============================================================================
//
// Division singularities (RSI with no losses, ADX with no directional sum) are
// NOT errors: they resolve to documented sentinels inside the indicator
// functions.  Only structural problems with the input or with the last row
// requested by the classifier surface here.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised by series construction and signal classification.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// A referenced indicator has no defined value at the requested row.
    #[error("insufficient data for {indicator}: need {required} bars, got {actual}")]
    InsufficientData {
        /// Column name of the undefined indicator.
        indicator: &'static str,
        /// Minimum number of bars for a first defined value.
        required: usize,
        /// Number of bars actually supplied.
        actual: usize,
    },

    /// Timestamps are not strictly increasing.
    #[error("bar {index} at {current} is not after previous bar at {previous}")]
    NonMonotonicInput {
        index: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },

    /// A price field is NaN or infinite.
    #[error("bar {index} has a non-finite {field} price")]
    NonFinitePrice { index: usize, field: &'static str },
}
