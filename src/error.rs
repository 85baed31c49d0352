use thiserror::Error;

/// Reasons the scoring engine refuses to produce a result.
///
/// Everything else (empty rule lists, no bidders, unmatched intervals, a zero
/// benchmark) is a valid input with a well-defined result.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScoringError {
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfiguration { field: String, reason: String },

    #[error("invalid bid at position {index}: {reason}")]
    InvalidBid { index: usize, reason: String },

    #[error("benchmark price is not a finite number ({0})")]
    NonFiniteBenchmark(f64),

    /// The benchmark is finite but too close to zero (or the factors too
    /// large) for this bid's deviation or score to be representable.
    #[error("bid at position {index}: {field} is {value}, benchmark {benchmark}")]
    NonFiniteScore {
        index: usize,
        field: &'static str,
        value: f64,
        benchmark: f64,
    },
}

impl ScoringError {
    pub(crate) fn non_finite(field: impl Into<String>, value: f64) -> Self {
        ScoringError::InvalidConfiguration {
            field: field.into(),
            reason: format!("must be a finite number, got {}", value),
        }
    }
}
