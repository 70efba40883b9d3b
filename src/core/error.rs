//! Error taxonomy for card generation.
//!
//! - `ConfigError`: fatal, reported before any construction starts.
//! - `BuildFailure`: why one card attempt failed. Returned as a value and
//!   inspected by callers to decide between "retry this card" and
//!   "abort this attempt".
//! - `CardFailure`: a card ran out of whole-card restarts.
//! - `AttemptFailure`: why a whole run attempt was discarded.
//! - `GenerationError`: terminal outcome of a run.

use thiserror::Error;

/// Invalid generation parameters. Never retried.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The pool cannot fill one card without repeating a number.
    #[error("pool size R={r} is smaller than the {cells} cells of one card")]
    PoolTooSmall {
        /// Pool size.
        r: u32,
        /// Cells per card (m*n).
        cells: usize,
    },

    /// A dimension or count that must be positive is zero.
    #[error("parameter '{0}' must be at least 1")]
    ZeroDimension(&'static str),

    #[error("unsupported uniformity mode '{0}' (expected 'strict' or 'near')")]
    UnsupportedUniformity(String),

    #[error("unsupported RNG engine '{0}' (expected chacha8, chacha12 or chacha20)")]
    UnsupportedEngine(String),

    #[error("unsupported unique scope '{0}' (expected 'row_sets' or 'col_sets')")]
    UnsupportedScope(String),

    #[error("unsupported build strategy '{0}' (expected auto, heuristic or cyclic)")]
    UnsupportedStrategy(String),
}

/// Cause of a single failed card attempt.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BuildFailure {
    /// Fewer numbers with remaining budget than cells on a card.
    #[error("only {available} numbers have budget left, {needed} needed")]
    BudgetExhausted {
        /// Numbers with remaining budget > 0.
        available: usize,
        /// Cells per card.
        needed: usize,
    },

    /// No admissible row could be sampled or scanned.
    #[error("no admissible values found for row {row}")]
    RowSelection {
        /// Zero-based row index.
        row: usize,
    },

    /// The bounded column-permutation search found no assignment.
    #[error("no row arrangement yields unseen, non-adjacent columns")]
    ColumnArrangement,

    #[error("row-set already used by an earlier card")]
    RowSetCollision,

    #[error("column-set already used by an earlier card")]
    ColumnSetCollision,

    #[error("card identical to an earlier card")]
    DuplicateCard,
}

impl BuildFailure {
    /// Whether restarting the same card can change the outcome.
    ///
    /// Budget exhaustion depends only on the run state, so retrying the
    /// card with fresh randomness cannot help.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::BudgetExhausted { .. })
    }
}

/// A card could not be built within its restart budget.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("card {card_index} failed after {restarts} restart(s): {cause}")]
pub struct CardFailure {
    /// Zero-based index of the card within the run.
    pub card_index: usize,
    /// Whole-card restarts consumed.
    pub restarts: u32,
    /// Cause of the last failed restart.
    pub cause: BuildFailure,
}

/// Why one full run attempt was discarded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AttemptFailure {
    #[error(transparent)]
    Card(#[from] CardFailure),

    /// All cards were built but some budget was never spent.
    #[error("all cards built but {remaining} planned use(s) left unspent")]
    BudgetLeft {
        /// Sum of remaining budget entries.
        remaining: u64,
    },
}

/// Terminal outcome of a generation run.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Every attempt failed.
    #[error("no consistent card set found within {attempts} attempt(s)")]
    RunExhausted {
        /// The attempt cap that was reached.
        attempts: u32,
    },

    /// The cyclic strategy was forced but does not apply.
    #[error("cyclic construction is not applicable to these parameters")]
    CyclicNotApplicable,

    /// The wall-clock budget elapsed between attempts.
    #[error("build timed out after {elapsed_ms} ms and {attempts} attempt(s)")]
    Timeout {
        /// Elapsed wall-clock time.
        elapsed_ms: u128,
        /// Attempts started before the deadline.
        attempts: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::PoolTooSmall { r: 5, cells: 6 };
        assert!(err.to_string().contains("R=5"));
        assert!(err.to_string().contains("6 cells"));

        let err = ConfigError::UnsupportedUniformity("fuzzy".into());
        assert!(err.to_string().contains("fuzzy"));
    }

    #[test]
    fn test_retryable() {
        assert!(!BuildFailure::BudgetExhausted { available: 3, needed: 4 }.is_retryable());
        assert!(BuildFailure::RowSelection { row: 1 }.is_retryable());
        assert!(BuildFailure::DuplicateCard.is_retryable());
    }

    #[test]
    fn test_card_failure_display() {
        let err = CardFailure {
            card_index: 4,
            restarts: 200,
            cause: BuildFailure::ColumnArrangement,
        };
        let text = err.to_string();
        assert!(text.contains("card 4"));
        assert!(text.contains("200"));
    }

    #[test]
    fn test_generation_error_from_config() {
        let err: GenerationError = ConfigError::ZeroDimension("T").into();
        assert!(matches!(err, GenerationError::Config(_)));
        assert!(err.to_string().contains("'T'"));
    }
}
