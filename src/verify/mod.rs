//! Verifier and statistics.
//!
//! Recomputes frequencies, collision counts and a chi-square uniformity
//! test from a finished card list. Never mutates its input.

pub mod report;
pub mod stats;

pub use report::{
    check_no_duplicates_within_cards, check_no_identical_cards, compute_frequencies,
    compute_position_frequencies, count_set_collisions, position_key, verify, StatisticalTests,
    UniformitySummary, UniquenessReport, VerificationReport, SET_REPRESENTATION,
};
pub use stats::{
    chi2_wilson_hilferty_pvalue, erfc, normal_survival, round6, uniformity_test, Chi2,
    UniformityTest, DEFAULT_ALPHA, STATS_ENGINE,
};
