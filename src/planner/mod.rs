//! Frequency planning and feasibility checks.
//!
//! The planner turns `(R, T, m, n, uniformity)` into per-number usage
//! targets; the feasibility checks are cheap necessary conditions evaluated
//! before any card is built.

pub mod feasibility;
pub mod frequency;

pub use feasibility::{
    assess, binomial, check_uniformity_strict, check_uniqueness_capacity, Feasibility,
};
pub use frequency::{build_global_frequencies, near_uniform_targets, FrequencyPlan};
