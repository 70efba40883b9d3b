//! # bingo-cards
//!
//! Randomized constructive generator for bingo/tombola card sets.
//!
//! A run produces `T` cards, each an `m x n` matrix of distinct numbers from
//! `1..=R`, such that:
//!
//! - per-number usage across the run is exactly equal (`strict`) or differs
//!   by at most one (`near`)
//! - optionally, no row-set and/or column-set repeats across the run
//! - no two cards are identical
//!
//! ## Design Principles
//!
//! 1. **Bounded randomized retry**: rows are sampled, cards restarted and
//!    whole attempts discarded, each within an explicit cap. There is no
//!    backtracking solver.
//!
//! 2. **Owned attempt state**: every attempt builds from a fresh
//!    `RunState`; a failed attempt is dropped, never rolled back.
//!
//! 3. **Failures are values**: a card try returns a `BuildFailure` and the
//!    caller decides between restarting the card and abandoning the attempt.
//!
//! 4. **Deterministic**: the same parameters and seed produce the same cards,
//!    sequentially or in parallel.
//!
//! ## Modules
//!
//! - `core`: cards, parameters, RNG, errors
//! - `planner`: frequency targets and feasibility checks
//! - `registry`: budget, uniqueness registry, per-attempt state
//! - `engine`: row selection, row ordering, column arrangement, card builder
//! - `run`: attempt orchestration and the cyclic construction
//! - `verify`: frequency tables, collision counts, chi-square test
//! - `output`: run metadata and emitted documents
//! - `settings`: layered configuration and the parameter hash
//!
//! ## Example
//!
//! ```
//! use bingo_cards::{generate, verify, GenerationConfig};
//!
//! let config = GenerationConfig::new(30, 5, 2, 3).with_seed(7);
//! let outcome = generate(&config).unwrap();
//! assert_eq!(outcome.cards.len(), 5);
//!
//! let report = verify(&outcome.cards, config.r, config.unique_scope, config.uniformity);
//! assert!(report.is_clean());
//! assert_eq!(report.uniformity.max_minus_min, 0);
//! ```

pub mod core;
pub mod engine;
pub mod output;
pub mod planner;
pub mod registry;
pub mod run;
pub mod settings;
pub mod verify;

// Re-export commonly used types
pub use crate::core::{
    cards_hash, derive_seed, matrix_hash, AttemptFailure, BuildFailure, Card, CardFailure,
    CardRng, ConfigError, GenerationConfig, GenerationError, RngEngine, Strategy, Uniformity,
    UniqueScope,
};

pub use crate::planner::{
    assess, build_global_frequencies, check_uniformity_strict, check_uniqueness_capacity,
    Feasibility, FrequencyPlan,
};

pub use crate::registry::{Budget, RunState, SetRegistry};

pub use crate::engine::{CardEngine, RowOrderer};

pub use crate::run::{build_cards_cyclic, generate, RunOutcome};

pub use crate::verify::{verify, VerificationReport};

pub use crate::output::{CardsDocument, ReportDocument, RunMeta};

pub use crate::settings::{resolve, ResolvedSettings, Settings, SettingsError};
