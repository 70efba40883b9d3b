//! Core types: cards, generation parameters, RNG, errors.
//!
//! Everything here is independent of the construction algorithm and is
//! shared by the planner, engine, orchestrator and verifier.

pub mod card;
pub mod config;
pub mod error;
pub mod rng;

pub use card::{cards_hash, matrix_hash, sorted_set, Card, RowSet, HASH_PREFIX};
pub use config::{
    GenerationConfig, Scope, Strategy, Uniformity, UniqueScope, DEFAULT_COLUMN_PERMUTATION_CAP,
    DEFAULT_COLUMN_SEARCH_CAP,
};
pub use error::{AttemptFailure, BuildFailure, CardFailure, ConfigError, GenerationError};
pub use rng::{derive_seed, CardRng, RngEngine};
