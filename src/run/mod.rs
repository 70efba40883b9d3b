//! Whole-run drivers: the attempt loop and the deterministic cyclic layout.

pub mod cyclic;
pub mod orchestrator;

pub use cyclic::{build_cards_cyclic, coprime_step};
pub use orchestrator::{generate, run_attempt, RunOutcome, BUILD_PURPOSE};
