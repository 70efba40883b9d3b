//! Run Orchestrator.
//!
//! Drives whole attempts of `T` cards. Each attempt owns a fresh
//! [`RunState`] and its own RNG stream derived from
//! `(seed, attempt, "build")`; any card failure discards the attempt.
//!
//! With `parallel` set, attempts run in rayon batches and the
//! lowest-numbered success wins, so the cards match a sequential run with
//! the same seed.

use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::core::{AttemptFailure, Card, CardRng, GenerationConfig, GenerationError, Strategy};
use crate::engine::CardEngine;
use crate::planner::{build_global_frequencies, FrequencyPlan};
use crate::registry::RunState;

use super::cyclic::build_cards_cyclic;

/// RNG purpose tag for card construction streams.
pub const BUILD_PURPOSE: &str = "build";

/// A successful run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    /// Accepted cards in construction order.
    pub cards: Vec<Card>,
    /// Attempts consumed, including the successful one.
    pub attempts: u32,
    /// Seed of the successful attempt's stream; `None` for cyclic runs.
    pub attempt_seed: Option<u64>,
    /// Strategy that produced the cards.
    pub strategy: Strategy,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}

/// Generate a full card set for `config`.
///
/// # Errors
///
/// `Config` for invalid parameters, `CyclicNotApplicable` when the cyclic
/// strategy is forced but does not apply, `Timeout` when the wall-clock
/// budget runs out between attempts, and `RunExhausted` when every attempt
/// failed.
pub fn generate(config: &GenerationConfig) -> Result<RunOutcome, GenerationError> {
    config.validate()?;
    let start = Instant::now();
    let plan = build_global_frequencies(config.r, config.t, config.m, config.n, config.uniformity);

    match config.strategy {
        Strategy::Cyclic => {
            let cards = build_cards_cyclic(config.r, config.t, config.m, config.n, config.uniformity)
                .ok_or(GenerationError::CyclicNotApplicable)?;
            return Ok(cyclic_outcome(cards, start));
        }
        Strategy::Auto if cyclic_eligible(config) => {
            let cards = build_cards_cyclic(config.r, config.t, config.m, config.n, config.uniformity);
            match cards {
                Some(cards) if matches_plan(&cards, &plan) => {
                    info!("cyclic construction matches the frequency plan");
                    return Ok(cyclic_outcome(cards, start));
                }
                _ => debug!("cyclic construction not usable, falling back to heuristic"),
            }
        }
        _ => {}
    }

    if config.parallel {
        run_parallel(config, &plan, start)
    } else {
        run_sequential(config, &plan, start)
    }
}

/// One complete attempt: `T` cards against a fresh state.
///
/// # Errors
///
/// The first card that exhausted its restarts, or unspent budget after the
/// last card.
pub fn run_attempt(
    config: &GenerationConfig,
    plan: &FrequencyPlan,
    attempt: u32,
) -> Result<(Vec<Card>, u64), AttemptFailure> {
    let mut rng = CardRng::for_attempt(config.engine, config.seed, u64::from(attempt), BUILD_PURPOSE);
    let seed = rng.seed();
    let engine = CardEngine::new(config);
    let mut state = RunState::fresh(config, plan);

    for card_index in 0..config.t {
        engine.build_card(&mut state, card_index, &mut rng)?;
    }
    if !state.budget.is_exhausted() {
        return Err(AttemptFailure::BudgetLeft {
            remaining: state.budget.total_remaining(),
        });
    }
    Ok((state.into_cards(), seed))
}

fn run_sequential(
    config: &GenerationConfig,
    plan: &FrequencyPlan,
    start: Instant,
) -> Result<RunOutcome, GenerationError> {
    for attempt in 0..config.max_attempts {
        check_deadline(config, start, attempt)?;
        info!(attempt, "starting attempt");

        match run_attempt(config, plan, attempt) {
            Ok((cards, seed)) => return Ok(heuristic_outcome(cards, attempt, seed, start)),
            Err(failure) => warn!(attempt, %failure, "attempt failed"),
        }
    }
    Err(GenerationError::RunExhausted {
        attempts: config.max_attempts,
    })
}

fn run_parallel(
    config: &GenerationConfig,
    plan: &FrequencyPlan,
    start: Instant,
) -> Result<RunOutcome, GenerationError> {
    let batch = if config.parallelism == 0 {
        rayon::current_num_threads()
    } else {
        config.parallelism
    };
    let batch = u32::try_from(batch.max(1)).unwrap_or(u32::MAX);

    let mut first = 0;
    while first < config.max_attempts {
        check_deadline(config, start, first)?;
        let last = first.saturating_add(batch).min(config.max_attempts);
        info!(first, last, "starting attempt batch");

        let results: Vec<_> = (first..last)
            .into_par_iter()
            .map(|attempt| (attempt, run_attempt(config, plan, attempt)))
            .collect();

        for (attempt, result) in results {
            match result {
                Ok((cards, seed)) => return Ok(heuristic_outcome(cards, attempt, seed, start)),
                Err(failure) => warn!(attempt, %failure, "attempt failed"),
            }
        }
        first = last;
    }
    Err(GenerationError::RunExhausted {
        attempts: config.max_attempts,
    })
}

fn check_deadline(
    config: &GenerationConfig,
    start: Instant,
    attempts: u32,
) -> Result<(), GenerationError> {
    let Some(limit) = config.build_timeout_sec else {
        return Ok(());
    };
    let elapsed = start.elapsed();
    if elapsed >= Duration::from_secs(limit) {
        warn!(elapsed_ms = elapsed.as_millis() as u64, attempts, "build timed out");
        return Err(GenerationError::Timeout {
            elapsed_ms: elapsed.as_millis(),
            attempts,
        });
    }
    Ok(())
}

/// Auto mode only tries the cyclic layout when nothing it cannot honour
/// was requested.
fn cyclic_eligible(config: &GenerationConfig) -> bool {
    config.unique_scope.is_empty() && config.min_distance == 0 && !config.position_balance
}

/// Per-number usage equals the plan exactly and no two cards are identical.
fn matches_plan(cards: &[Card], plan: &FrequencyPlan) -> bool {
    let mut counts = vec![0u32; plan.len()];
    for x in cards.iter().flat_map(Card::values) {
        match x.checked_sub(1).and_then(|i| counts.get_mut(i as usize)) {
            Some(c) => *c += 1,
            None => return false,
        }
    }
    let mut hashes: Vec<String> = cards.iter().map(Card::content_hash).collect();
    hashes.sort_unstable();
    hashes.dedup();

    hashes.len() == cards.len() && plan.iter().all(|(x, target)| counts[x as usize - 1] == target)
}

fn cyclic_outcome(cards: Vec<Card>, start: Instant) -> RunOutcome {
    RunOutcome {
        cards,
        attempts: 1,
        attempt_seed: None,
        strategy: Strategy::Cyclic,
        elapsed: start.elapsed(),
    }
}

fn heuristic_outcome(cards: Vec<Card>, attempt: u32, seed: u64, start: Instant) -> RunOutcome {
    info!(attempt, cards = cards.len(), "attempt succeeded");
    RunOutcome {
        cards,
        attempts: attempt + 1,
        attempt_seed: Some(seed),
        strategy: Strategy::Heuristic,
        elapsed: start.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConfigError, Uniformity, UniqueScope};
    use crate::planner::check_uniformity_strict;

    #[test]
    fn test_generate_default_parameters() {
        let config = GenerationConfig::default();
        let outcome = generate(&config).unwrap();
        assert_eq!(outcome.cards.len(), 6);
        assert_eq!(outcome.strategy, Strategy::Heuristic);
        assert!(outcome.attempt_seed.is_some());
        assert!(outcome.attempts >= 1);
    }

    #[test]
    fn test_generate_rejects_invalid_config() {
        let config = GenerationConfig::new(5, 2, 2, 3);
        assert_eq!(
            generate(&config),
            Err(GenerationError::Config(ConfigError::PoolTooSmall { r: 5, cells: 6 }))
        );
    }

    #[test]
    fn test_strict_indivisible_exhausts_run() {
        // P = 18 over R = 12: the floor plan leaves the last card short.
        let config = GenerationConfig::new(12, 3, 2, 3)
            .with_uniformity(Uniformity::Strict)
            .with_max_attempts(3);
        assert!(!check_uniformity_strict(12, 3, 2, 3).feasible);
        assert_eq!(
            generate(&config),
            Err(GenerationError::RunExhausted { attempts: 3 })
        );
    }

    #[test]
    fn test_forced_cyclic_not_applicable() {
        let config = GenerationConfig::new(12, 3, 2, 3)
            .with_uniformity(Uniformity::Strict)
            .with_strategy(Strategy::Cyclic);
        assert_eq!(generate(&config), Err(GenerationError::CyclicNotApplicable));
    }

    #[test]
    fn test_auto_uses_cyclic_when_balanced() {
        // k = 1: each card shifts by one, every number used three times.
        let config = GenerationConfig::new(4, 4, 1, 3).with_unique_scope(UniqueScope::none());
        let outcome = generate(&config).unwrap();
        assert_eq!(outcome.strategy, Strategy::Cyclic);
        assert_eq!(outcome.attempt_seed, None);
        assert_eq!(outcome.cards[1].rows(), &[vec![2, 3, 4]]);
    }

    #[test]
    fn test_auto_falls_back_when_cyclic_unbalanced() {
        let config = GenerationConfig::new(12, 4, 2, 3).with_unique_scope(UniqueScope::none());
        let outcome = generate(&config).unwrap();
        assert_eq!(outcome.strategy, Strategy::Heuristic);
    }

    #[test]
    fn test_timeout_before_first_attempt() {
        let config = GenerationConfig::default().with_timeout_sec(0);
        assert!(matches!(
            generate(&config),
            Err(GenerationError::Timeout { attempts: 0, .. })
        ));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = GenerationConfig::new(30, 10, 3, 3).with_seed(17);
        let sequential = generate(&config).unwrap();
        let parallel = generate(&config.clone().with_parallelism(4)).unwrap();
        assert_eq!(sequential.cards, parallel.cards);
        assert_eq!(sequential.attempts, parallel.attempts);
        assert_eq!(sequential.attempt_seed, parallel.attempt_seed);
    }

    #[test]
    fn test_run_attempt_is_deterministic() {
        let config = GenerationConfig::new(24, 4, 2, 3);
        let plan = build_global_frequencies(24, 4, 2, 3, Uniformity::Strict);
        assert_eq!(run_attempt(&config, &plan, 2), run_attempt(&config, &plan, 2));
    }
}
