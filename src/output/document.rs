//! Serialized shapes of the emitted documents.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{cards_hash, Card, GenerationConfig};
use crate::planner::Feasibility;
use crate::run::RunOutcome;
use crate::verify::VerificationReport;

/// Digest used for every hash in the documents.
pub const HASH_ALGORITHM: &str = "sha256";

/// Provenance of one run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMeta {
    pub app_version: String,
    /// RFC 3339, UTC.
    pub timestamp: String,
    pub platform: String,
    pub params_hash: String,
    pub seed: u64,
    pub rng_engine: String,
    pub hash_algorithm: String,
    pub parallel: bool,
    pub parallelism: usize,
    pub strategy: String,
    pub attempts: u32,
    /// Seed of the successful attempt's stream, absent for cyclic runs.
    pub attempt_seed: Option<u64>,
}

impl RunMeta {
    /// Metadata for a finished run, stamped with the current time.
    #[must_use]
    pub fn new(config: &GenerationConfig, outcome: &RunOutcome, params_hash: &str) -> Self {
        Self {
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            platform: std::env::consts::OS.to_string(),
            params_hash: params_hash.to_string(),
            seed: config.seed,
            rng_engine: config.engine.name().to_string(),
            hash_algorithm: HASH_ALGORITHM.to_string(),
            parallel: config.parallel,
            parallelism: config.parallelism,
            strategy: outcome.strategy.name().to_string(),
            attempts: outcome.attempts,
            attempt_seed: outcome.attempt_seed,
        }
    }
}

/// One card as emitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEntry {
    /// 1-based position in the run, as a string.
    pub id: String,
    pub matrix: Card,
    pub matrix_hash: String,
}

/// The cards artifact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardsDocument {
    pub run_meta: RunMeta,
    pub cards: Vec<CardEntry>,
    /// Order-sensitive digest over the per-card hashes.
    pub cards_hash: String,
}

impl CardsDocument {
    #[must_use]
    pub fn new(run_meta: RunMeta, cards: &[Card]) -> Self {
        let entries = cards
            .iter()
            .enumerate()
            .map(|(i, card)| CardEntry {
                id: (i + 1).to_string(),
                matrix: card.clone(),
                matrix_hash: card.content_hash(),
            })
            .collect();
        Self {
            run_meta,
            cards: entries,
            cards_hash: cards_hash(cards),
        }
    }

    /// The card matrices in document order.
    #[must_use]
    pub fn cards(&self) -> Vec<Card> {
        self.cards.iter().map(|entry| entry.matrix.clone()).collect()
    }

    /// Entries whose stored hash disagrees with their matrix, by id.
    #[must_use]
    pub fn hash_mismatches(&self) -> Vec<String> {
        self.cards
            .iter()
            .filter(|entry| entry.matrix.content_hash() != entry.matrix_hash)
            .map(|entry| entry.id.clone())
            .collect()
    }

    /// Whether `cards_hash` matches the matrices.
    #[must_use]
    pub fn aggregate_hash_matches(&self) -> bool {
        cards_hash(&self.cards()) == self.cards_hash
    }
}

/// The report artifact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub run_meta: RunMeta,
    pub feasibility: Feasibility,
    pub verification: VerificationReport,
}
