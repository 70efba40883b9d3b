//! Resolved settings and their mapping onto [`GenerationConfig`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::{
    GenerationConfig, RngEngine, Strategy, Uniformity, UniqueScope,
    DEFAULT_COLUMN_PERMUTATION_CAP, DEFAULT_COLUMN_SEARCH_CAP,
};
use crate::output::WriteOptions;

/// Seed section: `seed.value` and `seed.engine`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedSettings {
    pub value: u64,
    pub engine: RngEngine,
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self {
            value: 42,
            engine: RngEngine::ChaCha8,
        }
    }
}

/// Every key the resolver understands, after merging all sources.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "R")]
    pub r: u32,
    #[serde(rename = "T")]
    pub t: usize,
    pub m: usize,
    pub n: usize,
    pub uniformity: Uniformity,
    pub unique_scope: UniqueScope,
    pub position_balance: bool,
    pub seed: SeedSettings,
    pub strategy: Strategy,
    pub swap_iterations: u32,
    pub max_attempts: u32,
    pub card_restarts: u32,
    pub row_sample_attempts: u32,
    pub column_permutation_cap: usize,
    pub column_search_cap: usize,
    pub min_distance: u32,
    pub build_timeout_sec: Option<u64>,
    pub parallel: bool,
    pub parallelism: usize,

    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub out_cards: Option<PathBuf>,
    pub out_report: Option<PathBuf>,
    pub summary_csv: Option<PathBuf>,
    pub mkdirs: bool,
    pub force: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let config = GenerationConfig::default();
        Self {
            r: config.r,
            t: config.t,
            m: config.m,
            n: config.n,
            uniformity: Uniformity::Strict,
            unique_scope: UniqueScope::rows(),
            position_balance: false,
            seed: SeedSettings::default(),
            strategy: Strategy::Auto,
            swap_iterations: config.swap_iterations,
            max_attempts: config.max_attempts,
            card_restarts: config.card_restarts,
            row_sample_attempts: config.row_sample_attempts,
            column_permutation_cap: DEFAULT_COLUMN_PERMUTATION_CAP,
            column_search_cap: DEFAULT_COLUMN_SEARCH_CAP,
            min_distance: 0,
            build_timeout_sec: None,
            parallel: false,
            parallelism: 0,
            log_level: "info".to_string(),
            log_file: None,
            out_cards: None,
            out_report: None,
            summary_csv: None,
            mkdirs: false,
            force: false,
        }
    }
}

impl Settings {
    /// The generation parameters carried by these settings.
    #[must_use]
    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            r: self.r,
            t: self.t,
            m: self.m,
            n: self.n,
            uniformity: self.uniformity,
            unique_scope: self.unique_scope,
            position_balance: self.position_balance,
            seed: self.seed.value,
            engine: self.seed.engine,
            strategy: self.strategy,
            swap_iterations: self.swap_iterations,
            max_attempts: self.max_attempts,
            card_restarts: self.card_restarts,
            row_sample_attempts: self.row_sample_attempts,
            column_permutation_cap: self.column_permutation_cap,
            column_search_cap: self.column_search_cap,
            min_distance: self.min_distance,
            build_timeout_sec: self.build_timeout_sec,
            parallel: self.parallel,
            parallelism: self.parallelism,
        }
    }

    #[must_use]
    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            mkdirs: self.mkdirs,
            overwrite: self.force,
        }
    }
}
