//! Generation parameters.
//!
//! `GenerationConfig` carries everything the planner, engine and
//! orchestrator need. Retry caps are exposed as fields so they can be
//! tuned per run:
//!
//! - `card_restarts`: whole-card restarts before an attempt is abandoned
//! - `row_sample_attempts`: random samples tried per row before the
//!   contiguous-slice fallback
//! - `swap_iterations`: random shuffles tried when ordering one row
//! - `column_permutation_cap` / `column_search_cap`: completeness vs runtime
//!   of the column-arrangement search

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::rng::RngEngine;

/// Permutations of one row considered by the column search.
pub const DEFAULT_COLUMN_PERMUTATION_CAP: usize = 120;

/// Row arrangements visited by the column search before giving up.
pub const DEFAULT_COLUMN_SEARCH_CAP: usize = 5_000;

/// How evenly pool numbers are used across the run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Uniformity {
    /// Every number used exactly `P / R` times. Requires `P mod R == 0`.
    #[default]
    Strict,
    /// Per-number counts differ by at most one.
    Near,
}

impl Uniformity {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Near => "near",
        }
    }
}

impl fmt::Display for Uniformity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Uniformity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "near" => Ok(Self::Near),
            other => Err(ConfigError::UnsupportedUniformity(other.to_string())),
        }
    }
}

/// One kind of global set uniqueness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    RowSets,
    ColSets,
}

impl Scope {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RowSets => "row_sets",
            Self::ColSets => "col_sets",
        }
    }
}

impl FromStr for Scope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "row_sets" => Ok(Self::RowSets),
            "col_sets" => Ok(Self::ColSets),
            other => Err(ConfigError::UnsupportedScope(other.to_string())),
        }
    }
}

/// The subset of {row_sets, col_sets} for which collisions are forbidden.
///
/// Serializes as a sorted, deduplicated list of scope names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct UniqueScope {
    pub row_sets: bool,
    pub col_sets: bool,
}

impl UniqueScope {
    /// No set uniqueness enforced.
    #[must_use]
    pub const fn none() -> Self {
        Self { row_sets: false, col_sets: false }
    }

    /// Row-set uniqueness only.
    #[must_use]
    pub const fn rows() -> Self {
        Self { row_sets: true, col_sets: false }
    }

    /// Column-set uniqueness only.
    #[must_use]
    pub const fn cols() -> Self {
        Self { row_sets: false, col_sets: true }
    }

    /// Both row-set and column-set uniqueness.
    #[must_use]
    pub const fn both() -> Self {
        Self { row_sets: true, col_sets: true }
    }

    #[must_use]
    pub fn contains(&self, scope: Scope) -> bool {
        match scope {
            Scope::RowSets => self.row_sets,
            Scope::ColSets => self.col_sets,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.row_sets && !self.col_sets
    }

    /// Parse from scope names; duplicates are ignored.
    pub fn parse<I, S>(names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scope = Self::none();
        for name in names {
            match name.as_ref().parse::<Scope>()? {
                Scope::RowSets => scope.row_sets = true,
                Scope::ColSets => scope.col_sets = true,
            }
        }
        Ok(scope)
    }

    /// Sorted scope names.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut out = Vec::with_capacity(2);
        if self.col_sets {
            out.push(Scope::ColSets.name());
        }
        if self.row_sets {
            out.push(Scope::RowSets.name());
        }
        out
    }
}

impl TryFrom<Vec<String>> for UniqueScope {
    type Error = ConfigError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<UniqueScope> for Vec<String> {
    fn from(scope: UniqueScope) -> Self {
        scope.names().into_iter().map(String::from).collect()
    }
}

/// Which construction to use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Cyclic construction when no uniqueness scope is requested and it
    /// applies; the randomized engine otherwise.
    #[default]
    Auto,
    /// Randomized constructive search only.
    Heuristic,
    /// Cyclic construction only.
    Cyclic,
}

impl Strategy {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Heuristic => "heuristic",
            Self::Cyclic => "cyclic",
        }
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "heuristic" => Ok(Self::Heuristic),
            "cyclic" => Ok(Self::Cyclic),
            other => Err(ConfigError::UnsupportedStrategy(other.to_string())),
        }
    }
}

/// Complete parameter set for one generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Pool size: numbers are drawn from `1..=r`.
    pub r: u32,

    /// Number of cards.
    pub t: usize,

    /// Rows per card.
    pub m: usize,

    /// Columns per card.
    pub n: usize,

    pub uniformity: Uniformity,

    pub unique_scope: UniqueScope,

    /// Soft preference for spreading each number over card positions.
    pub position_balance: bool,

    /// Base seed; each attempt derives its own seed from it.
    pub seed: u64,

    pub engine: RngEngine,

    pub strategy: Strategy,

    /// Random shuffles tried when ordering one row.
    pub swap_iterations: u32,

    /// Full-run attempts before giving up.
    pub max_attempts: u32,

    /// Whole-card restarts before the attempt is abandoned.
    pub card_restarts: u32,

    /// Random samples tried per row before the slice fallback.
    pub row_sample_attempts: u32,

    /// Permutations of one row considered by the column search.
    pub column_permutation_cap: usize,

    /// Row arrangements visited by the column search.
    pub column_search_cap: usize,

    /// Minimum absolute difference between any two numbers on a card.
    /// 0 disables the check.
    pub min_distance: u32,

    /// Wall-clock budget, checked between attempts.
    pub build_timeout_sec: Option<u64>,

    /// Run attempts concurrently in batches.
    pub parallel: bool,

    /// Batch size for parallel attempts (0 = rayon thread count).
    pub parallelism: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            r: 90,
            t: 6,
            m: 3,
            n: 5,
            uniformity: Uniformity::Strict,
            unique_scope: UniqueScope::rows(),
            position_balance: false,
            seed: 42,
            engine: RngEngine::ChaCha8,
            strategy: Strategy::Auto,
            swap_iterations: 24,
            max_attempts: 50,
            card_restarts: 200,
            row_sample_attempts: 64,
            column_permutation_cap: DEFAULT_COLUMN_PERMUTATION_CAP,
            column_search_cap: DEFAULT_COLUMN_SEARCH_CAP,
            min_distance: 0,
            build_timeout_sec: None,
            parallel: false,
            parallelism: 0,
        }
    }
}

impl GenerationConfig {
    /// Config for `t` cards of `m x n` drawn from `1..=r`, other fields default.
    #[must_use]
    pub fn new(r: u32, t: usize, m: usize, n: usize) -> Self {
        Self { r, t, m, n, ..Self::default() }
    }

    #[must_use]
    pub fn with_uniformity(mut self, uniformity: Uniformity) -> Self {
        self.uniformity = uniformity;
        self
    }

    #[must_use]
    pub fn with_unique_scope(mut self, scope: UniqueScope) -> Self {
        self.unique_scope = scope;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_engine(mut self, engine: RngEngine) -> Self {
        self.engine = engine;
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_position_balance(mut self, enabled: bool) -> Self {
        self.position_balance = enabled;
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_card_restarts(mut self, restarts: u32) -> Self {
        self.card_restarts = restarts;
        self
    }

    #[must_use]
    pub fn with_min_distance(mut self, distance: u32) -> Self {
        self.min_distance = distance;
        self
    }

    #[must_use]
    pub fn with_timeout_sec(mut self, secs: u64) -> Self {
        self.build_timeout_sec = Some(secs);
        self
    }

    #[must_use]
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallel = true;
        self.parallelism = parallelism;
        self
    }

    /// Cells per card (`m * n`).
    #[must_use]
    pub fn cells_per_card(&self) -> usize {
        self.m * self.n
    }

    /// Total cell demand of the run, `P = T * m * n`.
    #[must_use]
    pub fn total_cells(&self) -> u64 {
        (self.t as u64) * (self.m as u64) * (self.n as u64)
    }

    /// Reject parameter sets that can never produce a valid card.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.r == 0 {
            return Err(ConfigError::ZeroDimension("R"));
        }
        if self.t == 0 {
            return Err(ConfigError::ZeroDimension("T"));
        }
        if self.m == 0 {
            return Err(ConfigError::ZeroDimension("m"));
        }
        if self.n == 0 {
            return Err(ConfigError::ZeroDimension("n"));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroDimension("max_attempts"));
        }
        if self.card_restarts == 0 {
            return Err(ConfigError::ZeroDimension("card_restarts"));
        }
        let cells = self.cells_per_card();
        if (self.r as usize) < cells {
            return Err(ConfigError::PoolTooSmall { r: self.r, cells });
        }
        Ok(())
    }
}
