//! Deterministic random number generation for card construction.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed and engine produce an identical sequence
//! - **Selectable engine**: ChaCha8, ChaCha12 or ChaCha20 by name
//! - **Seed derivation**: Attempt-specific seeds via a one-way hash of
//!   `(base seed, index, purpose)`
//!
//! ## Attempt Usage
//!
//! ```
//! use bingo_cards::core::{derive_seed, CardRng, RngEngine};
//!
//! let seed0 = derive_seed(42, 0, "build");
//! let seed1 = derive_seed(42, 1, "build");
//! assert_ne!(seed0, seed1);
//!
//! let mut a = CardRng::new(RngEngine::ChaCha8, seed0);
//! let mut b = CardRng::new(RngEngine::ChaCha8, seed0);
//! assert_eq!(a.draw_uniform_int(1, 90), b.draw_uniform_int(1, 90));
//! ```

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::{ChaCha12Rng, ChaCha20Rng, ChaCha8Rng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::error::ConfigError;

/// Named RNG engine backing a [`CardRng`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RngEngine {
    /// ChaCha with 8 rounds. Fast, the default.
    #[default]
    ChaCha8,
    /// ChaCha with 12 rounds.
    ChaCha12,
    /// ChaCha with 20 rounds.
    ChaCha20,
}

impl RngEngine {
    /// Canonical lowercase name, as accepted by `FromStr`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ChaCha8 => "chacha8",
            Self::ChaCha12 => "chacha12",
            Self::ChaCha20 => "chacha20",
        }
    }
}

impl fmt::Display for RngEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RngEngine {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "chacha8" => Ok(Self::ChaCha8),
            "chacha12" => Ok(Self::ChaCha12),
            "chacha20" => Ok(Self::ChaCha20),
            other => Err(ConfigError::UnsupportedEngine(other.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
enum Inner {
    ChaCha8(ChaCha8Rng),
    ChaCha12(ChaCha12Rng),
    ChaCha20(ChaCha20Rng),
}

/// Dispatch a call to whichever ChaCha variant is active.
macro_rules! with_inner {
    ($self:expr, $rng:ident => $body:expr) => {
        match &mut $self.inner {
            Inner::ChaCha8($rng) => $body,
            Inner::ChaCha12($rng) => $body,
            Inner::ChaCha20($rng) => $body,
        }
    };
}

/// Deterministic random stream consumed by the card construction engine.
///
/// One stream per run attempt; never shared between attempts.
#[derive(Clone, Debug)]
pub struct CardRng {
    inner: Inner,
    engine: RngEngine,
    seed: u64,
}

impl CardRng {
    /// Create a new stream for the given engine and seed.
    #[must_use]
    pub fn new(engine: RngEngine, seed: u64) -> Self {
        let inner = match engine {
            RngEngine::ChaCha8 => Inner::ChaCha8(ChaCha8Rng::seed_from_u64(seed)),
            RngEngine::ChaCha12 => Inner::ChaCha12(ChaCha12Rng::seed_from_u64(seed)),
            RngEngine::ChaCha20 => Inner::ChaCha20(ChaCha20Rng::seed_from_u64(seed)),
        };
        Self { inner, engine, seed }
    }

    /// Stream for one run attempt: seeded with `derive_seed(base, attempt, purpose)`.
    #[must_use]
    pub fn for_attempt(engine: RngEngine, base_seed: u64, attempt: u64, purpose: &str) -> Self {
        Self::new(engine, derive_seed(base_seed, attempt, purpose))
    }

    /// The seed this stream was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The engine backing this stream.
    #[must_use]
    pub fn engine(&self) -> RngEngine {
        self.engine
    }

    /// Uniform integer in the inclusive range `[a, b]`.
    ///
    /// Panics if `a > b`.
    pub fn draw_uniform_int(&mut self, a: u32, b: u32) -> u32 {
        with_inner!(self, rng => rng.gen_range(a..=b))
    }

    /// Uniform float in `[0, 1)`.
    pub fn draw_float(&mut self) -> f64 {
        with_inner!(self, rng => rng.gen::<f64>())
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        with_inner!(self, rng => slice.shuffle(rng))
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        with_inner!(self, rng => slice.choose(rng))
    }

    /// Draw `k` distinct positions of `seq` and return their values.
    ///
    /// If `k >= seq.len()` the whole sequence is returned in random order.
    pub fn sample<T: Copy>(&mut self, seq: &[T], k: usize) -> Vec<T> {
        let k = k.min(seq.len());
        with_inner!(self, rng => seq.choose_multiple(rng, k).copied().collect())
    }
}

/// Derive a seed from `(base_seed, index, purpose)`.
///
/// SHA-256 over `"{base_seed}|{index}|{purpose}"`, first eight bytes read
/// big-endian and masked to 63 bits so the result is always non-negative
/// in signed representations.
#[must_use]
pub fn derive_seed(base_seed: u64, index: u64, purpose: &str) -> u64 {
    let digest = Sha256::digest(format!("{base_seed}|{index}|{purpose}").as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(head) & ((1 << 63) - 1)
}
