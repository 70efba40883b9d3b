//! Settings resolution for the `bingo` binary.
//!
//! Precedence is CLI > environment (`BINGO_GEN_*`) > config file > defaults.
//! The resolved [`Settings`] map onto a [`GenerationConfig`] and carry a
//! parameter hash that identifies the generation contract.
//!
//! [`GenerationConfig`]: crate::core::GenerationConfig

pub mod hash;
pub mod model;
pub mod resolve;

pub use hash::{canonical_contract, params_hash, PARAMS_HASH_KEYS};
pub use model::{SeedSettings, Settings};
pub use resolve::{
    apply_overrides, collect_env, merge_tree, parse_bool, parse_list, read_config_file, resolve,
    Overrides, ResolvedSettings, SettingsError, ENV_PREFIX, PATH_KEYS,
};
