//! Parameter contract hash.
//!
//! Only the keys in [`PARAMS_HASH_KEYS`] contribute. They are serialized as
//! compact JSON with sorted keys and digested with SHA-256, so output paths,
//! logging and other presentation settings never change the hash.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::core::card::digest_str;

use super::model::Settings;
use super::resolve::SettingsError;

/// Dotted keys included in the parameter contract.
pub const PARAMS_HASH_KEYS: [&str; 13] = [
    "R",
    "T",
    "m",
    "n",
    "unique_scope",
    "uniformity",
    "position_balance",
    "build_timeout_sec",
    "swap_iterations",
    "parallel",
    "parallelism",
    "seed.engine",
    "seed.value",
];

/// `"sha256:<hex>"` over the canonical contract of `settings`.
pub fn params_hash(settings: &Settings) -> Result<String, SettingsError> {
    Ok(digest_str(&canonical_contract(settings)?))
}

/// Compact, key-sorted JSON of the contract keys. Absent values are left out.
pub fn canonical_contract(settings: &Settings) -> Result<String, SettingsError> {
    let tree = serde_json::to_value(settings)?;
    let contract: BTreeMap<&str, &Value> = PARAMS_HASH_KEYS
        .iter()
        .filter_map(|&key| lookup(&tree, key).map(|value| (key, value)))
        .filter(|(_, value)| !value.is_null())
        .collect();
    Ok(serde_json::to_string(&contract)?)
}

fn lookup<'a>(tree: &'a Value, dotted: &str) -> Option<&'a Value> {
    dotted.split('.').try_fold(tree, |node, part| node.get(part))
}
