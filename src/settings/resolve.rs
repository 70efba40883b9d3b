//! Layered settings resolution.
//!
//! Sources, lowest to highest precedence:
//!
//! 1. built-in defaults
//! 2. config file (YAML, JSON or TOML, chosen by extension)
//! 3. `BINGO_GEN_*` environment variables
//! 4. CLI overrides
//!
//! Every layer is merged as a JSON tree before the result is deserialized
//! into [`Settings`]. Override keys may be dotted (`seed.value`).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use super::hash::params_hash;
use super::model::Settings;

/// Prefix of every recognized environment variable.
pub const ENV_PREFIX: &str = "BINGO_GEN_";

/// Keys holding filesystem paths.
pub const PATH_KEYS: [&str; 4] = ["out_cards", "out_report", "summary_csv", "log_file"];

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported config extension '{0}' (expected .yaml, .yml, .json or .toml)")]
    UnsupportedExtension(String),

    #[error("top-level config in {0} must be a mapping")]
    NotAMapping(PathBuf),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Dotted-key overrides, typically built from CLI arguments.
pub type Overrides = BTreeMap<String, Value>;

/// Outcome of [`resolve`].
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedSettings {
    pub settings: Settings,
    /// Digest of the parameter contract, `"sha256:<hex>"`.
    pub params_hash: String,
    /// Absolute path of the config file, if one was read.
    pub config_path: Option<PathBuf>,
}

/// Merge defaults, `config_path`, `env` and `cli` into resolved settings.
///
/// Relative paths set by the config file resolve against the config file's
/// directory; relative paths set on the CLI resolve against `cwd`.
pub fn resolve<I>(
    config_path: Option<&Path>,
    cli: &Overrides,
    env: I,
    cwd: &Path,
) -> Result<ResolvedSettings, SettingsError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let config_path = config_path.map(|p| absolute(p, cwd));
    let mut merged = serde_json::to_value(Settings::default())?;

    if let Some(path) = &config_path {
        let file = read_config_file(path)?;
        debug!(path = %path.display(), "loaded config file");
        merge_tree(&mut merged, file);
    }
    apply_overrides(&mut merged, &collect_env(env));
    apply_overrides(&mut merged, cli);

    let config_dir = config_path.as_deref().and_then(Path::parent).unwrap_or(cwd);
    normalize_paths(&mut merged, cli, config_dir, cwd);

    let settings: Settings =
        serde_json::from_value(merged).map_err(|e| SettingsError::Invalid(e.to_string()))?;
    let params_hash = params_hash(&settings)?;
    Ok(ResolvedSettings {
        settings,
        params_hash,
        config_path,
    })
}

/// Parse a config file into a JSON tree by extension.
pub fn read_config_file(path: &Path) -> Result<Value, SettingsError> {
    if !path.exists() {
        return Err(SettingsError::NotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let value = match extension.as_str() {
        "yaml" | "yml" => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(&text)?;
            if yaml.is_null() {
                Value::Object(Map::new())
            } else {
                serde_json::to_value(yaml)?
            }
        }
        "json" => serde_json::from_str(&text)?,
        "toml" => serde_json::to_value(toml::from_str::<toml::Table>(&text)?)?,
        other => return Err(SettingsError::UnsupportedExtension(other.to_string())),
    };
    if !value.is_object() {
        return Err(SettingsError::NotAMapping(path.to_path_buf()));
    }
    Ok(value)
}

enum EnvKind {
    Integer,
    Bool,
    List,
    Text,
}

/// Environment variable suffix, settings key and value kind.
const ENV_KEYS: &[(&str, &str, EnvKind)] = &[
    ("R", "R", EnvKind::Integer),
    ("T", "T", EnvKind::Integer),
    ("M", "m", EnvKind::Integer),
    ("N", "n", EnvKind::Integer),
    ("UNIQUE_SCOPE", "unique_scope", EnvKind::List),
    ("UNIFORMITY", "uniformity", EnvKind::Text),
    ("POSITION_BALANCE", "position_balance", EnvKind::Bool),
    ("SEED_VALUE", "seed.value", EnvKind::Integer),
    ("SEED_ENGINE", "seed.engine", EnvKind::Text),
    ("STRATEGY", "strategy", EnvKind::Text),
    ("BUILD_TIMEOUT_SEC", "build_timeout_sec", EnvKind::Integer),
    ("SWAP_ITERATIONS", "swap_iterations", EnvKind::Integer),
    ("MAX_ATTEMPTS", "max_attempts", EnvKind::Integer),
    ("MIN_DISTANCE", "min_distance", EnvKind::Integer),
    ("LOG_LEVEL", "log_level", EnvKind::Text),
    ("LOG_FILE", "log_file", EnvKind::Text),
    ("OUT_CARDS", "out_cards", EnvKind::Text),
    ("OUT_REPORT", "out_report", EnvKind::Text),
    ("SUMMARY_CSV", "summary_csv", EnvKind::Text),
    ("PARALLEL", "parallel", EnvKind::Bool),
    ("PARALLELISM", "parallelism", EnvKind::Integer),
];

/// Map recognized `BINGO_GEN_*` variables to dotted settings keys.
///
/// Unparseable integers are kept as strings so deserialization reports them.
pub fn collect_env<I>(env: I) -> Overrides
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut out = Overrides::new();
    for (name, raw) in env {
        let Some(suffix) = name.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let Some((_, key, kind)) = ENV_KEYS.iter().find(|(s, _, _)| *s == suffix) else {
            continue;
        };
        let value = match kind {
            EnvKind::Integer => raw
                .trim()
                .parse::<u64>()
                .map_or_else(|_| Value::String(raw.clone()), Value::from),
            EnvKind::Bool => Value::Bool(parse_bool(&raw)),
            EnvKind::List => Value::from(parse_list(&raw)),
            EnvKind::Text => Value::String(raw.clone()),
        };
        out.insert((*key).to_string(), value);
    }
    out
}

/// `1`, `true`, `yes` and `on` (any case) are true; anything else is false.
#[must_use]
pub fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Comma-separated list with blanks dropped.
#[must_use]
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Recursively merge `layer` into `base`; objects merge, everything else
/// replaces.
pub fn merge_tree(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Object(base), Value::Object(layer)) => {
            for (key, value) in layer {
                match base.get_mut(&key) {
                    Some(slot) => merge_tree(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Apply dotted-key overrides.
pub fn apply_overrides(base: &mut Value, overrides: &Overrides) {
    for (key, value) in overrides {
        set_dotted(base, key, value.clone());
    }
}

fn set_dotted(base: &mut Value, key: &str, value: Value) {
    let mut cursor = base;
    let mut parts = key.split('.').peekable();
    while let Some(part) = parts.next() {
        if !cursor.is_object() {
            *cursor = Value::Object(Map::new());
        }
        let Value::Object(map) = cursor else {
            return;
        };
        if parts.peek().is_none() {
            map.insert(part.to_string(), value);
            return;
        }
        cursor = map
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
}

fn normalize_paths(merged: &mut Value, cli: &Overrides, config_dir: &Path, cwd: &Path) {
    let Value::Object(map) = merged else {
        return;
    };
    for key in PATH_KEYS {
        let Some(Value::String(raw)) = map.get(key) else {
            continue;
        };
        let normalized = if raw.is_empty() {
            Value::Null
        } else {
            let base = if cli.contains_key(key) { cwd } else { config_dir };
            Value::String(absolute(Path::new(raw), base).to_string_lossy().into_owned())
        };
        map.insert(key.to_string(), normalized);
    }
}

fn absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
