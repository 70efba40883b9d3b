//! Layered settings resolution against real config files.

use std::fs;
use std::path::{Path, PathBuf};

use bingo_cards::settings::{params_hash, resolve, Overrides, SettingsError};
use bingo_cards::{RngEngine, Settings, Uniformity, UniqueScope};
use serde_json::json;
use tempfile::TempDir;

fn no_env() -> Vec<(String, String)> {
    Vec::new()
}

fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

// =============================================================================
// Config Files
// =============================================================================

#[test]
fn test_defaults_without_any_source() {
    let cwd = TempDir::new().unwrap();
    let resolved = resolve(None, &Overrides::new(), no_env(), cwd.path()).unwrap();
    assert_eq!(resolved.settings, Settings::default());
    assert_eq!(resolved.config_path, None);
    assert_eq!(resolved.params_hash, params_hash(&Settings::default()).unwrap());
}

#[test]
fn test_yaml_file() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "run.yaml",
        "R: 75\nT: 5\nuniformity: near\nunique_scope: [row_sets, col_sets]\nseed:\n  value: 9\n",
    );
    let resolved = resolve(Some(&path), &Overrides::new(), no_env(), dir.path()).unwrap();
    let s = &resolved.settings;
    assert_eq!(s.r, 75);
    assert_eq!(s.t, 5);
    assert_eq!(s.uniformity, Uniformity::Near);
    assert_eq!(s.unique_scope, UniqueScope::both());
    assert_eq!(s.seed.value, 9);
    assert_eq!(s.seed.engine, RngEngine::ChaCha8);
    assert_eq!(resolved.config_path.as_deref(), Some(path.as_path()));
}

#[test]
fn test_json_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "run.json", r#"{"m": 2, "n": 4, "seed": {"engine": "chacha20"}}"#);
    let resolved = resolve(Some(&path), &Overrides::new(), no_env(), dir.path()).unwrap();
    assert_eq!(resolved.settings.m, 2);
    assert_eq!(resolved.settings.n, 4);
    assert_eq!(resolved.settings.seed.engine, RngEngine::ChaCha20);
    assert_eq!(resolved.settings.seed.value, 42);
}

#[test]
fn test_toml_file() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "run.toml",
        "R = 60\nposition_balance = true\n\n[seed]\nvalue = 5\n",
    );
    let resolved = resolve(Some(&path), &Overrides::new(), no_env(), dir.path()).unwrap();
    assert_eq!(resolved.settings.r, 60);
    assert!(resolved.settings.position_balance);
    assert_eq!(resolved.settings.seed.value, 5);
}

#[test]
fn test_empty_yaml_is_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "empty.yml", "");
    let resolved = resolve(Some(&path), &Overrides::new(), no_env(), dir.path()).unwrap();
    assert_eq!(resolved.settings, Settings::default());
}

#[test]
fn test_file_errors() {
    let dir = TempDir::new().unwrap();

    let missing = dir.path().join("missing.yaml");
    assert!(matches!(
        resolve(Some(&missing), &Overrides::new(), no_env(), dir.path()),
        Err(SettingsError::NotFound(_))
    ));

    let ini = write(&dir, "run.ini", "R=1");
    assert!(matches!(
        resolve(Some(&ini), &Overrides::new(), no_env(), dir.path()),
        Err(SettingsError::UnsupportedExtension(ext)) if ext == "ini"
    ));

    let list = write(&dir, "list.yaml", "- 1\n- 2\n");
    assert!(matches!(
        resolve(Some(&list), &Overrides::new(), no_env(), dir.path()),
        Err(SettingsError::NotAMapping(_))
    ));

    let bad = write(&dir, "bad.json", r#"{"uniformity": "loose"}"#);
    assert!(matches!(
        resolve(Some(&bad), &Overrides::new(), no_env(), dir.path()),
        Err(SettingsError::Invalid(_))
    ));
}

// =============================================================================
// Precedence
// =============================================================================

#[test]
fn test_precedence_cli_over_env_over_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "run.yaml", "R: 70\nT: 7\nm: 2\n");
    let env = vec![
        ("BINGO_GEN_T".to_string(), "8".to_string()),
        ("BINGO_GEN_M".to_string(), "4".to_string()),
    ];
    let mut cli = Overrides::new();
    cli.insert("m".into(), json!(5));

    let resolved = resolve(Some(&path), &cli, env, dir.path()).unwrap();
    assert_eq!(resolved.settings.r, 70);
    assert_eq!(resolved.settings.t, 8);
    assert_eq!(resolved.settings.m, 5);
}

#[test]
fn test_env_bad_integer_is_invalid() {
    let cwd = TempDir::new().unwrap();
    let env = vec![("BINGO_GEN_R".to_string(), "ninety".to_string())];
    assert!(matches!(
        resolve(None, &Overrides::new(), env, cwd.path()),
        Err(SettingsError::Invalid(_))
    ));
}

// =============================================================================
// Paths and Hash
// =============================================================================

#[test]
fn test_relative_paths_resolve_per_source() {
    let config_dir = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();
    let path = write(
        &config_dir,
        "run.yaml",
        "out_cards: out/cards.json\nout_report: out/report.json\nsummary_csv: ''\n",
    );
    let mut cli = Overrides::new();
    cli.insert("out_report".into(), json!("report.json"));

    let resolved = resolve(Some(&path), &cli, no_env(), cwd.path()).unwrap();
    let s = &resolved.settings;
    assert_eq!(s.out_cards.as_deref(), Some(config_dir.path().join("out/cards.json").as_path()));
    assert_eq!(s.out_report.as_deref(), Some(cwd.path().join("report.json").as_path()));
    assert_eq!(s.summary_csv, None);
}

#[test]
fn test_absolute_paths_kept() {
    let cwd = TempDir::new().unwrap();
    let target = cwd.path().join("abs.json");
    let mut cli = Overrides::new();
    cli.insert("out_cards".into(), json!(target.to_string_lossy()));
    let resolved = resolve(None, &cli, no_env(), Path::new("/nonexistent")).unwrap();
    assert_eq!(resolved.settings.out_cards, Some(target));
}

#[test]
fn test_hash_ignores_output_settings() {
    let cwd = TempDir::new().unwrap();
    let plain = resolve(None, &Overrides::new(), no_env(), cwd.path()).unwrap();

    let mut cli = Overrides::new();
    cli.insert("out_cards".into(), json!("cards.json"));
    cli.insert("log_level".into(), json!("debug"));
    cli.insert("max_attempts".into(), json!(3));
    let with_outputs = resolve(None, &cli, no_env(), cwd.path()).unwrap();
    assert_eq!(plain.params_hash, with_outputs.params_hash);

    let mut seeded = Overrides::new();
    seeded.insert("seed.value".into(), json!(43));
    let reseeded = resolve(None, &seeded, no_env(), cwd.path()).unwrap();
    assert_ne!(plain.params_hash, reseeded.params_hash);
}

#[test]
fn test_generation_config_from_settings() {
    let cwd = TempDir::new().unwrap();
    let mut cli = Overrides::new();
    cli.insert("R".into(), json!(30));
    cli.insert("T".into(), json!(5));
    cli.insert("m".into(), json!(2));
    cli.insert("n".into(), json!(3));
    cli.insert("strategy".into(), json!("heuristic"));
    let resolved = resolve(None, &cli, no_env(), cwd.path()).unwrap();

    let config = resolved.settings.generation_config();
    assert_eq!((config.r, config.t, config.m, config.n), (30, 5, 2, 3));
    assert_eq!(config.seed, 42);
    let outcome = bingo_cards::generate(&config).unwrap();
    assert_eq!(outcome.cards.len(), 5);
}
