//! Artifact emission: documents written to disk and read back.

use std::fs;

use bingo_cards::output::{read_cards_document, write_json, write_summary_csv, WriteOptions};
use bingo_cards::settings::params_hash;
use bingo_cards::{
    assess, generate, verify, CardsDocument, GenerationConfig, ReportDocument, RunMeta, Settings,
};
use serde_json::Value;
use tempfile::TempDir;

fn sample_run() -> (GenerationConfig, CardsDocument, ReportDocument) {
    let config = GenerationConfig::new(30, 5, 2, 3).with_seed(11);
    let outcome = generate(&config).unwrap();
    let hash = params_hash(&Settings::default()).unwrap();
    let meta = RunMeta::new(&config, &outcome, &hash);
    let verification = verify(&outcome.cards, config.r, config.unique_scope, config.uniformity);
    let cards = CardsDocument::new(meta.clone(), &outcome.cards);
    let report = ReportDocument {
        run_meta: meta,
        feasibility: assess(&config),
        verification,
    };
    (config, cards, report)
}

#[test]
fn test_cards_document_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cards.json");
    let (config, document, _) = sample_run();

    write_json(&path, &document, WriteOptions::default()).unwrap();
    let loaded = read_cards_document(&path).unwrap();
    assert_eq!(loaded, document);
    assert!(loaded.hash_mismatches().is_empty());
    assert!(loaded.aggregate_hash_matches());

    let report = verify(&loaded.cards(), config.r, config.unique_scope, config.uniformity);
    assert!(report.is_clean());
}

#[test]
fn test_cards_document_layout() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cards.json");
    let (_, document, _) = sample_run();
    write_json(&path, &document, WriteOptions::default()).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.ends_with('\n'));
    let json: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["run_meta"]["seed"], 11);
    assert_eq!(json["run_meta"]["rng_engine"], "chacha8");
    assert_eq!(json["run_meta"]["hash_algorithm"], "sha256");
    assert_eq!(json["cards"][0]["id"], "1");
    assert_eq!(json["cards"].as_array().map(Vec::len), Some(5));
    assert!(json["cards_hash"].as_str().unwrap().starts_with("sha256:"));
}

#[test]
fn test_tampered_document_detected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cards.json");
    let (_, mut document, _) = sample_run();
    document.cards[1].matrix_hash = "sha256:00".to_string();
    write_json(&path, &document, WriteOptions::default()).unwrap();

    let loaded = read_cards_document(&path).unwrap();
    assert_eq!(loaded.hash_mismatches(), vec!["2".to_string()]);
    assert!(loaded.aggregate_hash_matches());
}

#[test]
fn test_report_document_layout() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reports").join("report.json");
    let (_, _, report) = sample_run();

    let options = WriteOptions {
        mkdirs: true,
        overwrite: false,
    };
    write_json(&path, &report, options).unwrap();
    let json: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["feasibility"]["feasible"], true);
    assert_eq!(json["verification"]["uniformity"]["max_minus_min"], 0);
    assert_eq!(json["verification"]["uniqueness"]["row_set_collisions"], 0);
    assert_eq!(
        json["verification"]["tests"]["global"]["engine"],
        "wilson_hilferty"
    );

    assert!(write_json(&path, &report, options).is_err());
}

#[test]
fn test_summary_csv_sections() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("summary.csv");
    let (_, _, report) = sample_run();
    let freqs = &report.verification.frequencies;

    write_summary_csv(
        &path,
        freqs,
        Some(&report.verification.position_frequencies),
        WriteOptions::default(),
    )
    .unwrap();
    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "number,total");
    assert_eq!(lines[1], "1,1");
    assert_eq!(lines[31], "");
    assert_eq!(lines[32], "position,number,count");
    assert!(lines[33].starts_with("\"(0,0)\","));
}
