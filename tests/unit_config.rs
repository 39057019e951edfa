// tests/unit_config.rs
use linkeval_core::config::Config;
use linkeval_core::store::{Aggregation, AggregationMode};
use std::fs;
use std::path::PathBuf;

#[test]
fn test_defaults() {
    let c = Config::new();
    assert_eq!(c.store.path, PathBuf::from("linkeval-store.json"));
    assert_eq!(c.store.aggregation, AggregationMode::Average);
    assert_eq!(c.evaluation.precision_rank, 3);
    assert_eq!(c.relay.topic, "links");
    assert_eq!(c.polling.period_secs, 5);
    assert_eq!(c.polling.stability_polls, 10);
    assert_eq!(c.polling.max_polls, 0);
    assert!((c.progress.pace - 5.0).abs() < f64::EPSILON);
    assert!(c.validate().is_ok());
}

#[test]
fn test_partial_toml_keeps_other_defaults() {
    let c = Config::parse_toml("[store]\naggregation = \"ewma\"\newma_factor = 0.25").unwrap();
    assert_eq!(c.aggregation().unwrap(), Aggregation::Ewma(0.25));
    assert_eq!(c.store.path, PathBuf::from("linkeval-store.json"));
    assert_eq!(c.evaluation.precision_rank, 3);
}

#[test]
fn test_load_explicit_file() {
    let d = tempfile::tempdir().unwrap();
    let path = d.path().join("custom.toml");
    fs::write(&path, "[evaluation]\nworkers = 3\nprecision_rank = 10\n[relay]\ntopic = \"raw\"").unwrap();
    let c = Config::load(Some(&path)).unwrap();
    assert_eq!(c.effective_workers(), 3);
    assert_eq!(c.evaluation.precision_rank, 10);
    assert_eq!(c.relay.topic, "raw");
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let d = tempfile::tempdir().unwrap();
    assert!(Config::load(Some(&d.path().join("absent.toml"))).is_err());
}

#[test]
fn test_invalid_values_are_rejected() {
    let d = tempfile::tempdir().unwrap();
    let path = d.path().join("bad.toml");
    fs::write(&path, "[store]\newma_factor = 1.5").unwrap();
    assert!(Config::load(Some(&path)).is_err());

    fs::write(&path, "[progress]\npace = 0.0").unwrap();
    assert!(Config::load(Some(&path)).is_err());

    fs::write(&path, "[store]\naggregation = \"median\"").unwrap();
    assert!(Config::load(Some(&path)).is_err());
}

#[test]
fn test_progress_pace_has_its_own_section() {
    let c = Config::parse_toml("[progress]\npace = 25.0\n[evaluation]\nprecision_rank = 4").unwrap();
    assert!((c.progress.pace - 25.0).abs() < f64::EPSILON);
    assert_eq!(c.evaluation.precision_rank, 4);

    let stale = Config::parse_toml("[evaluation]\nprogress_pace = 50.0").unwrap();
    assert!((stale.progress.pace - 5.0).abs() < f64::EPSILON);
}

#[test]
fn test_auto_workers_are_bounded() {
    let c = Config::new();
    let workers = c.effective_workers();
    assert!((1..=8).contains(&workers));
}
