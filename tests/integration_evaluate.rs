// tests/integration_evaluate.rs
//! End-to-end AUC / Precision@k against a file-backed score store.

use linkeval_core::eval::{self, EvaluationKind, EvaluationPlan, EvaluationResult, EvaluationSets};
use linkeval_core::link::{write_links, LinkKind, LinkRecord, MetricKind};
use linkeval_core::store::{with_store, Aggregation, MemoryStore, ScoreStore};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const NTA: LinkKind = LinkKind::Mined(MetricKind::Nta);

fn records(pairs: &[(u64, u64)]) -> Vec<LinkRecord> {
    pairs.iter().map(|&(u, v)| LinkRecord::real(u, v, 1.0)).collect()
}

fn train() -> Vec<LinkRecord> {
    records(&[(1, 2), (2, 3), (3, 4), (4, 5)])
}

fn test_links() -> Vec<LinkRecord> {
    records(&[(1, 3), (3, 5)])
}

fn dataset() -> Vec<LinkRecord> {
    let mut all = train();
    all.extend(test_links());
    all.extend(records(&[(2, 5)]));
    all
}

/// missing {(1,3),(3,5)}, nonexistent {(1,4),(1,5),(2,4)}
fn scores() -> Vec<(u64, u64, f64)> {
    vec![
        (1, 3, 0.9),
        (3, 5, 0.2),
        (1, 4, 0.5),
        (1, 5, 0.1),
        (2, 4, 0.3),
    ]
}

fn populated_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    for (u, v, w) in scores() {
        store.put(NTA, u, v, w, Aggregation::Overwrite).unwrap();
    }
    store
}

struct Fixture {
    _dir: TempDir,
    store: PathBuf,
    plan: EvaluationPlan,
}

fn fixture(evaluations: Vec<EvaluationKind>, output: bool) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_links(&root.join("data.txt"), &dataset()).unwrap();
    write_links(&root.join("train_01.txt"), &train()).unwrap();
    write_links(&root.join("test_01.txt"), &test_links()).unwrap();

    let store = root.join("store.json");
    with_store(&store, |s| {
        for (u, v, w) in scores() {
            s.put(NTA, u, v, w, Aggregation::Overwrite)?;
        }
        Ok(())
    })
    .unwrap();

    let plan = EvaluationPlan {
        evaluations,
        metrics: vec![MetricKind::Nta],
        dataset: root.join("data.txt"),
        trainset: root.join("train_01.txt"),
        testset: root.join("test_01.txt"),
        rank: 2,
        workers: 2,
        pace: 5.0,
        output: output.then(|| root.join("out")),
    };
    Fixture {
        _dir: dir,
        store,
        plan,
    }
}

#[test]
fn test_auc_fixture() {
    let store = populated_store();
    let sets = EvaluationSets::build(&dataset(), &train(), &test_links());
    let pool = eval::build_pool(3).unwrap();
    let result = eval::auc(&store, MetricKind::Nta, &sets, &pool, 5.0).unwrap();

    assert_eq!(result.n, 6);
    assert_eq!(result.n1, 4);
    assert_eq!(result.n2, 0);
    assert_eq!(result.skipped, 0);
    assert!((result.value - 0.6667).abs() < 0.001);
}

#[test]
fn test_auc_excludes_missing_scores_from_n() {
    let mut store = populated_store();
    store.remove(2, 4, NTA).unwrap();
    let sets = EvaluationSets::build(&dataset(), &train(), &test_links());
    let pool = eval::build_pool(2).unwrap();
    let result = eval::auc(&store, MetricKind::Nta, &sets, &pool, 5.0).unwrap();

    assert_eq!(result.n, 4);
    assert_eq!(result.skipped, 2);
    assert_eq!(result.n1, 3);
    assert!((0.0..=1.0).contains(&result.value));
}

#[test]
fn test_auc_is_independent_of_worker_count() {
    let store = populated_store();
    let sets = EvaluationSets::build(&dataset(), &train(), &test_links());
    let one = eval::auc(&store, MetricKind::Nta, &sets, &eval::build_pool(1).unwrap(), 5.0).unwrap();
    let many = eval::auc(&store, MetricKind::Nta, &sets, &eval::build_pool(4).unwrap(), 5.0).unwrap();
    assert_eq!(one, many);
}

#[test]
fn test_auc_without_missing_links_is_undefined() {
    let store = populated_store();
    let sets = EvaluationSets::build(&dataset(), &train(), &records(&[(8, 9)]));
    let pool = eval::build_pool(1).unwrap();
    let result = eval::auc(&store, MetricKind::Nta, &sets, &pool, 5.0).unwrap();
    assert_eq!(result.n, 0);
    assert!(result.value.is_nan());
    assert!(EvaluationResult::Auc(result).defined().is_err());
}

#[test]
fn test_precision_fixture() {
    let store = populated_store();
    let detectable = eval::detectable_links(&train(), &test_links());
    let result = eval::precision(&store, MetricKind::Nta, &detectable, 2).unwrap();
    assert_eq!(result.hits, 1);
    assert_eq!(result.detectable, 2);
    assert!((result.value - 0.5).abs() < 1e-12);
}

#[test]
fn test_run_writes_one_file_per_result() {
    let fx = fixture(EvaluationKind::ALL.to_vec(), true);
    let results = eval::run(&fx.plan, &fx.store).unwrap();
    assert_eq!(results.len(), 2);

    let out = fx.plan.output.clone().unwrap();
    let auc = fs::read_to_string(out.join("train_01_AUC_NTA.out")).unwrap();
    assert!(auc.starts_with("AUC(NTA) (missing_links:2 | n:6 | n1:4 | n2:0 |"));
    let precision = fs::read_to_string(out.join("train_01_PRECISION_NTA.out")).unwrap();
    assert_eq!(precision, "PRECISION(NTA) (detectable:2 | hits:1 | rank:2) : 0.5\n");
}

#[test]
fn test_run_leaves_store_untouched() {
    let fx = fixture(vec![EvaluationKind::Auc], false);
    let before = fs::read_to_string(&fx.store).unwrap();
    eval::run(&fx.plan, &fx.store).unwrap();
    assert_eq!(fs::read_to_string(&fx.store).unwrap(), before);
    assert!(!Path::new(&fx.store).with_extension("json.tmp").exists());
}

#[test]
fn test_run_fails_on_unreadable_store() {
    let fx = fixture(vec![EvaluationKind::Precision], false);
    fs::write(&fx.store, "not json").unwrap();
    assert!(eval::run(&fx.plan, &fx.store).is_err());
}
