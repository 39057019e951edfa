// tests/integration_store.rs
//! File-backed score store sessions and maintenance operations.

use linkeval_core::error::LinkError;
use linkeval_core::link::{write_links, LinkKind, LinkRecord, MetricKind};
use linkeval_core::relay::{self, FileRelay, Relay};
use linkeval_core::store::{self, with_store, Aggregation, ScoreStore};
use std::fs;
use std::time::Duration;

#[test]
fn test_running_average_persists_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let data = dir.path().join("data.txt");
    write_links(
        &data,
        &[
            LinkRecord::real(1, 2, 2.0),
            LinkRecord::real(2, 1, 4.0),
            LinkRecord::real(2, 3, 1.0),
        ],
    )
    .unwrap();

    store::save_dataset(&path, &data, Aggregation::RunningAverage, 5.0).unwrap();
    let entry = with_store(&path, |s| Ok(s.contents().real_entry(1, 2))).unwrap();
    assert_eq!(entry, Some((3.0, 2)));

    store::save_dataset(&path, &data, Aggregation::Overwrite, 5.0).unwrap();
    let entry = with_store(&path, |s| Ok(s.contents().real_entry(2, 1))).unwrap();
    assert_eq!(entry, Some((4.0, 4)));
}

#[test]
fn test_mined_records_are_saved_per_metric() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let data = dir.path().join("mined.txt");
    fs::write(&data, "(1,2,0.5,NTA)\n(1,2,3.0,CN)\n(1,2,0.5,BOGUS)\n").unwrap();

    let outcome = store::save_dataset(&path, &data, Aggregation::Overwrite, 5.0).unwrap();
    assert_eq!(outcome.saved, 2);
    assert_eq!(outcome.skipped, 1);

    let (nta, cn) = with_store(&path, |s| {
        Ok((s.score(MetricKind::Nta, 2, 1)?, s.score(MetricKind::Cn, 1, 2)?))
    })
    .unwrap();
    assert_eq!(nta, Some(0.5));
    assert_eq!(cn, Some(3.0));
}

#[test]
fn test_check_dataset_sees_writes_between_polls() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let data = dir.path().join("data.txt");
    write_links(&data, &[LinkRecord::real(1, 2, 1.0)]).unwrap();

    let before = store::check_dataset(&path, &data, None, 0).unwrap();
    assert_eq!(before.missing, 1);

    store::save_dataset(&path, &data, Aggregation::Overwrite, 5.0).unwrap();
    let after = store::check_dataset(&path, &data, Some(Duration::ZERO), 0).unwrap();
    assert!(after.is_complete());
    assert_eq!(after.saved, 1);
}

#[test]
fn test_closure_error_wins_over_close() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let outcome: Result<(), LinkError> = with_store(&path, |s| {
        s.put(LinkKind::Real, 1, 2, 1.0, Aggregation::Overwrite)?;
        s.put(LinkKind::Real, 3, 3, 1.0, Aggregation::Overwrite)
    });
    assert!(matches!(outcome, Err(LinkError::InvalidParameter(_))));

    let count = with_store(&path, |s| s.count_edges()).unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_clear_then_stability() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let data = dir.path().join("data.txt");
    write_links(&data, &[LinkRecord::real(1, 2, 1.0), LinkRecord::real(1, 3, 1.0)]).unwrap();
    store::save_dataset(&path, &data, Aggregation::Overwrite, 5.0).unwrap();

    assert_eq!(store::clear_store(&path).unwrap(), 2);
    let outcome = store::wait_stability(&path, Duration::ZERO, 1, 5).unwrap();
    assert!(outcome.stable);
    assert_eq!(outcome.count, Some(0));
}

#[test]
fn test_relay_passes_records_through() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.txt");
    let mined = LinkRecord::new(4, 5, 0.25, LinkKind::Mined(MetricKind::Jaccard));
    write_links(&data, &[LinkRecord::real(1, 2, 1.0), mined]).unwrap();

    let relay = FileRelay::new(dir.path().join("relay"));
    let outcome = relay::publish_dataset(&relay, "links", &data, 5.0).unwrap();
    assert_eq!(outcome.published, 2);
    assert_eq!(relay.receive("links").unwrap(), Some(mined));
}
