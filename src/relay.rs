// src/relay.rs
//! Topic relay for link records.
//!
//! Records pass through untouched; a topic is an append-only log file.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{LinkError, Result};
use crate::link::{self, LinkRecord};
use crate::progress::Progress;

static TOPIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]+$").unwrap_or_else(|_| panic!("Invalid Regex"))
});

/// Record used by [`check_relay`].
pub const PROBE: LinkRecord = LinkRecord::real(1, 2, 1.0);

pub trait Relay {
    /// # Errors
    /// Returns `InvalidParameter` for a bad topic, or `Io` on write failure.
    fn publish(&self, topic: &str, record: &LinkRecord) -> Result<()>;

    /// Most recently published record on `topic`, if any.
    ///
    /// # Errors
    /// Returns `InvalidParameter` for a bad topic, or `Io` on read failure.
    fn receive(&self, topic: &str) -> Result<Option<LinkRecord>>;
}

/// Relay backed by one `<topic>.log` file per topic under `dir`.
#[derive(Debug, Clone)]
pub struct FileRelay {
    dir: PathBuf,
}

impl FileRelay {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Log file for `topic`.
    ///
    /// # Errors
    /// Returns `InvalidParameter` unless `topic` matches `[A-Za-z0-9._-]+`.
    pub fn topic_path(&self, topic: &str) -> Result<PathBuf> {
        if !TOPIC_RE.is_match(topic) || topic == "." || topic == ".." {
            return Err(LinkError::InvalidParameter(format!(
                "invalid topic name {topic:?}"
            )));
        }
        Ok(self.dir.join(format!("{topic}.log")))
    }
}

impl Relay for FileRelay {
    fn publish(&self, topic: &str, record: &LinkRecord) -> Result<()> {
        let path = self.topic_path(topic)?;
        fs::create_dir_all(&self.dir).map_err(|e| LinkError::io(e, &self.dir))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LinkError::io(e, &path))?;
        writeln!(file, "{record}").map_err(|e| LinkError::io(e, &path))?;
        Ok(())
    }

    fn receive(&self, topic: &str) -> Result<Option<LinkRecord>> {
        let path = self.topic_path(topic)?;
        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LinkError::io(e, &path)),
        };
        let mut last = None;
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| LinkError::io(e, &path))?;
            if let Ok(record) = LinkRecord::parse(&line) {
                last = Some(record);
            }
        }
        Ok(last)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PublishOutcome {
    pub published: usize,
    pub skipped: usize,
}

/// Publishes every well-formed record of `dataset` to `topic`.
///
/// # Errors
/// Returns `Io` if the dataset cannot be read, or a relay error.
pub fn publish_dataset<R: Relay + ?Sized>(
    relay: &R,
    topic: &str,
    dataset: &Path,
    pace: f64,
) -> Result<PublishOutcome> {
    let total = link::count_lines(dataset)?;
    let progress = Progress::new("publish", total, pace);
    let (published, skipped) = link::for_each_link(dataset, |record| {
        progress.step();
        relay.publish(topic, record)
    })?;
    progress.finish();
    info!(topic, published, skipped, "dataset published");
    Ok(PublishOutcome { published, skipped })
}

/// Publishes [`PROBE`] and confirms it comes back unchanged.
///
/// # Errors
/// Returns a relay error if publishing or receiving fails.
pub fn check_relay<R: Relay + ?Sized>(relay: &R, topic: &str) -> Result<bool> {
    relay.publish(topic, &PROBE)?;
    let received = relay.receive(topic)?;
    debug!(topic, received = ?received, "relay probe");
    Ok(received == Some(PROBE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::{write_links, LinkKind, MetricKind};
    use tempfile::TempDir;

    #[test]
    fn probe_round_trips() -> Result<()> {
        let dir = TempDir::new()?;
        let relay = FileRelay::new(dir.path().join("relay"));
        assert!(check_relay(&relay, "links")?);
        Ok(())
    }

    #[test]
    fn receive_returns_latest_record() -> Result<()> {
        let dir = TempDir::new()?;
        let relay = FileRelay::new(dir.path());
        assert_eq!(relay.receive("links")?, None);

        let mined = LinkRecord::new(3, 4, 0.5, LinkKind::Mined(MetricKind::Cn));
        relay.publish("links", &LinkRecord::real(1, 2, 1.0))?;
        relay.publish("links", &mined)?;
        assert_eq!(relay.receive("links")?, Some(mined));
        Ok(())
    }

    #[test]
    fn publish_dataset_counts_skipped_lines() -> Result<()> {
        let dir = TempDir::new()?;
        let data = dir.path().join("data.txt");
        write_links(&data, &[LinkRecord::real(1, 2, 1.0), LinkRecord::real(2, 3, 1.0)])?;
        let mut content = fs::read_to_string(&data)?;
        content.push_str("not a record\n");
        fs::write(&data, content)?;

        let relay = FileRelay::new(dir.path().join("relay"));
        let outcome = publish_dataset(&relay, "links", &data, 0.0)?;
        assert_eq!(outcome, PublishOutcome { published: 2, skipped: 1 });

        let log = fs::read_to_string(relay.topic_path("links")?)?;
        assert_eq!(log, "(1,2,1.0)\n(2,3,1.0)\n");
        Ok(())
    }

    #[test]
    fn path_like_topics_are_rejected() {
        let relay = FileRelay::new("relay");
        for topic in ["", "../escape", "a/b", "..", "sp ace"] {
            assert!(matches!(
                relay.topic_path(topic),
                Err(LinkError::InvalidParameter(_))
            ));
        }
        assert!(relay.topic_path("links-v2.raw").is_ok());
    }
}
