// src/link/io.rs
//! Line-oriented dataset files.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, warn};

use super::record::LinkRecord;
use crate::error::{LinkError, Result};

/// Records read from one source, plus how many lines were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkBatch {
    pub records: Vec<LinkRecord>,
    pub skipped: usize,
}

/// Reads every well-formed record from `path`.
///
/// Malformed lines are logged and skipped; only I/O failures abort the read.
///
/// # Errors
/// Returns `Io` if the file cannot be opened or read.
pub fn read_links(path: &Path) -> Result<LinkBatch> {
    let file = File::open(path).map_err(|e| LinkError::io(e, path))?;
    let mut records = Vec::new();
    let (_, skipped) = visit_links(
        BufReader::new(file),
        &path.display().to_string(),
        |e| LinkError::io(e, path),
        |record| {
            records.push(*record);
            Ok(())
        },
    )?;
    let batch = LinkBatch { records, skipped };
    debug!(
        path = %path.display(),
        records = batch.records.len(),
        skipped = batch.skipped,
        "read dataset"
    );
    Ok(batch)
}

/// Reads records from any buffered source; `origin` only labels warnings.
///
/// # Errors
/// Returns `Io` if reading a line fails.
pub fn read_links_from<R: BufRead>(reader: R, origin: &str) -> Result<LinkBatch> {
    let mut records = Vec::new();
    let (_, skipped) = visit_links(reader, origin, LinkError::from, |record| {
        records.push(*record);
        Ok(())
    })?;
    Ok(LinkBatch { records, skipped })
}

/// Parses each line of `reader`, hands well-formed records to `sink` and
/// warns about the rest. Returns `(accepted, skipped)`.
fn visit_links<R, E, F>(reader: R, origin: &str, on_io: E, mut sink: F) -> Result<(usize, usize)>
where
    R: BufRead,
    E: Fn(std::io::Error) -> LinkError,
    F: FnMut(&LinkRecord) -> Result<()>,
{
    let mut accepted = 0;
    let mut skipped = 0;
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(&on_io)?;
        match LinkRecord::parse(&line) {
            Ok(record) => {
                sink(&record)?;
                accepted += 1;
            }
            Err(_) => {
                warn!(origin, line = idx + 1, content = %line, "malformed link, skipping");
                skipped += 1;
            }
        }
    }
    Ok((accepted, skipped))
}

/// Writes `records` to `path`, one per line, replacing any existing file.
///
/// # Errors
/// Returns `Io` if the parent directory or file cannot be written.
pub fn write_links(path: &Path, records: &[LinkRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| LinkError::io(e, parent))?;
    }

    let file = File::create(path).map_err(|e| LinkError::io(e, path))?;
    let mut writer = BufWriter::new(file);
    for record in records {
        writeln!(writer, "{record}").map_err(|e| LinkError::io(e, path))?;
    }
    writer.flush().map_err(|e| LinkError::io(e, path))?;

    debug!(path = %path.display(), records = records.len(), "wrote dataset");
    Ok(())
}

/// Counts lines in `path` without parsing them (progress totals).
///
/// # Errors
/// Returns `Io` if the file cannot be read.
pub fn count_lines(path: &Path) -> Result<usize> {
    let file = File::open(path).map_err(|e| LinkError::io(e, path))?;
    let mut count = 0;
    for line in BufReader::new(file).lines() {
        line.map_err(|e| LinkError::io(e, path))?;
        count += 1;
    }
    Ok(count)
}

/// Streams well-formed records from `path` into `sink`, skipping malformed lines.
///
/// Returns `(accepted, skipped)`.
///
/// # Errors
/// Returns `Io` on read failure, or whatever `sink` returns.
pub fn for_each_link<F>(path: &Path, sink: F) -> Result<(usize, usize)>
where
    F: FnMut(&LinkRecord) -> Result<()>,
{
    let file = File::open(path).map_err(|e| LinkError::io(e, path))?;
    let origin = path.display().to_string();
    visit_links(BufReader::new(file), &origin, |e| LinkError::io(e, path), sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn one_bad_line_among_valid_ones_is_skipped() {
        let input = "(1,2,1.0)\n(2,3,2.0)\nnot a link\n(3,4,3.5,TA)\n";
        let batch = read_links_from(Cursor::new(input), "memory").unwrap_or_default();
        assert_eq!(batch.records.len(), 3);
        assert_eq!(batch.skipped, 1);
    }

    #[test]
    fn empty_lines_count_as_malformed() {
        let batch = read_links_from(Cursor::new("\n(1,2,1.0)\n\n"), "memory").unwrap_or_default();
        assert_eq!(batch.records, vec![LinkRecord::real(1, 2, 1.0)]);
        assert_eq!(batch.skipped, 2);
    }

    #[test]
    fn streaming_and_batch_reads_agree() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let path = dir.path().join("links.txt");
        fs::write(&path, "(1,2,1.0)\nbad\n(2,3,0.5,CN)\n").unwrap_or_default();

        let mut streamed = Vec::new();
        let counts = for_each_link(&path, |record| {
            streamed.push(*record);
            Ok(())
        })
        .unwrap_or_default();
        let batch = read_links(&path).unwrap_or_default();

        assert_eq!(counts, (2, 1));
        assert_eq!(streamed, batch.records);
        assert_eq!(batch.skipped, 1);
    }

    #[test]
    fn sink_errors_stop_the_stream() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let path = dir.path().join("links.txt");
        fs::write(&path, "(1,2,1.0)\n(2,3,1.0)\n").unwrap_or_default();

        let mut seen = 0;
        let outcome = for_each_link(&path, |_| {
            seen += 1;
            Err(LinkError::StoreUnavailable("down".to_string()))
        });
        assert!(matches!(outcome, Err(LinkError::StoreUnavailable(_))));
        assert_eq!(seen, 1);
    }
}
