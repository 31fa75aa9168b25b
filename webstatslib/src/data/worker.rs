//! Per-file processing.
//!
//! A worker reads one log file line by line into a private [`Accumulator`],
//! remembers the date of the first and last line, and hands the accumulator
//! to the shared [`StatsAggregator`] once the file is done.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::WebstatsError;
use crate::options::StatsOptions;
use crate::Result;

use super::parser::LineParser;
use super::stats::{Accumulator, StatsAggregator};

/// Outcome of processing one log file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSummary {
    /// Path to the file.
    pub path: PathBuf,
    /// Number of lines read.
    pub lines: usize,
    /// Date token of the first line.
    pub start_date: Option<String>,
    /// Date slot after the last line.
    ///
    /// A last line without a date leaves the previous line's date in place.
    pub end_date: Option<String>,
    /// Counters for this file alone.
    pub stats: Accumulator,
}

impl FileSummary {
    /// True if the file had no lines.
    pub fn is_empty(&self) -> bool {
        self.lines == 0
    }
}

/// Read every line from `reader` and count it.
///
/// `path` is only used to label the summary and errors. Lines are split on
/// `\n`, a trailing `\r` is dropped, and bytes that are not valid UTF-8 are
/// replaced rather than failing the file.
pub fn gather_stats<R: BufRead>(
    mut reader: R,
    path: impl AsRef<Path>,
    options: &StatsOptions,
) -> Result<FileSummary> {
    let path = path.as_ref();
    let parser = LineParser::new(options);

    let mut stats = Accumulator::new();
    let mut date: Option<String> = None;
    let mut start_date = None;
    let mut lines = 0;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| WebstatsError::FileRead {
                path: path.to_path_buf(),
                source: e,
            })?;
        if read == 0 {
            break;
        }
        lines += 1;

        let raw = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let line = String::from_utf8_lossy(raw);

        let found = parser
            .parse_line(&line, &mut stats)
            .map_err(|e| WebstatsError::Parse {
                path: path.to_path_buf(),
                line: lines,
                field: e.field,
                value: e.value,
            })?;
        if let Some(found) = found {
            let slot = date.get_or_insert_with(String::new);
            slot.clear();
            slot.push_str(found);
        }

        if lines == 1 {
            start_date = date.clone();
        }
    }

    Ok(FileSummary {
        path: path.to_path_buf(),
        lines,
        start_date,
        end_date: date,
        stats,
    })
}

/// Open `path` and count its lines without merging anywhere.
pub fn gather_stats_for_path(
    path: impl AsRef<Path>,
    options: &StatsOptions,
) -> Result<FileSummary> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| WebstatsError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    gather_stats(BufReader::new(file), path, options)
}

/// Process one log file end to end and merge its counters into `aggregator`.
///
/// The merge happens exactly once, after the last line, and only when the
/// file had at least one line. On error nothing is merged.
pub fn process_file(
    path: impl AsRef<Path>,
    options: &StatsOptions,
    aggregator: &StatsAggregator,
) -> Result<FileSummary> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "processing log file");

    let summary = gather_stats_for_path(path, options)?;

    if !summary.is_empty() {
        aggregator.merge(summary.stats.clone());
    }

    tracing::debug!(
        path = %path.display(),
        lines = summary.lines,
        gets = summary.stats.total_gets,
        "finished log file"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    const LINES: &str = concat!(
        "x.boisestate.edu - - [01/Jan/2020:00:00:00 -0700] \"GET / HTTP/1.1\" 200 100\n",
        "10.0.0.1 - - [01/Jan/2020:00:00:05 -0700] \"GET /x HTTP/1.1\" 404 50\n",
        "132.178.9.9 - - [01/Jan/2020:00:01:00 -0700] \"GET /y HTTP/1.1\" 404 25\n",
    );

    fn gather(content: &[u8], options: &StatsOptions) -> Result<FileSummary> {
        gather_stats(Cursor::new(content.to_vec()), "test.log", options)
    }

    #[test]
    fn test_gather_stats() {
        let summary = gather(LINES.as_bytes(), &StatsOptions::new()).unwrap();

        assert_eq!(summary.lines, 3);
        assert_eq!(summary.start_date.as_deref(), Some("01/Jan/2020:00:00:00"));
        assert_eq!(summary.end_date.as_deref(), Some("01/Jan/2020:00:01:00"));
        assert_eq!(summary.stats.total_gets, 3.0);
        assert_eq!(summary.stats.total_bytes, 175.0);
        assert_eq!(summary.stats.failed_gets, 2.0);
        assert_eq!(summary.stats.local_gets, 2.0);
        assert_eq!(summary.stats.local_bytes, 125.0);
        assert_eq!(summary.stats.local_failed_gets, 1.0);
    }

    #[test]
    fn test_single_line_same_dates() {
        let line = "h - - [05/May/2020:01:02:03 +0000] \"GET / HTTP/1.0\" 200 1";
        let summary = gather(line.as_bytes(), &StatsOptions::new()).unwrap();
        assert_eq!(summary.lines, 1);
        assert_eq!(summary.start_date, summary.end_date);
        assert_eq!(summary.start_date.as_deref(), Some("05/May/2020:01:02:03"));
    }

    #[test]
    fn test_empty_input() {
        let summary = gather(b"", &StatsOptions::new()).unwrap();
        assert!(summary.is_empty());
        assert_eq!(summary.start_date, None);
        assert_eq!(summary.end_date, None);
        assert!(summary.stats.is_empty());
    }

    #[test]
    fn test_short_last_line_keeps_previous_date() {
        let content = format!("{LINES}trailing junk\n");
        let summary = gather(content.as_bytes(), &StatsOptions::new()).unwrap();
        assert_eq!(summary.lines, 4);
        assert_eq!(summary.stats.total_gets, 4.0);
        assert_eq!(summary.end_date.as_deref(), Some("01/Jan/2020:00:01:00"));
    }

    #[test]
    fn test_first_line_without_date() {
        let content = format!("junk\n{LINES}");
        let summary = gather(content.as_bytes(), &StatsOptions::new()).unwrap();
        assert_eq!(summary.start_date, None);
        assert_eq!(summary.end_date.as_deref(), Some("01/Jan/2020:00:01:00"));
    }

    #[test]
    fn test_crlf_and_invalid_utf8() {
        let mut content = b"h - - [d1 tz] \"GET /\xff HTTP/1.0\" 200 7\r\n".to_vec();
        content.extend_from_slice(b"h - - [d2 tz] \"GET / HTTP/1.0\" 200 8\r\n");
        let summary = gather(&content, &StatsOptions::new().strict()).unwrap();
        assert_eq!(summary.lines, 2);
        assert_eq!(summary.stats.total_bytes, 15.0);
        assert_eq!(summary.end_date.as_deref(), Some("d2"));
    }

    #[test]
    fn test_strict_error_reports_line() {
        let content = format!("{LINES}h - - [d tz] \"GET / HTTP/1.0\" 200 lots\n");
        let err = gather(content.as_bytes(), &StatsOptions::new().strict()).unwrap_err();
        match err {
            WebstatsError::Parse {
                path,
                line,
                field,
                value,
            } => {
                assert_eq!(path, PathBuf::from("test.log"));
                assert_eq!(line, 4);
                assert_eq!(field, "bytes");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_process_file_merges_once() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("access.log");
        fs::write(&path, LINES).unwrap();

        let agg = StatsAggregator::new();
        let summary = process_file(&path, &StatsOptions::new(), &agg).unwrap();

        assert_eq!(summary.path, path);
        assert_eq!(agg.snapshot(), summary.stats);
    }

    #[test]
    fn test_process_empty_file_does_not_merge() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("empty.log");
        fs::write(&path, "").unwrap();

        let agg = StatsAggregator::new();
        let summary = process_file(&path, &StatsOptions::new(), &agg).unwrap();

        assert!(summary.is_empty());
        assert!(agg.snapshot().is_empty());
    }

    #[test]
    fn test_process_missing_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("missing.log");

        let agg = StatsAggregator::new();
        let err = process_file(&path, &StatsOptions::new(), &agg).unwrap_err();

        assert!(matches!(err, WebstatsError::FileRead { .. }));
        assert_eq!(err.path(), Some(path.as_path()));
        assert!(agg.snapshot().is_empty());
    }
}
