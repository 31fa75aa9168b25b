//! High-level statistics API.
//!
//! This module provides the main entry points: spawn one worker per log file,
//! wait for all of them, and report the merged totals.

use std::path::Path;
use std::thread;

use crate::error::WebstatsError;
use crate::options::StatsOptions;
use crate::Result;

use super::stats::{Accumulator, Report, StatsAggregator};
use super::worker::{process_file, FileSummary};

/// Result of processing a set of log files.
#[derive(Debug)]
pub struct RunResult {
    /// Per-file outcomes, in input order.
    pub files: Vec<Result<FileSummary>>,
    /// Merged totals of every file that succeeded.
    pub totals: Accumulator,
    /// Display summary of `totals`.
    pub report: Report,
}

impl RunResult {
    /// True if every file was processed.
    pub fn is_success(&self) -> bool {
        self.files.iter().all(|f| f.is_ok())
    }

    /// Summaries of the files that succeeded.
    pub fn summaries(&self) -> impl Iterator<Item = &FileSummary> {
        self.files.iter().filter_map(|f| f.as_ref().ok())
    }

    /// Errors of the files that failed.
    pub fn errors(&self) -> impl Iterator<Item = &WebstatsError> {
        self.files.iter().filter_map(|f| f.as_ref().err())
    }
}

/// Process log files concurrently, one thread per file.
///
/// # Example
///
/// ```rust
/// use webstatslib::{process_files, StatsOptions};
/// use std::fs;
/// use tempfile::tempdir;
///
/// let dir = tempdir().unwrap();
/// let log = dir.path().join("access.log");
/// fs::write(
///     &log,
///     "x.boisestate.edu - - [01/Jan/2020:00:00:00 -0700] \"GET / HTTP/1.1\" 200 1024\n",
/// )
/// .unwrap();
///
/// let result = process_files(&[&log], &StatsOptions::new()).unwrap();
/// assert!(result.is_success());
/// assert_eq!(result.report.local_gets, 1);
/// assert_eq!(result.report.total_gets, 1);
/// ```
pub fn process_files<P>(paths: &[P], options: &StatsOptions) -> Result<RunResult>
where
    P: AsRef<Path> + Sync,
{
    process_files_with(paths, options, |_| {})
}

/// Like [`process_files`], calling `on_done` from each worker as it finishes.
///
/// `on_done` runs on the worker thread, so calls for different files may
/// arrive in any order. The final report is only built after every worker
/// has returned. A failing file does not stop its siblings.
///
/// Returns [`WebstatsError::NoInputs`] when `paths` is empty.
pub fn process_files_with<P, F>(
    paths: &[P],
    options: &StatsOptions,
    on_done: F,
) -> Result<RunResult>
where
    P: AsRef<Path> + Sync,
    F: Fn(&Result<FileSummary>) + Sync,
{
    if paths.is_empty() {
        return Err(WebstatsError::NoInputs);
    }

    tracing::debug!(files = paths.len(), "spawning file workers");

    let aggregator = StatsAggregator::new();
    let on_done = &on_done;

    let files: Vec<Result<FileSummary>> = thread::scope(|scope| {
        let handles: Vec<_> = paths
            .iter()
            .map(|path| {
                let aggregator = &aggregator;
                scope.spawn(move || {
                    let outcome = process_file(path, options, aggregator);
                    on_done(&outcome);
                    outcome
                })
            })
            .collect();

        handles
            .into_iter()
            .zip(paths)
            .map(|(handle, path)| {
                handle.join().unwrap_or_else(|_| {
                    Err(WebstatsError::WorkerPanicked(path.as_ref().to_path_buf()))
                })
            })
            .collect()
    });

    let totals = aggregator.snapshot();
    let report = Report::from(&totals);

    tracing::debug!(
        files = files.len(),
        failed = files.iter().filter(|f| f.is_err()).count(),
        "all file workers joined"
    );

    Ok(RunResult {
        files,
        totals,
        report,
    })
}
