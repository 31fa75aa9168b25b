//! # webstatslib
//!
//! Traffic statistics for web-server access logs.
//!
//! ## Overview
//!
//! Each log line is one *get*. For every file the library counts gets,
//! failed gets (status 404) and bytes transferred, both in total and for
//! *local* traffic, whose requester address matches an institutional pattern
//! (by default anything containing `boisestate.edu` or `132.178`).
//!
//! Files are processed concurrently, one worker thread per file. Each worker
//! counts into a private accumulator and merges it into the shared totals
//! exactly once, when the file is done.
//!
//! ## Pipeline
//!
//! - **source**: expand input arguments into file paths
//! - **data**: parse lines, accumulate per file, merge into the aggregate
//! - **output**: format the final report as a table
//!
//! ## Example
//!
//! ```rust
//! use webstatslib::{process_files, ReportTable, StatsOptions};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! let log = dir.path().join("access_log");
//! fs::write(&log, concat!(
//!     "x.boisestate.edu - - [02/Feb/2021:00:00:00 -0700] \"GET /a HTTP/1.1\" 200 1024\n",
//!     "10.0.0.1 - - [02/Feb/2021:00:00:09 -0700] \"GET /b HTTP/1.1\" 404 512\n",
//! )).unwrap();
//!
//! let result = process_files(&[&log], &StatsOptions::new()).unwrap();
//! assert_eq!(result.report.total_gets, 2);
//! assert_eq!(result.report.failed_gets, 1);
//! assert_eq!(result.report.local_gets, 1);
//!
//! let table = ReportTable::from_report(&result.report);
//! assert!(table.to_string().contains("MB transferred"));
//! ```

pub mod data;
pub mod error;
pub mod options;
pub mod output;
pub mod source;

pub use data::{
    gather_stats, gather_stats_for_path, process_file, process_files, process_files_with,
    Accumulator, FileSummary, LineParser, LogFields, Report, RunResult, StatsAggregator,
};
pub use error::WebstatsError;
pub use options::{LocalMatcher, ParseMode, StatsOptions, DEFAULT_LOCAL_PATTERNS};
pub use output::{ReportTable, TableRow};
pub use source::expand_inputs;

/// Result type for webstatslib operations
pub type Result<T> = std::result::Result<T, WebstatsError>;
