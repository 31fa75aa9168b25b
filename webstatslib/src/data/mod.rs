//! Data collection: parse log files and gather statistics.
//!
//! This module handles the core of the pipeline. It provides:
//!
//! - **Parsing**: token projection of a log line (`LineParser`, `LogFields`)
//! - **Statistics**: per-file `Accumulator` and the shared `StatsAggregator`
//! - **Workers**: one file end to end (`process_file`, `gather_stats`)
//! - **Counting**: the concurrent entry point (`process_files`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use webstatslib::data::{process_files, StatsOptions};
//!
//! let result = process_files(&["access_log"], &StatsOptions::new())?;
//! println!("Total gets: {}", result.report.total_gets);
//! ```

pub mod counter;
pub mod parser;
pub mod stats;
pub mod worker;

pub use counter::{process_files, process_files_with, RunResult};
pub use parser::{tokenize, FieldError, LineParser, LogFields};
pub use stats::{Accumulator, Report, StatsAggregator, BYTES_PER_MIB};
pub use worker::{gather_stats, gather_stats_for_path, process_file, FileSummary};
