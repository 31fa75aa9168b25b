//! Output formatting: present the report as a table.
//!
//! `ReportTable` is a pure presentation layer - it only formats a `Report`
//! into strings. All counting happens in the data stage.
//!
//! ## Example
//!
//! ```rust,ignore
//! use webstatslib::output::ReportTable;
//!
//! let table = ReportTable::from_report(&result.report);
//! print!("{table}");
//! ```

pub mod table;

pub use table::{ReportTable, TableRow};
