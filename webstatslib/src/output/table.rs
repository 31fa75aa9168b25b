//! Table-ready data for the traffic report.
//!
//! `ReportTable` holds pre-formatted strings and renders the fixed-width
//! layout of the classic webstats output:
//!
//! ```text
//!       TYPE            gets       failed gets   MB transferred
//!      local                1                0                0
//!      total                2                1                2
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::stats::Report;

/// Column headers, label column first.
pub const HEADERS: [&str; 4] = ["TYPE", "gets", "failed gets", "MB transferred"];

const LABEL_WIDTH: usize = 10;
const CELL_WIDTH: usize = 15;

/// A single row of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Row label ("local" or "total")
    pub label: String,
    /// gets, failed gets, MB transferred
    pub values: Vec<String>,
}

impl TableRow {
    fn new(label: &str, gets: u64, failed: u64, mib: f64) -> Self {
        Self {
            label: label.to_string(),
            values: vec![gets.to_string(), failed.to_string(), format!("{mib:.0}")],
        }
    }
}

/// Presentation-ready report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTable {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl ReportTable {
    /// Format a report. Megabyte columns are rounded to whole numbers.
    pub fn from_report(report: &Report) -> Self {
        Self {
            headers: HEADERS.iter().map(|h| h.to_string()).collect(),
            rows: vec![
                TableRow::new(
                    "local",
                    report.local_gets,
                    report.local_failed_gets,
                    report.local_mib,
                ),
                TableRow::new(
                    "total",
                    report.total_gets,
                    report.failed_gets,
                    report.total_mib,
                ),
            ],
        }
    }
}

impl From<&Report> for ReportTable {
    fn from(report: &Report) -> Self {
        Self::from_report(report)
    }
}

impl fmt::Display for ReportTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Header and rows use different gaps; both are part of the format.
        let h = |i: usize| self.headers.get(i).map(String::as_str).unwrap_or("");
        writeln!(
            f,
            "{:>lw$} {:>cw$}   {:>cw$}  {:>cw$}",
            h(0),
            h(1),
            h(2),
            h(3),
            lw = LABEL_WIDTH,
            cw = CELL_WIDTH,
        )?;

        for row in &self.rows {
            write!(f, "{:>lw$}", row.label, lw = LABEL_WIDTH)?;
            for value in &row.values {
                write!(f, "  {:>cw$}", value, cw = CELL_WIDTH)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::stats::{Accumulator, BYTES_PER_MIB};

    fn sample_report() -> Report {
        Report::from(&Accumulator {
            local_bytes: 1024.0,
            total_bytes: 3.0 * BYTES_PER_MIB + 1536.0,
            local_gets: 1.0,
            total_gets: 12.0,
            failed_gets: 3.0,
            local_failed_gets: 0.0,
        })
    }

    #[test]
    fn test_from_report() {
        let table = ReportTable::from_report(&sample_report());
        assert_eq!(table.headers, ["TYPE", "gets", "failed gets", "MB transferred"]);
        assert_eq!(table.rows[0].label, "local");
        assert_eq!(table.rows[0].values, ["1", "0", "0"]);
        assert_eq!(table.rows[1].label, "total");
        assert_eq!(table.rows[1].values, ["12", "3", "3"]);
    }

    #[test]
    fn test_mib_rounding() {
        let report = Report {
            total_mib: 2.6,
            local_mib: 0.4,
            ..Report::default()
        };
        let table = ReportTable::from(&report);
        assert_eq!(table.rows[0].values[2], "0");
        assert_eq!(table.rows[1].values[2], "3");
    }

    #[test]
    fn test_render_layout() {
        let rendered = ReportTable::from_report(&sample_report()).to_string();
        let expected = concat!(
            "      TYPE            gets       failed gets   MB transferred\n",
            "     local                1                0                0\n",
            "     total               12                3                3\n",
        );
        assert_eq!(rendered, expected);
    }
}
