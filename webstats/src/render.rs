//! Rendering of per-file date lines, the report table and JSON output.

use std::path::PathBuf;

use console::style;
use serde::Serialize;
use webstatslib::{Accumulator, FileSummary, Report, ReportTable, RunResult, WebstatsError};

/// Output format selected with `--output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table,
    Json,
}

impl OutputMode {
    pub fn from_arg(value: &str) -> Self {
        match value {
            "json" => Self::Json,
            _ => Self::Table,
        }
    }
}

/// "Starting date" / "Ending date" lines for one file.
///
/// Empty files produce nothing. A line without a date prints an empty value.
pub fn date_lines(summary: &FileSummary) -> String {
    if summary.is_empty() {
        return String::new();
    }
    format!(
        "Starting date: {}\nEnding date: {}\n",
        summary.start_date.as_deref().unwrap_or(""),
        summary.end_date.as_deref().unwrap_or(""),
    )
}

/// `Error: ...` line for stderr.
pub fn error_line(err: &dyn std::fmt::Display) -> String {
    format!("{} {err}", style("Error:").red().bold().for_stderr())
}

/// The fixed-width report table.
pub fn render_table(report: &Report) -> String {
    ReportTable::from_report(report).to_string()
}

/// One file in the JSON document.
#[derive(Debug, Serialize)]
struct JsonFile<'a> {
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    lines: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_date: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_date: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<&'a Accumulator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> JsonFile<'a> {
    fn from_outcome(outcome: &'a Result<FileSummary, WebstatsError>) -> Self {
        match outcome {
            Ok(summary) => Self {
                path: summary.path.clone(),
                lines: Some(summary.lines),
                start_date: summary.start_date.as_deref(),
                end_date: summary.end_date.as_deref(),
                stats: Some(&summary.stats),
                error: None,
            },
            Err(err) => Self {
                path: err.path().map(PathBuf::from).unwrap_or_default(),
                lines: None,
                start_date: None,
                end_date: None,
                stats: None,
                error: Some(err.to_string()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonDocument<'a> {
    files: Vec<JsonFile<'a>>,
    report: &'a Report,
    table: ReportTable,
}

/// Pretty JSON with per-file outcomes and the final report.
pub fn render_json(result: &RunResult) -> serde_json::Result<String> {
    let doc = JsonDocument {
        files: result.files.iter().map(JsonFile::from_outcome).collect(),
        report: &result.report,
        table: ReportTable::from_report(&result.report),
    };
    serde_json::to_string_pretty(&doc)
}
