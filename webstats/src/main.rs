//! # webstats
//!
//! A CLI tool summarizing web-server access logs.
//!
//! ## Overview
//!
//! webstats is built on top of webstatslib. It processes every log file given
//! on the command line concurrently, one worker per file, and prints:
//!
//! - for each file, as its worker finishes, the date of its first and last line
//! - once all workers are done, a table of local and total gets, failed gets
//!   (404) and megabytes transferred
//!
//! ## Usage
//!
//! ```bash
//! # Summarize two logs
//! webstats access_log access_log.1
//!
//! # Treat a different network as local
//! webstats --local example.org --local 10.1. access_log
//!
//! # Fail files with non-numeric status or byte fields
//! webstats --strict access_log
//!
//! # Machine-readable output
//! webstats --output json access_log
//! ```
//!
//! A file that cannot be read is reported on stderr; the remaining files are
//! still summarized and the exit code is 1.

mod logging;
mod render;

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};
use webstatslib::{
    expand_inputs, process_files_with, LocalMatcher, ParseMode, RunResult, StatsOptions,
};

use render::OutputMode;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("webstats")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Local and total traffic statistics for web-server access logs")
        .arg(
            Arg::new("files")
                .value_name("ACCESS_LOG")
                .required(true)
                .num_args(1..)
                .action(ArgAction::Append)
                .help("Access log files to process (one worker each)"),
        )
        .arg(
            Arg::new("local")
                .short('l')
                .long("local")
                .value_name("PATTERN")
                .action(ArgAction::Append)
                .help("Address substring marking local traffic (replaces the default boisestate.edu, 132.178)"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .action(ArgAction::SetTrue)
                .help("Fail a file whose status or bytes field is not a number"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["table", "json"])
                .default_value("table")
                .help("Output format"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Log progress to stderr (-v debug, -vv trace)"),
        )
}

/// Build stats options from matches
fn build_options(matches: &ArgMatches) -> StatsOptions {
    let mut options = StatsOptions::new();

    if let Some(patterns) = matches.get_many::<String>("local") {
        options = options.local(LocalMatcher::with_patterns(patterns.cloned()));
    }

    if matches.get_flag("strict") {
        options = options.parse_mode(ParseMode::Strict);
    }

    options
}

/// Process all files and print the results. Returns whether every file succeeded.
fn run(matches: &ArgMatches) -> anyhow::Result<bool> {
    let args: Vec<&String> = matches
        .get_many::<String>("files")
        .map(|v| v.collect())
        .unwrap_or_default();
    let paths = expand_inputs(&args);
    let options = build_options(matches);
    let output_mode = matches
        .get_one::<String>("output")
        .map(|s| OutputMode::from_arg(s))
        .unwrap_or(OutputMode::Table);

    tracing::debug!(
        files = paths.len(),
        local = ?options.local.patterns(),
        mode = ?options.parse_mode,
        "starting run"
    );

    let result: RunResult = process_files_with(&paths, &options, |outcome| match outcome {
        Ok(summary) => {
            if output_mode == OutputMode::Table {
                print!("{}", render::date_lines(summary));
            }
        }
        Err(e) => eprintln!("{}", render::error_line(e)),
    })?;

    match output_mode {
        OutputMode::Table => print!("{}", render::render_table(&result.report)),
        OutputMode::Json => println!("{}", render::render_json(&result)?),
    }

    Ok(result.is_success())
}

fn main() -> ExitCode {
    let matches = match build_command().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    logging::init_logging(matches.get_count("verbose"));

    match run(&matches) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{}", render::error_line(&e));
            ExitCode::FAILURE
        }
    }
}
