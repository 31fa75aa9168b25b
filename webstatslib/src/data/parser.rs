//! Access-log line parser.
//!
//! A line is split on spaces, square brackets and double quotes, with runs of
//! delimiters collapsed. For a Common Log Format line
//!
//! ```text
//! host - - [10/Oct/2000:13:55:36 -0700] "GET /a.gif HTTP/1.0" 200 2326
//! ```
//!
//! that yields `host`, `-`, `-`, `10/Oct/2000:13:55:36`, `-0700`, `GET`,
//! `/a.gif`, `HTTP/1.0`, `200`, `2326`. Only four positions matter:
//!
//! | index | field   |
//! |-------|---------|
//! | 0     | address |
//! | 3     | date    |
//! | 8     | status  |
//! | 9     | bytes   |
//!
//! Anything after index 9 is never looked at. Short lines are not errors:
//! missing fields simply skip their update.

use crate::options::{LocalMatcher, ParseMode, StatsOptions};

use super::stats::Accumulator;

/// Characters separating tokens in a log line.
pub const DELIMITERS: &[char] = &[' ', '[', ']', '"'];

pub const ADDRESS_FIELD: usize = 0;
pub const DATE_FIELD: usize = 3;
pub const STATUS_FIELD: usize = 8;
pub const BYTES_FIELD: usize = 9;

/// Status code counted as a failed get.
pub const NOT_FOUND: i64 = 404;

/// Split a line into non-empty tokens.
pub fn tokenize(line: &str) -> impl Iterator<Item = &str> {
    line.split(DELIMITERS).filter(|t| !t.is_empty())
}

/// The significant fields of one line, borrowed from it.
///
/// Fields the line is too short to contain are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogFields<'a> {
    pub address: Option<&'a str>,
    pub date: Option<&'a str>,
    pub status: Option<&'a str>,
    pub bytes: Option<&'a str>,
}

impl<'a> LogFields<'a> {
    /// Project a line onto its significant fields.
    pub fn project(line: &'a str) -> Self {
        let mut fields = Self::default();
        for (index, token) in tokenize(line).take(BYTES_FIELD + 1).enumerate() {
            match index {
                ADDRESS_FIELD => fields.address = Some(token),
                DATE_FIELD => fields.date = Some(token),
                STATUS_FIELD => fields.status = Some(token),
                BYTES_FIELD => fields.bytes = Some(token),
                _ => {}
            }
        }
        fields
    }
}

/// A numeric field that strict mode refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name ("status" or "bytes")
    pub field: &'static str,
    /// Offending token
    pub value: String,
}

/// Classifies lines and updates a per-task [`Accumulator`].
#[derive(Debug, Clone, Copy)]
pub struct LineParser<'a> {
    local: &'a LocalMatcher,
    mode: ParseMode,
}

impl<'a> LineParser<'a> {
    /// Create a parser using the given options.
    pub fn new(options: &'a StatsOptions) -> Self {
        Self {
            local: &options.local,
            mode: options.parse_mode,
        }
    }

    /// Count one line into `acc`.
    ///
    /// `total_gets` always goes up by one. Returns the raw date token when the
    /// line has one; callers keep their previous date otherwise.
    ///
    /// Only strict mode can fail, and only on a non-numeric status or byte
    /// field. `acc` may be partially updated when that happens.
    pub fn parse_line<'l>(
        &self,
        line: &'l str,
        acc: &mut Accumulator,
    ) -> Result<Option<&'l str>, FieldError> {
        acc.total_gets += 1.0;

        let fields = LogFields::project(line);

        let not_found = match fields.status {
            Some(status) => self.number("status", status)? == NOT_FOUND,
            None => false,
        };
        if not_found {
            acc.failed_gets += 1.0;
        }

        if let Some(bytes) = fields.bytes {
            let bytes = self.number("bytes", bytes)? as f64;
            acc.total_bytes += bytes;

            if fields.address.is_some_and(|a| self.local.is_local(a)) {
                acc.local_gets += 1.0;
                acc.local_bytes += bytes;
                if not_found {
                    acc.local_failed_gets += 1.0;
                }
            }
        }

        Ok(fields.date)
    }

    /// Parse a numeric token according to the parse mode.
    fn number(&self, field: &'static str, token: &str) -> Result<i64, FieldError> {
        match (token.parse::<i64>(), self.mode) {
            (Ok(n), _) => Ok(n),
            (Err(_), ParseMode::Lenient) => Ok(0),
            (Err(_), ParseMode::Strict) if field == "bytes" && token == "-" => Ok(0),
            (Err(_), ParseMode::Strict) => Err(FieldError {
                field,
                value: token.to_string(),
            }),
        }
    }
}
