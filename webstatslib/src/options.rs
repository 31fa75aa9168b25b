//! Input options for gathering statistics.
//!
//! This module contains the configuration types that control how lines are
//! classified and how strictly numeric fields are parsed.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Address substrings that mark a request as local by default.
pub const DEFAULT_LOCAL_PATTERNS: &[&str] = &["boisestate.edu", "132.178"];

/// Decides whether a requester address counts as local traffic.
///
/// An address is local when it contains any of the configured substrings.
/// The default set is [`DEFAULT_LOCAL_PATTERNS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalMatcher {
    patterns: Vec<String>,
}

impl Default for LocalMatcher {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_LOCAL_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl LocalMatcher {
    /// Matcher with the default institutional patterns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Matcher with an explicit pattern set, replacing the defaults.
    ///
    /// An empty set matches nothing.
    pub fn with_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Configured substrings.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Check whether `address` contains any configured substring.
    pub fn is_local(&self, address: &str) -> bool {
        self.patterns.iter().any(|p| address.contains(p.as_str()))
    }
}

/// How numeric fields (status code, bytes) are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParseMode {
    /// Non-numeric text counts as 0. Matches the historical tool output.
    #[default]
    Lenient,
    /// Non-numeric status or byte fields fail the file.
    ///
    /// The Common Log Format placeholder `-` is still accepted as 0 bytes.
    Strict,
}

impl FromStr for ParseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            _ => Err(format!("unknown parse mode: {s} (expected lenient or strict)")),
        }
    }
}

/// Options for gathering statistics.
#[derive(Debug, Clone, Default)]
pub struct StatsOptions {
    /// Local traffic predicate
    pub local: LocalMatcher,
    /// Numeric parsing policy
    pub parse_mode: ParseMode,
}

impl StatsOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the local traffic predicate.
    pub fn local(mut self, matcher: LocalMatcher) -> Self {
        self.local = matcher;
        self
    }

    /// Set the numeric parsing policy.
    pub fn parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = mode;
        self
    }

    /// Shorthand for `parse_mode(ParseMode::Strict)`.
    pub fn strict(self) -> Self {
        self.parse_mode(ParseMode::Strict)
    }
}
