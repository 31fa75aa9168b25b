//! Source discovery: find the log files to analyze.
//!
//! Command-line arguments are taken as paths; unexpanded glob patterns are
//! expanded against the filesystem.
//!
//! ## Example
//!
//! ```rust,ignore
//! use webstatslib::source::expand_inputs;
//!
//! let files = expand_inputs(&["logs/access_log.*"]);
//! ```

pub mod inputs;

pub use inputs::expand_inputs;
