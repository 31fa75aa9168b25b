//! Input path expansion with glob pattern support.
//!
//! Shells normally expand `access_log.*` before the program sees it. When a
//! pattern arrives unexpanded (quoted, or on platforms whose shell does not
//! glob), it is expanded here. Paths that exist are always taken literally,
//! so a file name containing `[` is never mistaken for a pattern.

use std::path::{Path, PathBuf};

use glob::{glob_with, MatchOptions};

/// Characters that make an argument a glob pattern.
const GLOB_CHARS: &[char] = &['*', '?', '['];

/// Check whether an argument should be treated as a glob pattern.
fn is_pattern(arg: &str) -> bool {
    arg.contains(GLOB_CHARS) && !Path::new(arg).exists()
}

/// Expand input arguments into the list of files to process.
///
/// - An existing path is kept as is.
/// - A pattern is replaced by its matches, sorted. Directories are skipped.
/// - A pattern with no matches, or one that is not a valid glob, is kept
///   literally. Opening it then fails for that argument alone, and the
///   other files are still processed.
///
/// Order of the arguments is preserved; duplicates are not removed.
pub fn expand_inputs<S: AsRef<str>>(args: &[S]) -> Vec<PathBuf> {
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let mut files = Vec::new();

    for arg in args {
        let arg = arg.as_ref();

        if !is_pattern(arg) {
            files.push(PathBuf::from(arg));
            continue;
        }

        let entries = match glob_with(arg, options) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(pattern = arg, error = %e, "not a valid glob, using literal path");
                files.push(PathBuf::from(arg));
                continue;
            }
        };

        let mut matched: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!(
                        pattern = arg,
                        path = %e.path().display(),
                        error = %e.error(),
                        "skipping unreadable glob match"
                    );
                    None
                }
            })
            .filter(|path| !path.is_dir())
            .collect();
        matched.sort();

        tracing::debug!(pattern = arg, matches = matched.len(), "expanded input pattern");

        if matched.is_empty() {
            files.push(PathBuf::from(arg));
        } else {
            files.extend(matched);
        }
    }

    files
}
