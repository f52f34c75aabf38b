//! Pure validation predicates for command-line tokens.
//!
//! Each predicate only answers yes or no; callers build the diagnostic that
//! names the offending flag and value.

use std::fs::File;
use std::path::Path;

/// File extension required of every input game file, case-sensitive.
pub const PGN_EXTENSION: &str = ".pgn";

/// True iff `input` is non-empty and every character is a decimal digit.
///
/// Signs and surrounding whitespace are not tolerated.
pub fn is_unsigned_integer(input: &str) -> bool {
    !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit())
}

/// True iff `input` is exactly one of the color tokens `W`, `B` or `A`.
pub fn is_color_token(input: &str) -> bool {
    matches!(input, "W" | "B" | "A")
}

/// True iff `path` ends in [`PGN_EXTENSION`], compared case-sensitively.
pub fn has_pgn_extension(path: &str) -> bool {
    path.ends_with(PGN_EXTENSION)
}

/// True iff `path` can currently be opened for reading.
///
/// The answer can go stale at any time; callers re-check at point of use.
pub fn is_readable_file(path: &Path) -> bool {
    File::open(path).is_ok()
}
