// Unicode regular expression engine
// Backtracking matcher with a Perl-like and an XML Schema dialect

#[cfg(test)]
mod test;

pub mod ast;
pub mod error;
pub mod match_result;
pub mod matcher;
pub mod ranges;

mod bmsearch;
mod cache;
mod compiler;
mod op;
mod options;
mod parser;
mod unicode;
mod util;

pub use cache::cached;
pub use error::{ParseError, ParseErrorKind};
pub use match_result::Match;
pub use matcher::{CharAccess, Regex};
pub use ranges::RangeSet;
pub use util::quote;

/// Compiles `pattern` (no options) and tests `text` against it. For
/// repeated use, compile once with [`Regex::new`] or go through
/// [`cached`].
pub fn matches(pattern: &str, text: &str) -> Result<bool, ParseError> {
    Ok(Regex::new(pattern)?.matches(text))
}
