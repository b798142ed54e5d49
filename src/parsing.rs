//! Line parsing
//!
//! ATF is line-oriented, so the parser works one line at a time: the
//! scanner tokenizes the line, then [`engine`] matches the token sequence
//! against the compiled rule table, producing a [`ParseTree`] or a
//! [`ParseFailure`]. [`document`] drives whole inputs line by line,
//! collecting failures instead of aborting.

pub mod document;
pub mod engine;
pub mod tree;

pub use document::{parse_document, LineOutcome, ParsedDocument, ParsedLine};
pub use engine::{accepts, parse_line, ParseFailure};
pub use tree::ParseTree;
