//! # atfgram
//!
//! Composable grammar tooling for ATF transliteration dialects.
//!
//! ATF is a line-oriented annotated transliteration format that exists in
//! several regional dialects ("flavors", e.g. eBL-style and Oracc-style)
//! with partially overlapping grammars. Instead of maintaining one grammar
//! per flavor or a single merged grammar, atfgram lets a flavor be declared
//! as a base grammar module plus an ordered list of extension modules:
//! extensions add alternatives to existing rules (`%extend`), replace rule
//! definitions outright (`%override`), or contribute new rules of their own.
//!
//! The pipeline:
//!
//! 1. [`grammar`] parses `.atfg` grammar module files.
//! 2. [`composing`] loads modules with their imports and resolves a flavor
//!    (base + extensions) into a single rule set.
//! 3. [`compiling`] turns the resolved rule set into a terminal scanner and
//!    rule table, and can analyze it for shadowed or unreachable rules.
//! 4. [`parsing`] matches input lines against the compiled grammar,
//!    producing parse trees or structured failures.
//! 5. [`formats`] renders parse trees (`tag`, `treeviz`, `json`).

pub mod compiling;
pub mod composing;
pub mod formats;
pub mod grammar;
pub mod parsing;
pub mod testing;

pub use compiling::CompiledGrammar;
pub use composing::ResolvedGrammar;
pub use parsing::{ParseFailure, ParseTree};
