//! Test support
//!
//! Shared grammar fixtures and fluent parse-tree assertions used by the
//! unit and integration suites. Tree assertions verify structure and
//! content, not just counts:
//!
//! ```rust,ignore
//! use atfgram::testing::{assert_tree, fixtures};
//!
//! let grammar = fixtures::compiled_ebl();
//! let tree = atfgram::parsing::parse_line(&grammar, "This is an eBL textline").unwrap();
//!
//! assert_tree(&tree)
//!     .rule("start")
//!     .child_count(1)
//!     .child(0, |line| {
//!         line.rule("textline").text("This is an eBL textline");
//!     });
//! ```

pub mod assertions;
pub mod fixtures;

pub use assertions::{assert_tree, TreeAssertion};
