//! Output format implementations for parse trees
//!
//! Three renderers behind a pluggable registry:
//! - `tag`: XML-like nested tags mirroring the tree structure
//! - `treeviz`: one line per node, structure as indentation
//! - `json`: serde serialization of the tree

pub mod registry;
pub mod tag;
pub mod treeviz;

pub use registry::{FormatError, FormatRegistry, Formatter, JsonFormatter};
pub use tag::{to_tag_str, TagFormatter};
pub use treeviz::{to_treeviz_str, TreevizFormatter};
