//! Treeviz formatter
//!
//! One line per node, structure encoded as indentation with two spaces per
//! nesting level. Rule nodes get `⊚`, terminal leaves get `◦` followed by
//! the matched text, truncated so wide lines stay scannable:
//!
//! ```text
//! ⊚ start
//!   ⊚ textline
//!     ◦ LINENO 1.
//!     ⊚ word
//!       ◦ SIGN a-na
//! ```

use crate::formats::registry::{FormatError, Formatter};
use crate::parsing::tree::ParseTree;

const MAX_TEXT_CHARS: usize = 40;

pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, tree: &ParseTree) -> Result<String, FormatError> {
        Ok(to_treeviz_str(tree))
    }

    fn description(&self) -> &str {
        "one line per node, structure as indentation"
    }
}

/// Render a tree in treeviz form. No trailing newline.
pub fn to_treeviz_str(tree: &ParseTree) -> String {
    let mut lines = Vec::new();
    render(tree, 0, &mut lines);
    lines.join("\n")
}

fn render(tree: &ParseTree, level: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(level);
    match tree {
        ParseTree::Node { rule, children } => {
            lines.push(format!("{indent}⊚ {rule}"));
            for child in children {
                render(child, level + 1, lines);
            }
        }
        ParseTree::Leaf { terminal, text, .. } => {
            lines.push(format!("{indent}◦ {terminal} {}", truncate(text)));
        }
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() > MAX_TEXT_CHARS {
        let mut truncated: String = text.chars().take(MAX_TEXT_CHARS).collect();
        truncated.push_str("...");
        truncated
    } else {
        text.to_string()
    }
}
