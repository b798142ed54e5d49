//! XML-like tag serialization
//!
//! Serializes a parse tree to nested tags that directly reflect the tree:
//! rule nodes become tags named after the rule, leaves become tags named
//! after the terminal with the matched text as content. Anonymous literal
//! leaves get the `lit` tag, since their display name is not a valid tag.
//!
//! ```text
//! <textline>
//!   <LINENO>1.</LINENO>
//!   <word>
//!     <SIGN>a-na</SIGN>
//!   </word>
//! </textline>
//! ```

use crate::formats::registry::{FormatError, Formatter};
use crate::parsing::tree::ParseTree;

pub struct TagFormatter;

impl Formatter for TagFormatter {
    fn name(&self) -> &str {
        "tag"
    }

    fn serialize(&self, tree: &ParseTree) -> Result<String, FormatError> {
        Ok(to_tag_str(tree))
    }

    fn description(&self) -> &str {
        "XML-like nested tags"
    }
}

/// Render a tree as nested tags. No trailing newline.
pub fn to_tag_str(tree: &ParseTree) -> String {
    let mut out = String::new();
    render(tree, 0, &mut out);
    out
}

fn render(tree: &ParseTree, level: usize, out: &mut String) {
    let indent = "  ".repeat(level);
    match tree {
        ParseTree::Leaf { terminal, text, .. } => {
            let tag = tag_name(terminal);
            out.push_str(&format!("{indent}<{tag}>{}</{tag}>", escape_xml(text)));
        }
        ParseTree::Node { rule, children } => {
            if children.is_empty() {
                out.push_str(&format!("{indent}<{rule}/>"));
            } else {
                out.push_str(&format!("{indent}<{rule}>\n"));
                for child in children {
                    render(child, level + 1, out);
                    out.push('\n');
                }
                out.push_str(&format!("{indent}</{rule}>"));
            }
        }
    }
}

/// Literal leaves display as `"text"`, which is not a usable tag name.
fn tag_name(terminal: &str) -> &str {
    if terminal.starts_with('"') {
        "lit"
    } else {
        terminal
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
