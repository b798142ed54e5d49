//! Parse trees
//!
//! A tree node is either a rule node with children or a terminal leaf with
//! the matched text and its byte span within the line. Trees serialize to
//! JSON via serde for the `json` output format.

use serde::Serialize;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseTree {
    Node {
        rule: String,
        children: Vec<ParseTree>,
    },
    Leaf {
        terminal: String,
        text: String,
        span: Range<usize>,
    },
}

impl ParseTree {
    pub fn node(rule: impl Into<String>, children: Vec<ParseTree>) -> Self {
        ParseTree::Node {
            rule: rule.into(),
            children,
        }
    }

    pub fn leaf(terminal: impl Into<String>, text: impl Into<String>, span: Range<usize>) -> Self {
        ParseTree::Leaf {
            terminal: terminal.into(),
            text: text.into(),
            span,
        }
    }

    /// Rule name for nodes, `None` for leaves.
    pub fn rule(&self) -> Option<&str> {
        match self {
            ParseTree::Node { rule, .. } => Some(rule),
            ParseTree::Leaf { .. } => None,
        }
    }

    pub fn children(&self) -> &[ParseTree] {
        match self {
            ParseTree::Node { children, .. } => children,
            ParseTree::Leaf { .. } => &[],
        }
    }

    /// The leaf texts under this node, space-joined.
    pub fn text(&self) -> String {
        let mut texts = Vec::new();
        self.collect_leaf_texts(&mut texts);
        texts.join(" ")
    }

    fn collect_leaf_texts<'a>(&'a self, texts: &mut Vec<&'a str>) {
        match self {
            ParseTree::Leaf { text, .. } => texts.push(text),
            ParseTree::Node { children, .. } => {
                for child in children {
                    child.collect_leaf_texts(texts);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParseTree {
        ParseTree::node(
            "textline",
            vec![
                ParseTree::leaf("LINENO", "1.", 0..2),
                ParseTree::node("word", vec![ParseTree::leaf("SIGN", "a-na", 3..7)]),
            ],
        )
    }

    #[test]
    fn text_joins_leaves_in_order() {
        assert_eq!(sample().text(), "1. a-na");
    }

    #[test]
    fn rule_and_children_accessors() {
        let tree = sample();
        assert_eq!(tree.rule(), Some("textline"));
        assert_eq!(tree.children().len(), 2);
        assert_eq!(tree.children()[0].rule(), None);
    }

    #[test]
    fn serializes_with_kind_tags() {
        let json = serde_json::to_value(ParseTree::leaf("SIGN", "a-na", 3..7)).unwrap();
        assert_eq!(json["kind"], "leaf");
        assert_eq!(json["terminal"], "SIGN");
        assert_eq!(json["span"]["start"], 3);
    }
}
