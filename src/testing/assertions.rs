//! Fluent parse-tree assertions

use crate::parsing::tree::ParseTree;

/// Entry point: assert on a tree starting at its root.
pub fn assert_tree(tree: &ParseTree) -> TreeAssertion<'_> {
    TreeAssertion {
        tree,
        context: "root".to_string(),
    }
}

pub struct TreeAssertion<'a> {
    tree: &'a ParseTree,
    context: String,
}

impl<'a> TreeAssertion<'a> {
    pub fn rule(self, expected: &str) -> Self {
        match self.tree.rule() {
            Some(actual) => assert_eq!(
                actual, expected,
                "{}: expected rule `{}`, but got `{}`",
                self.context, expected, actual
            ),
            None => panic!(
                "{}: expected rule `{}`, but found a leaf",
                self.context, expected
            ),
        }
        self
    }

    pub fn leaf(self, terminal: &str, text: &str) -> Self {
        match self.tree {
            ParseTree::Leaf {
                terminal: actual_terminal,
                text: actual_text,
                ..
            } => {
                assert_eq!(
                    actual_terminal, terminal,
                    "{}: expected leaf terminal {}, but got {}",
                    self.context, terminal, actual_terminal
                );
                assert_eq!(
                    actual_text, text,
                    "{}: expected leaf text '{}', but got '{}'",
                    self.context, text, actual_text
                );
            }
            ParseTree::Node { rule, .. } => panic!(
                "{}: expected a leaf, but found rule `{}`",
                self.context, rule
            ),
        }
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        let actual = self.tree.children().len();
        assert_eq!(
            actual, expected,
            "{}: expected {} children, but got {}",
            self.context, expected, actual
        );
        self
    }

    /// Assert on the child at `index` with a nested assertion scope.
    pub fn child(self, index: usize, assertions: impl FnOnce(TreeAssertion<'_>)) -> Self {
        let children = self.tree.children();
        let child = children.get(index).unwrap_or_else(|| {
            panic!(
                "{}: child index {} out of bounds ({} children)",
                self.context,
                index,
                children.len()
            )
        });
        assertions(TreeAssertion {
            tree: child,
            context: format!("{} > child {}", self.context, index),
        });
        self
    }

    /// Assert on the space-joined leaf text under this node.
    pub fn text(self, expected: &str) -> Self {
        let actual = self.tree.text();
        assert_eq!(
            actual, expected,
            "{}: expected text '{}', but got '{}'",
            self.context, expected, actual
        );
        self
    }

    pub fn text_contains(self, substring: &str) -> Self {
        let actual = self.tree.text();
        assert!(
            actual.contains(substring),
            "{}: expected text to contain '{}', but got '{}'",
            self.context,
            substring,
            actual
        );
        self
    }
}
