//! Data model for grammar modules
//!
//! A grammar module is an ordered list of items: rule definitions, terminal
//! definitions, and composition directives. Rules are flat alternative
//! lists; each alternative is a non-empty sequence of symbols with optional
//! postfix quantifiers. Order is significant everywhere: alternatives are
//! tried in declaration order at parse time, and directives apply top to
//! bottom during resolution.

use serde::Serialize;
use std::fmt;

/// Postfix quantifier on a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantifier {
    One,
    Optional,
    ZeroOrMore,
    OneOrMore,
}

impl Quantifier {
    /// The source-notation suffix for this quantifier.
    pub fn suffix(&self) -> &'static str {
        match self {
            Quantifier::One => "",
            Quantifier::Optional => "?",
            Quantifier::ZeroOrMore => "*",
            Quantifier::OneOrMore => "+",
        }
    }
}

/// What a symbol refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    /// Reference to a rule (lowercase identifier).
    Rule(String),
    /// Reference to a named terminal (uppercase identifier).
    Terminal(String),
    /// Anonymous literal terminal, e.g. `"$"`.
    Literal(String),
}

/// One element of an alternative.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub quantifier: Quantifier,
}

impl Symbol {
    pub fn rule(name: impl Into<String>) -> Self {
        Symbol {
            kind: SymbolKind::Rule(name.into()),
            quantifier: Quantifier::One,
        }
    }

    pub fn terminal(name: impl Into<String>) -> Self {
        Symbol {
            kind: SymbolKind::Terminal(name.into()),
            quantifier: Quantifier::One,
        }
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Symbol {
            kind: SymbolKind::Literal(text.into()),
            quantifier: Quantifier::One,
        }
    }

    pub fn with_quantifier(mut self, quantifier: Quantifier) -> Self {
        self.quantifier = quantifier;
        self
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SymbolKind::Rule(name) | SymbolKind::Terminal(name) => write!(f, "{name}")?,
            SymbolKind::Literal(text) => write!(f, "\"{}\"", escape_literal(text))?,
        }
        write!(f, "{}", self.quantifier.suffix())
    }
}

/// A non-empty sequence of symbols.
pub type Alternative = Vec<Symbol>;

/// A named rule with its ordered alternatives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub name: String,
    pub alternatives: Vec<Alternative>,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        for (i, alternative) in self.alternatives.iter().enumerate() {
            if i > 0 {
                write!(f, " |")?;
            }
            for symbol in alternative {
                write!(f, " {symbol}")?;
            }
        }
        Ok(())
    }
}

/// The pattern a terminal matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalPattern {
    /// Exact text, e.g. `"$"`.
    Literal(String),
    /// Regular expression source (without the surrounding slashes).
    Regex(String),
}

impl fmt::Display for TerminalPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalPattern::Literal(text) => write!(f, "\"{}\"", escape_literal(text)),
            TerminalPattern::Regex(source) => write!(f, "/{source}/"),
        }
    }
}

/// A named terminal definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerminalDef {
    pub name: String,
    pub pattern: TerminalPattern,
}

impl fmt::Display for TerminalDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.pattern)
    }
}

/// One item of a grammar module, with its source line for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// 1-based line number in the module source.
    pub line: usize,
    pub kind: ItemKind,
}

/// The kinds of items a module can contain.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Rule(Rule),
    Terminal(TerminalDef),
    /// `%import <module>`: merge another module's rules ahead of this one.
    Import(String),
    /// `%extend <rule>: <body>`: append alternatives to an existing rule.
    ExtendRule {
        name: String,
        alternatives: Vec<Alternative>,
    },
    /// `%override <rule>: <body>`: replace an existing rule's alternatives.
    OverrideRule {
        name: String,
        alternatives: Vec<Alternative>,
    },
    /// `%override <TERMINAL>: <pattern>`: replace a terminal's pattern.
    OverrideTerminal(TerminalDef),
    /// `%ignore <TERMINAL>`: discard this terminal's matches while scanning.
    Ignore(String),
}

/// A parsed grammar module.
#[derive(Debug, Clone, PartialEq)]
pub struct GrammarModule {
    pub name: String,
    pub items: Vec<Item>,
}

impl GrammarModule {
    pub fn new(name: impl Into<String>) -> Self {
        GrammarModule {
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Names of modules this module imports, in declaration order.
    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match &item.kind {
            ItemKind::Import(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

pub(crate) fn escape_literal(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_display_includes_quantifier() {
        let symbol = Symbol::rule("word").with_quantifier(Quantifier::OneOrMore);
        assert_eq!(symbol.to_string(), "word+");

        let symbol = Symbol::terminal("SIGN");
        assert_eq!(symbol.to_string(), "SIGN");
    }

    #[test]
    fn literal_symbol_display_is_quoted_and_escaped() {
        let symbol = Symbol::literal("say \"hi\"");
        assert_eq!(symbol.to_string(), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn rule_display_joins_alternatives_with_pipes() {
        let rule = Rule {
            name: "start".to_string(),
            alternatives: vec![
                vec![Symbol::rule("textline")],
                vec![Symbol::rule("dollar_line")],
            ],
        };
        assert_eq!(rule.to_string(), "start: textline | dollar_line");
    }

    #[test]
    fn terminal_display_round_trips_notation() {
        let def = TerminalDef {
            name: "LINENO".to_string(),
            pattern: TerminalPattern::Regex("[0-9]+'?\\.".to_string()),
        };
        assert_eq!(def.to_string(), "LINENO: /[0-9]+'?\\./");
    }

    #[test]
    fn module_lists_imports_in_order() {
        let module = GrammarModule {
            name: "oracc".to_string(),
            items: vec![
                Item {
                    line: 1,
                    kind: ItemKind::Import("common".to_string()),
                },
                Item {
                    line: 2,
                    kind: ItemKind::Import("signs".to_string()),
                },
            ],
        };
        let imports: Vec<_> = module.imports().collect();
        assert_eq!(imports, vec!["common", "signs"]);
    }
}
