//! The line matching engine
//!
//! Matching is ordered-choice recursive descent over the scanned tokens:
//! alternatives are tried in declaration order and the first one that fits
//! wins, so precedence between overlapping rules is exactly their
//! declaration order. Quantified symbols match greedily and back off until
//! the rest of the sequence fits. Left-recursive rules are cut off rather
//! than looped on; a left-recursive alternative simply never matches.
//!
//! On failure the engine reports the furthest position it reached and the
//! terminals it would have accepted there.

use crate::compiling::scanner::{ScanToken, TerminalId};
use crate::compiling::table::{CompiledGrammar, CompiledSymbol, SymbolMatcher};
use crate::grammar::ast::Quantifier;
use crate::parsing::tree::ParseTree;
use std::collections::HashSet;
use std::fmt;

/// A line the grammar does not accept.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseFailure {
    /// 1-based character column of the first unexpected input.
    pub column: usize,
    /// The offending token text, if scanning got that far.
    pub found: Option<String>,
    /// Terminals that would have been accepted instead.
    pub expected: Vec<String>,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unexpected characters at column {}", self.column)?;
        if let Some(found) = &self.found {
            write!(f, " (found `{found}`)")?;
        }
        if !self.expected.is_empty() {
            write!(f, ", expected {}", self.expected.join(" or "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseFailure {}

/// Parse one line against the compiled grammar.
pub fn parse_line(grammar: &CompiledGrammar, line: &str) -> Result<ParseTree, ParseFailure> {
    let tokens = grammar.scanner().scan(line).map_err(|error| {
        let found = line[error.offset..].chars().next().map(String::from);
        ParseFailure {
            column: char_column(line, error.offset),
            found,
            expected: Vec::new(),
        }
    })?;

    let mut matcher = Matcher {
        grammar,
        tokens: &tokens,
        furthest: 0,
        expected: Vec::new(),
        active: HashSet::new(),
    };

    match matcher.match_rule(grammar.start(), 0) {
        Some((tree, end)) if end == tokens.len() => Ok(tree),
        Some((_, end)) => {
            // The start rule matched a prefix; the leftover token is the error.
            if matcher.furthest < end {
                matcher.furthest = end;
                matcher.expected.clear();
            }
            Err(matcher.failure(line))
        }
        None => Err(matcher.failure(line)),
    }
}

/// Whether the grammar accepts the line.
pub fn accepts(grammar: &CompiledGrammar, line: &str) -> bool {
    parse_line(grammar, line).is_ok()
}

fn char_column(line: &str, offset: usize) -> usize {
    line[..offset].chars().count() + 1
}

struct Matcher<'a> {
    grammar: &'a CompiledGrammar,
    tokens: &'a [ScanToken],
    /// Furthest token index a terminal mismatch occurred at.
    furthest: usize,
    /// Terminal names expected at `furthest`.
    expected: Vec<String>,
    /// (rule, position) pairs currently being matched; breaks left recursion.
    active: HashSet<(usize, usize)>,
}

impl<'a> Matcher<'a> {
    fn match_rule(&mut self, rule: usize, pos: usize) -> Option<(ParseTree, usize)> {
        if !self.active.insert((rule, pos)) {
            return None;
        }
        let mut result = None;
        for alternative in &self.grammar.rule(rule).alternatives {
            if let Some((children, end)) = self.match_seq(alternative, pos) {
                let name = self.grammar.rule(rule).name.clone();
                result = Some((ParseTree::node(name, children), end));
                break;
            }
        }
        self.active.remove(&(rule, pos));
        result
    }

    fn match_seq(
        &mut self,
        symbols: &[CompiledSymbol],
        pos: usize,
    ) -> Option<(Vec<ParseTree>, usize)> {
        let Some((first, rest)) = symbols.split_first() else {
            return Some((Vec::new(), pos));
        };

        match first.quantifier {
            Quantifier::One => {
                let (tree, next) = self.match_atom(&first.matcher, pos)?;
                let (mut trees, end) = self.match_seq(rest, next)?;
                trees.insert(0, tree);
                Some((trees, end))
            }
            Quantifier::Optional => {
                if let Some((tree, next)) = self.match_atom(&first.matcher, pos) {
                    if let Some((mut trees, end)) = self.match_seq(rest, next) {
                        trees.insert(0, tree);
                        return Some((trees, end));
                    }
                }
                self.match_seq(rest, pos)
            }
            Quantifier::ZeroOrMore | Quantifier::OneOrMore => {
                let minimum = usize::from(first.quantifier == Quantifier::OneOrMore);

                // Greedy: take as many as possible, then back off until the
                // rest of the sequence fits.
                let mut matches: Vec<(ParseTree, usize)> = Vec::new();
                let mut cursor = pos;
                while let Some((tree, next)) = self.match_atom(&first.matcher, cursor) {
                    if next == cursor {
                        break;
                    }
                    matches.push((tree, next));
                    cursor = next;
                }

                if matches.len() < minimum {
                    return None;
                }
                for count in (minimum..=matches.len()).rev() {
                    let resume = if count == 0 { pos } else { matches[count - 1].1 };
                    if let Some((rest_trees, end)) = self.match_seq(rest, resume) {
                        let mut trees: Vec<ParseTree> =
                            matches[..count].iter().map(|(tree, _)| tree.clone()).collect();
                        trees.extend(rest_trees);
                        return Some((trees, end));
                    }
                }
                None
            }
        }
    }

    fn match_atom(&mut self, matcher: &SymbolMatcher, pos: usize) -> Option<(ParseTree, usize)> {
        match matcher {
            SymbolMatcher::Rule(rule) => self.match_rule(*rule, pos),
            SymbolMatcher::Terminal(id) => match self.tokens.get(pos) {
                Some(token) if token_matches(id, token) => Some((
                    ParseTree::leaf(token.id.to_string(), token.text.clone(), token.span.clone()),
                    pos + 1,
                )),
                _ => {
                    self.record_expected(pos, id);
                    None
                }
            },
        }
    }

    fn record_expected(&mut self, pos: usize, id: &TerminalId) {
        if pos > self.furthest {
            self.furthest = pos;
            self.expected.clear();
        }
        if pos == self.furthest {
            let name = id.to_string();
            if !self.expected.contains(&name) {
                self.expected.push(name);
            }
        }
    }

    fn failure(&self, line: &str) -> ParseFailure {
        let (column, found) = match self.tokens.get(self.furthest) {
            Some(token) => (char_column(line, token.span.start), Some(token.text.clone())),
            None => (line.chars().count() + 1, None),
        };
        ParseFailure {
            column,
            found,
            expected: self.expected.clone(),
        }
    }
}

/// A literal symbol matches any token with the exact text, so a keyword
/// literal still matches when a broader named terminal scanned it.
fn token_matches(id: &TerminalId, token: &ScanToken) -> bool {
    match id {
        TerminalId::Named(_) => token.id == *id,
        TerminalId::Literal(text) => token.text == *text,
    }
}
