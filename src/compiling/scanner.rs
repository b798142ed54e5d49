//! Terminal scanner
//!
//! The scanner turns an input line into a token sequence by repeatedly
//! matching every terminal at the current position and taking the longest
//! match. Ties go to literal terminals over regex terminals, then to the
//! earlier declaration, so a dialect keyword beats the broad sign pattern
//! that would also cover it. Terminals named by `%ignore` are matched and
//! discarded.

use crate::grammar::ast::TerminalPattern;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Identity of a scanned token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalId {
    /// A named terminal definition, e.g. `LINENO`.
    Named(String),
    /// An anonymous literal from a rule body, e.g. `"$"`.
    Literal(String),
}

impl fmt::Display for TerminalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalId::Named(name) => write!(f, "{name}"),
            TerminalId::Literal(text) => write!(f, "\"{text}\""),
        }
    }
}

/// One token produced by the scanner. The span is the byte range within
/// the scanned line.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanToken {
    pub id: TerminalId,
    pub text: String,
    pub span: Range<usize>,
}

/// Input for building a scanner entry.
#[derive(Debug, Clone)]
pub struct TerminalSpec {
    pub id: TerminalId,
    pub pattern: TerminalPattern,
    pub ignored: bool,
}

/// A terminal pattern that failed to compile.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannerBuildError {
    pub terminal: String,
    pub message: String,
}

impl fmt::Display for ScannerBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bad pattern for terminal {}: {}", self.terminal, self.message)
    }
}

impl std::error::Error for ScannerBuildError {}

/// No terminal matches at this byte offset.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanError {
    pub offset: usize,
}

#[derive(Debug)]
enum Matcher {
    Literal(String),
    Pattern(Regex),
}

#[derive(Debug)]
struct Entry {
    id: TerminalId,
    matcher: Matcher,
    ignored: bool,
}

impl Entry {
    fn match_len(&self, rest: &str) -> Option<usize> {
        let len = match &self.matcher {
            Matcher::Literal(text) => rest.starts_with(text.as_str()).then(|| text.len())?,
            Matcher::Pattern(regex) => regex.find(rest)?.end(),
        };
        // A zero-length match would never advance the scanner.
        (len > 0).then_some(len)
    }

    fn is_literal(&self) -> bool {
        matches!(self.matcher, Matcher::Literal(_))
    }
}

/// Longest-match tokenizer over a compiled terminal set.
#[derive(Debug)]
pub struct Scanner {
    entries: Vec<Entry>,
}

impl Scanner {
    /// Build a scanner. Entry order is declaration order and decides ties.
    pub fn new(specs: Vec<TerminalSpec>) -> Result<Self, ScannerBuildError> {
        let mut entries = Vec::with_capacity(specs.len());
        for spec in specs {
            let matcher = match spec.pattern {
                TerminalPattern::Literal(text) => Matcher::Literal(text),
                TerminalPattern::Regex(source) => {
                    let anchored = format!("^(?:{source})");
                    let regex = Regex::new(&anchored).map_err(|error| ScannerBuildError {
                        terminal: spec.id.to_string(),
                        message: error.to_string(),
                    })?;
                    Matcher::Pattern(regex)
                }
            };
            entries.push(Entry {
                id: spec.id,
                matcher,
                ignored: spec.ignored,
            });
        }
        Ok(Scanner { entries })
    }

    /// Tokenize a line. Fails at the first offset no terminal matches.
    pub fn scan(&self, line: &str) -> Result<Vec<ScanToken>, ScanError> {
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < line.len() {
            let rest = &line[pos..];
            let mut best: Option<(usize, usize)> = None;

            for (index, entry) in self.entries.iter().enumerate() {
                if let Some(len) = entry.match_len(rest) {
                    let wins = match best {
                        None => true,
                        Some((best_index, best_len)) => {
                            len > best_len
                                || (len == best_len
                                    && entry.is_literal()
                                    && !self.entries[best_index].is_literal())
                        }
                    };
                    if wins {
                        best = Some((index, len));
                    }
                }
            }

            let (index, len) = best.ok_or(ScanError { offset: pos })?;
            let entry = &self.entries[index];
            if !entry.ignored {
                tokens.push(ScanToken {
                    id: entry.id.clone(),
                    text: rest[..len].to_string(),
                    span: pos..pos + len,
                });
            }
            pos += len;
        }

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, pattern: TerminalPattern) -> TerminalSpec {
        TerminalSpec {
            id: TerminalId::Named(name.to_string()),
            pattern,
            ignored: false,
        }
    }

    fn scanner() -> Scanner {
        Scanner::new(vec![
            named("LINENO", TerminalPattern::Regex("[0-9]+'?\\.".to_string())),
            named("AND", TerminalPattern::Literal("And".to_string())),
            named("SIGN", TerminalPattern::Regex("[a-zA-Z0-9'-]+".to_string())),
            TerminalSpec {
                id: TerminalId::Named("WS".to_string()),
                pattern: TerminalPattern::Regex("[ \\t]+".to_string()),
                ignored: true,
            },
        ])
        .unwrap()
    }

    fn ids(tokens: &[ScanToken]) -> Vec<String> {
        tokens.iter().map(|token| token.id.to_string()).collect()
    }

    #[test]
    fn takes_longest_match() {
        let tokens = scanner().scan("12. a-na").unwrap();
        assert_eq!(ids(&tokens), vec!["LINENO", "SIGN"]);
        assert_eq!(tokens[0].text, "12.");
        assert_eq!(tokens[1].text, "a-na");
        assert_eq!(tokens[1].span, 4..8);
    }

    #[test]
    fn literal_beats_regex_on_equal_length() {
        let tokens = scanner().scan("And then").unwrap();
        assert_eq!(ids(&tokens), vec!["AND", "SIGN"]);
    }

    #[test]
    fn ignored_terminals_are_dropped() {
        let tokens = scanner().scan("1. umma").unwrap();
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn reports_offset_of_unmatched_input() {
        let error = scanner().scan("1. §broken").unwrap_err();
        assert_eq!(error.offset, 3);
    }

    #[test]
    fn earlier_declaration_wins_equal_length_ties() {
        // "1." matches both LINENO and a same-length SIGN-like pattern;
        // LINENO is declared first and keeps the token.
        let scanner = Scanner::new(vec![
            named("LINENO", TerminalPattern::Regex("[0-9]+\\.".to_string())),
            named("ANY", TerminalPattern::Regex("[^ ]+".to_string())),
        ])
        .unwrap();
        let tokens = scanner.scan("1.").unwrap();
        assert_eq!(ids(&tokens), vec!["LINENO"]);
    }

    #[test]
    fn bad_pattern_is_reported() {
        let error = Scanner::new(vec![named("BAD", TerminalPattern::Regex("[".to_string()))])
            .unwrap_err();
        assert_eq!(error.terminal, "BAD");
    }
}
