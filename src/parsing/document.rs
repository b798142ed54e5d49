//! Per-line document driver
//!
//! A document is parsed line by line. A line that fails stays a failure in
//! the output; it never aborts the run, so one malformed line in a tablet
//! transliteration does not hide the rest.

use crate::compiling::table::CompiledGrammar;
use crate::parsing::engine::{parse_line, ParseFailure};
use crate::parsing::tree::ParseTree;

#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Parsed(ParseTree),
    /// Blank lines are structural, not content.
    Blank,
    Failed(ParseFailure),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    /// 1-based line number in the source.
    pub number: usize,
    pub text: String,
    pub outcome: LineOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub lines: Vec<ParsedLine>,
}

impl ParsedDocument {
    pub fn parsed_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| matches!(line.outcome, LineOutcome::Parsed(_)))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&ParsedLine, &ParseFailure)> {
        self.lines.iter().filter_map(|line| match &line.outcome {
            LineOutcome::Failed(failure) => Some((line, failure)),
            _ => None,
        })
    }
}

/// Parse every line of `source` against the grammar.
pub fn parse_document(grammar: &CompiledGrammar, source: &str) -> ParsedDocument {
    let lines = source
        .lines()
        .enumerate()
        .map(|(index, text)| {
            let outcome = if text.trim().is_empty() {
                LineOutcome::Blank
            } else {
                match parse_line(grammar, text) {
                    Ok(tree) => LineOutcome::Parsed(tree),
                    Err(failure) => LineOutcome::Failed(failure),
                }
            };
            ParsedLine {
                number: index + 1,
                text: text.to_string(),
                outcome,
            }
        })
        .collect();

    ParsedDocument { lines }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiling::compile;
    use crate::composing::resolve;
    use crate::grammar::parse_module;

    fn grammar() -> CompiledGrammar {
        let module = parse_module(
            "test",
            "start: LINENO SIGN+\nLINENO: /[0-9]+\\./\nSIGN: /[a-z-]+/\nWS: / +/\n%ignore WS\n",
        )
        .unwrap();
        compile(&resolve(std::slice::from_ref(&module)).unwrap()).unwrap()
    }

    #[test]
    fn failures_do_not_stop_later_lines() {
        let document = parse_document(&grammar(), "1. a-na\n\nbroken line 2\n2. um-ma\n");

        assert_eq!(document.lines.len(), 4);
        assert_eq!(document.parsed_count(), 2);
        assert_eq!(document.failed_count(), 1);

        let (line, _) = document.failures().next().unwrap();
        assert_eq!(line.number, 3);
        assert_eq!(line.text, "broken line 2");
        assert_eq!(document.lines[1].outcome, LineOutcome::Blank);
    }

    #[test]
    fn line_numbers_are_one_based() {
        let document = parse_document(&grammar(), "1. a-na");
        assert_eq!(document.lines[0].number, 1);
    }
}
