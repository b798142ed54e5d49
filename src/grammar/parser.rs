//! Parser for `.atfg` grammar modules
//!
//! The notation is line-oriented, so parsing happens in two stages, the way
//! the format lexers in this codebase classify lines before reading their
//! contents: each line is tokenized and classified by its first token
//! (continuation, directive, or definition), then rule bodies are parsed
//! with chumsky combinators over the line's `(Token, Span)` stream.
//!
//! Errors do not abort the module: every malformed line is reported with
//! its location and parsing continues, so an author sees all problems in
//! one pass.

use crate::grammar::ast::{
    Alternative, GrammarModule, Item, ItemKind, Quantifier, Rule, Symbol, SymbolKind, TerminalDef,
    TerminalPattern,
};
use crate::grammar::tokens::{tokenize_line, Span, Token};
use chumsky::{prelude::*, Stream};
use std::fmt;

/// Type alias for token with location
type TokenLocation = (Token, Span);
type BodyError = Simple<TokenLocation>;

/// A syntax error with its module and line location.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub module: String,
    pub line: usize,
    pub kind: SyntaxErrorKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxErrorKind {
    /// A character the tokenizer cannot place (1-based column).
    UnexpectedCharacter { column: usize },
    /// Definition or directive without `:` before its body.
    MissingColon,
    /// The line starts with something other than a name.
    ExpectedDefinitionName,
    UnknownDirective(String),
    /// The body after `:` is not a valid alternative list (1-based column).
    MalformedBody { column: usize },
    EmptyBody,
    /// A `|` continuation line with no rule definition above it.
    DanglingContinuation,
    /// `%extend` on a terminal; terminals can only be overridden.
    ExtendTerminal(String),
    /// Terminal definitions take exactly one literal or regex pattern.
    ExpectedTerminalPattern,
    /// `%import` takes exactly one module name.
    ExpectedModuleName,
    /// `%ignore` takes exactly one terminal name.
    ExpectedTerminalName,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.module, self.line, self.kind)
    }
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxErrorKind::UnexpectedCharacter { column } => {
                write!(f, "unexpected character at column {column}")
            }
            SyntaxErrorKind::MissingColon => write!(f, "expected `:` after name"),
            SyntaxErrorKind::ExpectedDefinitionName => {
                write!(f, "expected a rule or terminal name")
            }
            SyntaxErrorKind::UnknownDirective(name) => write!(f, "unknown directive `{name}`"),
            SyntaxErrorKind::MalformedBody { column } => {
                write!(f, "malformed rule body at column {column}")
            }
            SyntaxErrorKind::EmptyBody => write!(f, "empty rule body"),
            SyntaxErrorKind::DanglingContinuation => {
                write!(f, "`|` continuation without a preceding rule")
            }
            SyntaxErrorKind::ExtendTerminal(name) => {
                write!(f, "cannot %extend terminal `{name}`; use %override")
            }
            SyntaxErrorKind::ExpectedTerminalPattern => {
                write!(f, "expected a single literal or /regex/ pattern")
            }
            SyntaxErrorKind::ExpectedModuleName => write!(f, "expected a module name"),
            SyntaxErrorKind::ExpectedTerminalName => write!(f, "expected a terminal name"),
        }
    }
}

impl std::error::Error for SyntaxError {}

/// Parse a grammar module from source. All malformed lines are reported.
pub fn parse_module(name: &str, source: &str) -> Result<GrammarModule, Vec<SyntaxError>> {
    let mut module = GrammarModule::new(name);
    let mut errors = Vec::new();

    for (index, raw_line) in source.lines().enumerate() {
        let line_no = index + 1;
        let error_at = |kind| SyntaxError {
            module: name.to_string(),
            line: line_no,
            kind,
        };

        let tokens = match tokenize_line(raw_line) {
            Ok(tokens) => tokens,
            Err(span) => {
                errors.push(error_at(SyntaxErrorKind::UnexpectedCharacter {
                    column: span.start + 1,
                }));
                continue;
            }
        };
        let tokens: Vec<TokenLocation> = tokens
            .into_iter()
            .filter(|(token, _)| !token.is_trivia())
            .collect();
        if tokens.is_empty() {
            continue;
        }

        let parsed = match tokens[0].0 {
            Token::Pipe => {
                parse_body(raw_line, &tokens[1..]).and_then(|alternatives| {
                    match continuation_target(&mut module) {
                        Some(target) => {
                            target.extend(alternatives);
                            Ok(None)
                        }
                        None => Err(SyntaxErrorKind::DanglingContinuation),
                    }
                })
            }
            Token::Directive => parse_directive(raw_line, &tokens).map(Some),
            Token::RuleName => parse_rule_definition(raw_line, &tokens).map(Some),
            Token::TerminalName => parse_terminal_definition(raw_line, &tokens)
                .map(|def| Some(ItemKind::Terminal(def))),
            _ => Err(SyntaxErrorKind::ExpectedDefinitionName),
        };

        match parsed {
            Ok(Some(kind)) => module.items.push(Item {
                line: line_no,
                kind,
            }),
            Ok(None) => {}
            Err(kind) => errors.push(error_at(kind)),
        }
    }

    if errors.is_empty() {
        Ok(module)
    } else {
        Err(errors)
    }
}

/// The alternative list a `|` continuation line appends to, if the last
/// item can take one.
fn continuation_target(module: &mut GrammarModule) -> Option<&mut Vec<Alternative>> {
    match module.items.last_mut().map(|item| &mut item.kind) {
        Some(ItemKind::Rule(rule)) => Some(&mut rule.alternatives),
        Some(ItemKind::ExtendRule { alternatives, .. }) => Some(alternatives),
        Some(ItemKind::OverrideRule { alternatives, .. }) => Some(alternatives),
        _ => None,
    }
}

fn parse_rule_definition(
    line: &str,
    tokens: &[TokenLocation],
) -> Result<ItemKind, SyntaxErrorKind> {
    if tokens.get(1).map(|(token, _)| *token) != Some(Token::Colon) {
        return Err(SyntaxErrorKind::MissingColon);
    }
    let name = line[tokens[0].1.clone()].to_string();
    let alternatives = parse_body(line, &tokens[2..])?;
    Ok(ItemKind::Rule(Rule {
        name,
        alternatives,
    }))
}

fn parse_terminal_definition(
    line: &str,
    tokens: &[TokenLocation],
) -> Result<TerminalDef, SyntaxErrorKind> {
    if tokens.get(1).map(|(token, _)| *token) != Some(Token::Colon) {
        return Err(SyntaxErrorKind::MissingColon);
    }
    let name = line[tokens[0].1.clone()].to_string();
    let pattern = parse_terminal_pattern(line, &tokens[2..])?;
    Ok(TerminalDef { name, pattern })
}

fn parse_terminal_pattern(
    line: &str,
    tokens: &[TokenLocation],
) -> Result<TerminalPattern, SyntaxErrorKind> {
    match tokens {
        [] => Err(SyntaxErrorKind::EmptyBody),
        [(Token::Literal, span)] => Ok(TerminalPattern::Literal(unquote(&line[span.clone()]))),
        [(Token::Regex, span)] => Ok(TerminalPattern::Regex(unslash(&line[span.clone()]))),
        _ => Err(SyntaxErrorKind::ExpectedTerminalPattern),
    }
}

fn parse_directive(line: &str, tokens: &[TokenLocation]) -> Result<ItemKind, SyntaxErrorKind> {
    let directive = &line[tokens[0].1.clone()];
    let args = &tokens[1..];

    match directive {
        "%import" => match args {
            [(Token::RuleName, span)] => Ok(ItemKind::Import(line[span.clone()].to_string())),
            _ => Err(SyntaxErrorKind::ExpectedModuleName),
        },
        "%ignore" => match args {
            [(Token::TerminalName, span)] => Ok(ItemKind::Ignore(line[span.clone()].to_string())),
            _ => Err(SyntaxErrorKind::ExpectedTerminalName),
        },
        "%extend" => match args.first() {
            Some((Token::RuleName, span)) => {
                let name = line[span.clone()].to_string();
                let alternatives = parse_directive_body(line, &args[1..])?;
                Ok(ItemKind::ExtendRule {
                    name,
                    alternatives,
                })
            }
            Some((Token::TerminalName, span)) => {
                Err(SyntaxErrorKind::ExtendTerminal(line[span.clone()].to_string()))
            }
            _ => Err(SyntaxErrorKind::ExpectedDefinitionName),
        },
        "%override" => match args.first() {
            Some((Token::RuleName, span)) => {
                let name = line[span.clone()].to_string();
                let alternatives = parse_directive_body(line, &args[1..])?;
                Ok(ItemKind::OverrideRule {
                    name,
                    alternatives,
                })
            }
            Some((Token::TerminalName, span)) => {
                let name = line[span.clone()].to_string();
                if args.get(1).map(|(token, _)| *token) != Some(Token::Colon) {
                    return Err(SyntaxErrorKind::MissingColon);
                }
                let pattern = parse_terminal_pattern(line, &args[2..])?;
                Ok(ItemKind::OverrideTerminal(TerminalDef { name, pattern }))
            }
            _ => Err(SyntaxErrorKind::ExpectedDefinitionName),
        },
        other => Err(SyntaxErrorKind::UnknownDirective(other.to_string())),
    }
}

/// Body of `%extend rule: ...` / `%override rule: ...` after the rule name.
fn parse_directive_body(
    line: &str,
    tokens: &[TokenLocation],
) -> Result<Vec<Alternative>, SyntaxErrorKind> {
    if tokens.first().map(|(token, _)| *token) != Some(Token::Colon) {
        return Err(SyntaxErrorKind::MissingColon);
    }
    parse_body(line, &tokens[1..])
}

/// What a body symbol referred to, before span-to-text extraction.
#[derive(Debug, Clone, Copy)]
enum SpecKind {
    Rule,
    Terminal,
    Literal,
}

#[derive(Debug, Clone)]
struct SymbolSpec {
    kind: SpecKind,
    span: Span,
    quantifier: Quantifier,
}

/// Parse an alternative list (`a B | "x" c+`) from the tokens after `:`.
fn parse_body(line: &str, tokens: &[TokenLocation]) -> Result<Vec<Alternative>, SyntaxErrorKind> {
    if tokens.is_empty() {
        return Err(SyntaxErrorKind::EmptyBody);
    }

    let stream = Stream::from_iter(
        0..0,
        tokens
            .iter()
            .cloned()
            .map(|(token, span)| ((token, span.clone()), span)),
    );

    let alternatives = body_parser()
        .parse(stream)
        .map_err(|errors| SyntaxErrorKind::MalformedBody {
            column: errors
                .first()
                .map(|error| error.span().start + 1)
                .unwrap_or(1),
        })?;

    Ok(alternatives
        .into_iter()
        .map(|specs| specs.into_iter().map(|spec| realize(line, spec)).collect())
        .collect())
}

fn body_parser(
) -> impl Parser<TokenLocation, Vec<Vec<SymbolSpec>>, Error = BodyError> {
    let rule_ref = filter::<TokenLocation, _, BodyError>(|(token, _): &TokenLocation| {
        matches!(token, Token::RuleName)
    })
    .map(|(_, span)| (SpecKind::Rule, span));

    let terminal_ref = filter::<TokenLocation, _, BodyError>(|(token, _): &TokenLocation| {
        matches!(token, Token::TerminalName)
    })
    .map(|(_, span)| (SpecKind::Terminal, span));

    let literal = filter::<TokenLocation, _, BodyError>(|(token, _): &TokenLocation| {
        matches!(token, Token::Literal)
    })
    .map(|(_, span)| (SpecKind::Literal, span));

    let quantifier = filter::<TokenLocation, _, BodyError>(|(token, _): &TokenLocation| {
        matches!(token, Token::Question | Token::Star | Token::Plus)
    })
    .map(|(token, _)| match token {
        Token::Question => Quantifier::Optional,
        Token::Star => Quantifier::ZeroOrMore,
        _ => Quantifier::OneOrMore,
    })
    .or_not();

    let symbol = rule_ref
        .or(terminal_ref)
        .or(literal)
        .then(quantifier)
        .map(|((kind, span), quantifier)| SymbolSpec {
            kind,
            span,
            quantifier: quantifier.unwrap_or(Quantifier::One),
        });

    let pipe = filter::<TokenLocation, _, BodyError>(|(token, _): &TokenLocation| {
        matches!(token, Token::Pipe)
    })
    .ignored();

    symbol
        .repeated()
        .at_least(1)
        .separated_by(pipe)
        .at_least(1)
        .then_ignore(end())
}

fn realize(line: &str, spec: SymbolSpec) -> Symbol {
    let text = &line[spec.span];
    let kind = match spec.kind {
        SpecKind::Rule => SymbolKind::Rule(text.to_string()),
        SpecKind::Terminal => SymbolKind::Terminal(text.to_string()),
        SpecKind::Literal => SymbolKind::Literal(unquote(text)),
    };
    Symbol {
        kind,
        quantifier: spec.quantifier,
    }
}

/// Strip the surrounding quotes and resolve `\"` / `\\` escapes.
fn unquote(text: &str) -> String {
    let inner = &text[1..text.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Strip the surrounding slashes; `\/` becomes `/`, other escapes are left
/// for the regex engine.
fn unslash(text: &str) -> String {
    let inner = &text[1..text.len() - 1];
    inner.replace("\\/", "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> GrammarModule {
        parse_module("test", source).unwrap()
    }

    fn errors(source: &str) -> Vec<SyntaxErrorKind> {
        parse_module("test", source)
            .unwrap_err()
            .into_iter()
            .map(|error| error.kind)
            .collect()
    }

    #[test]
    fn parses_rule_with_alternatives_and_quantifiers() {
        let module = parse("textline: LINENO word+ | LINENO");
        assert_eq!(module.items.len(), 1);
        match &module.items[0].kind {
            ItemKind::Rule(rule) => {
                assert_eq!(rule.name, "textline");
                assert_eq!(
                    rule.alternatives,
                    vec![
                        vec![
                            Symbol::terminal("LINENO"),
                            Symbol::rule("word").with_quantifier(Quantifier::OneOrMore),
                        ],
                        vec![Symbol::terminal("LINENO")],
                    ]
                );
            }
            other => panic!("expected rule, got {other:?}"),
        }
    }

    #[test]
    fn parses_continuation_lines() {
        let module = parse("start: textline\n     | dollar_line\n     | note_line");
        match &module.items[0].kind {
            ItemKind::Rule(rule) => {
                assert_eq!(rule.alternatives.len(), 3);
                assert_eq!(rule.alternatives[2], vec![Symbol::rule("note_line")]);
            }
            other => panic!("expected rule, got {other:?}"),
        }
    }

    #[test]
    fn parses_terminal_definitions() {
        let module = parse("LINENO: /[0-9]+'?\\./\nDOLLAR: \"$\"");
        assert_eq!(
            module.items[0].kind,
            ItemKind::Terminal(TerminalDef {
                name: "LINENO".to_string(),
                pattern: TerminalPattern::Regex("[0-9]+'?\\.".to_string()),
            })
        );
        assert_eq!(
            module.items[1].kind,
            ItemKind::Terminal(TerminalDef {
                name: "DOLLAR".to_string(),
                pattern: TerminalPattern::Literal("$".to_string()),
            })
        );
    }

    #[test]
    fn parses_directives() {
        let module = parse(
            "%import common\n%extend start: oracc_line\n%override word: SIGN\n%ignore WS\n%override LINENO: /[0-9]+[a-z]?\\./",
        );
        assert_eq!(module.items[0].kind, ItemKind::Import("common".to_string()));
        assert_eq!(
            module.items[1].kind,
            ItemKind::ExtendRule {
                name: "start".to_string(),
                alternatives: vec![vec![Symbol::rule("oracc_line")]],
            }
        );
        assert_eq!(
            module.items[2].kind,
            ItemKind::OverrideRule {
                name: "word".to_string(),
                alternatives: vec![vec![Symbol::terminal("SIGN")]],
            }
        );
        assert_eq!(module.items[3].kind, ItemKind::Ignore("WS".to_string()));
        assert_eq!(
            module.items[4].kind,
            ItemKind::OverrideTerminal(TerminalDef {
                name: "LINENO".to_string(),
                pattern: TerminalPattern::Regex("[0-9]+[a-z]?\\.".to_string()),
            })
        );
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let module = parse("// header comment\n\nword: SIGN // trailing\n");
        assert_eq!(module.items.len(), 1);
        assert_eq!(module.items[0].line, 3);
    }

    #[test]
    fn literal_symbols_are_unquoted() {
        let module = parse(r#"dollar_line: "$" word+"#);
        match &module.items[0].kind {
            ItemKind::Rule(rule) => {
                assert_eq!(rule.alternatives[0][0], Symbol::literal("$"));
            }
            other => panic!("expected rule, got {other:?}"),
        }
    }

    #[test]
    fn reports_missing_colon() {
        assert_eq!(errors("word SIGN"), vec![SyntaxErrorKind::MissingColon]);
    }

    #[test]
    fn reports_dangling_continuation() {
        assert_eq!(
            errors("| textline"),
            vec![SyntaxErrorKind::DanglingContinuation]
        );
    }

    #[test]
    fn reports_extend_on_terminal() {
        assert_eq!(
            errors("%extend LINENO: /x/"),
            vec![SyntaxErrorKind::ExtendTerminal("LINENO".to_string())]
        );
    }

    #[test]
    fn reports_unknown_directive() {
        assert_eq!(
            errors("%inherit common"),
            vec![SyntaxErrorKind::UnknownDirective("%inherit".to_string())]
        );
    }

    #[test]
    fn reports_all_errors_with_line_numbers() {
        let errors = parse_module("broken", "word SIGN\n\nstart:\n").unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].line, 1);
        assert_eq!(errors[0].kind, SyntaxErrorKind::MissingColon);
        assert_eq!(errors[1].line, 3);
        assert_eq!(errors[1].kind, SyntaxErrorKind::EmptyBody);
        assert_eq!(errors[1].to_string(), "broken:3: empty rule body");
    }

    #[test]
    fn reports_malformed_body_column() {
        assert_eq!(
            errors("start: | textline"),
            vec![SyntaxErrorKind::MalformedBody { column: 8 }]
        );
    }

    #[test]
    fn terminal_body_must_be_a_single_pattern() {
        assert_eq!(
            errors("SIGN: /a/ /b/"),
            vec![SyntaxErrorKind::ExpectedTerminalPattern]
        );
    }
}
