//! Token definitions for the grammar definition language
//!
//! Tokens are defined with the logos derive macro. They carry no text of
//! their own; callers slice the source line with the token's span, so the
//! same tokens can feed both the module parser and error reporting.

use logos::Logos;

/// Byte range of a token within its source line.
pub type Span = std::ops::Range<usize>;

/// All tokens of the `.atfg` notation. Modules are line-oriented, so lines
/// are tokenized individually and there is no newline token.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    #[token(":")]
    Colon,

    #[token("|")]
    Pipe,

    #[token("?")]
    Question,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    /// Composition directives: `%import`, `%extend`, `%override`, `%ignore`.
    #[regex(r"%[a-z]+")]
    Directive,

    /// Rule names are lowercase identifiers.
    #[regex(r"[a-z_][a-z0-9_]*")]
    RuleName,

    /// Terminal names are uppercase identifiers.
    #[regex(r"[A-Z][A-Z0-9_]*")]
    TerminalName,

    /// Quoted literal, e.g. `"$"`. Supports `\"` and `\\` escapes.
    #[regex(r#""([^"\\]|\\.)*""#)]
    Literal,

    /// Slash-delimited regex pattern, e.g. `/[0-9]+/`. `\/` escapes a slash.
    #[regex(r"/([^/\\\n]|\\.)+/")]
    Regex,

    #[regex(r"//[^\n]*")]
    Comment,

    #[regex(r"[ \t]+")]
    Whitespace,
}

impl Token {
    /// Whitespace and comments carry no structure.
    pub fn is_trivia(&self) -> bool {
        matches!(self, Token::Whitespace | Token::Comment)
    }
}

/// Tokenize a single module line. Returns the span of the first character
/// the tokenizer cannot place on error.
pub fn tokenize_line(line: &str) -> Result<Vec<(Token, Span)>, Span> {
    let mut lexer = Token::lexer(line);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => return Err(lexer.span()),
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<Token> {
        tokenize_line(line)
            .unwrap()
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    #[test]
    fn tokenizes_rule_definition_line() {
        assert_eq!(
            kinds("textline: LINENO word+"),
            vec![
                Token::RuleName,
                Token::Colon,
                Token::Whitespace,
                Token::TerminalName,
                Token::Whitespace,
                Token::RuleName,
                Token::Plus,
            ]
        );
    }

    #[test]
    fn tokenizes_terminal_definition_with_regex() {
        assert_eq!(
            kinds("LINENO: /[0-9]+'?\\./"),
            vec![
                Token::TerminalName,
                Token::Colon,
                Token::Whitespace,
                Token::Regex,
            ]
        );
    }

    #[test]
    fn tokenizes_directive_line() {
        assert_eq!(
            kinds("%extend start: oracc_line"),
            vec![
                Token::Directive,
                Token::Whitespace,
                Token::RuleName,
                Token::Colon,
                Token::Whitespace,
                Token::RuleName,
            ]
        );
    }

    #[test]
    fn comment_wins_over_regex_pattern() {
        assert_eq!(kinds("// see /docs/grammar/"), vec![Token::Comment]);
    }

    #[test]
    fn literal_with_escapes() {
        let line = r#"DOLLAR: "\"$\"""#;
        let tokens = tokenize_line(line).unwrap();
        assert_eq!(tokens[3].0, Token::Literal);
        assert_eq!(&line[tokens[3].1.clone()], r#""\"$\"""#);
    }

    #[test]
    fn reports_span_of_unexpected_character() {
        let err = tokenize_line("word: SIGN @").unwrap_err();
        assert_eq!(err, 11..12);
    }
}
