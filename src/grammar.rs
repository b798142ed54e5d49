//! The grammar definition language
//!
//! ATF flavor grammars are written as `.atfg` modules: named rule sets in a
//! small lark-style notation with composition directives. This module holds
//! the data model for grammar modules ([`ast`]), the tokenizer for the
//! notation ([`tokens`]), and the module parser ([`parser`]).
//!
//! A module looks like:
//!
//! ```text
//! // rules shared by every dialect
//! start: textline
//!      | dollar_line
//!
//! textline: LINENO word+
//! word: SIGN
//!
//! LINENO: /[0-9]+'?\./
//! WS: /[ \t]+/
//! %ignore WS
//!
//! %import common
//! %extend textline: LINENO gloss_word+
//! %override word: SIGN | DETERMINATIVE
//! ```

pub mod ast;
pub mod parser;
pub mod tokens;

pub use ast::{
    Alternative, GrammarModule, Item, ItemKind, Quantifier, Rule, Symbol, SymbolKind, TerminalDef,
    TerminalPattern,
};
pub use parser::{parse_module, SyntaxError, SyntaxErrorKind};
