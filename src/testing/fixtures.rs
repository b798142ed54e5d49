//! Shared grammar fixtures
//!
//! A miniature eBL base grammar and an Oracc extension over it, plus the
//! sample lines the composition suites exercise. The base accepts the two
//! eBL lines; after the Oracc extension is applied, all four lines parse.

use crate::compiling::{compile, CompiledGrammar};
use crate::composing::{resolve, ResolvedGrammar};
use crate::grammar::ast::GrammarModule;
use crate::grammar::parse_module;

/// Base grammar of the eBL flavor.
pub const EBL_BASE: &str = "\
// eBL base: textlines plus the linetypes shared by every dialect
start: textline
     | common_line

textline: INTRO EBL TEXTLINE_WORD
common_line: \"And this is a\" COMMON LINETYPE_WORD

INTRO: \"This is an\"
EBL: \"eBL\"
TEXTLINE_WORD: \"textline\"
COMMON: \"common\"
LINETYPE_WORD: \"linetype\"
WS: /[ \\t]+/
%ignore WS
";

/// Oracc additions layered over the eBL base.
pub const ORACC_EXTENSION: &str = "\
// Oracc dialect: a second textline form and its own linetype
%extend textline: INTRO ORACC TEXTLINE_WORD
%extend start: oracc_line

oracc_line: ORACC_INTRO ORACC LINE_WORD

ORACC: \"oracc-style\"
ORACC_INTRO: \"Finally an\"
LINE_WORD: \"line\"
";

pub const EBL_TEXTLINE: &str = "This is an eBL textline";
pub const COMMON_LINE: &str = "And this is a common linetype";
pub const ORACC_TEXTLINE: &str = "This is an oracc-style textline";
pub const ORACC_LINE: &str = "Finally an oracc-style line";

/// The two lines the base grammar accepts.
pub const BASE_LINES: [&str; 2] = [EBL_TEXTLINE, COMMON_LINE];

/// All four lines the extended grammar accepts.
pub const EXTENDED_LINES: [&str; 4] = [EBL_TEXTLINE, COMMON_LINE, ORACC_TEXTLINE, ORACC_LINE];

pub fn ebl_module() -> GrammarModule {
    parse_module("ebl", EBL_BASE).expect("fixture base grammar parses")
}

pub fn oracc_module() -> GrammarModule {
    parse_module("oracc", ORACC_EXTENSION).expect("fixture extension parses")
}

/// The base resolved on its own.
pub fn resolved_ebl() -> ResolvedGrammar {
    resolve(&[ebl_module()]).expect("fixture base grammar resolves")
}

/// Base plus Oracc extension.
pub fn resolved_oracc() -> ResolvedGrammar {
    resolve(&[ebl_module(), oracc_module()]).expect("fixture flavor resolves")
}

pub fn compiled_ebl() -> CompiledGrammar {
    compile(&resolved_ebl()).expect("fixture base grammar compiles")
}

pub fn compiled_oracc() -> CompiledGrammar {
    compile(&resolved_oracc()).expect("fixture flavor compiles")
}
