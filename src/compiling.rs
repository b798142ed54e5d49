//! Grammar compilation
//!
//! A resolved grammar is still symbolic: rules refer to each other and to
//! terminals by name. Compilation interns those references into a rule
//! table ([`table`]) and builds the terminal scanner ([`scanner`]) that
//! turns an input line into tokens. [`analysis`] runs the static checks
//! behind `atfgram check`: reachability, unused terminals, and
//! shadowed-alternative warnings.

pub mod analysis;
pub mod scanner;
pub mod table;

pub use analysis::{analyze, AnalysisReport, Warning};
pub use scanner::{ScanError, ScanToken, Scanner, ScannerBuildError, TerminalId};
pub use table::{compile, CompileError, CompiledGrammar, CompiledRule, CompiledSymbol, SymbolMatcher};
