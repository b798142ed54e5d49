//! Rule table compilation
//!
//! Interns a resolved grammar's name references into indices, collects the
//! anonymous literals that appear in rule bodies, and builds the terminal
//! scanner. The result is everything the line parser needs.

use crate::compiling::scanner::{Scanner, ScannerBuildError, TerminalId, TerminalSpec};
use crate::composing::ResolvedGrammar;
use crate::grammar::ast::{Quantifier, SymbolKind, TerminalPattern};
use std::collections::HashMap;
use std::fmt;

/// How a compiled symbol matches.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolMatcher {
    /// Descend into the rule at this index.
    Rule(usize),
    /// Consume one token with this identity.
    Terminal(TerminalId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSymbol {
    pub matcher: SymbolMatcher,
    pub quantifier: Quantifier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRule {
    pub name: String,
    pub alternatives: Vec<Vec<CompiledSymbol>>,
}

/// A compiled grammar: scanner plus rule table.
#[derive(Debug)]
pub struct CompiledGrammar {
    start: usize,
    rules: Vec<CompiledRule>,
    scanner: Scanner,
}

impl CompiledGrammar {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn rule(&self, index: usize) -> &CompiledRule {
        &self.rules[index]
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    BadTerminalPattern(ScannerBuildError),
    /// A rule body references a rule missing from the grammar. Resolution
    /// rejects this; it can only happen with a hand-assembled grammar.
    UndefinedRule(String),
    UndefinedTerminal(String),
    EmptyGrammar,
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::BadTerminalPattern(error) => write!(f, "{error}"),
            CompileError::UndefinedRule(name) => write!(f, "undefined rule `{name}`"),
            CompileError::UndefinedTerminal(name) => write!(f, "undefined terminal `{name}`"),
            CompileError::EmptyGrammar => write!(f, "grammar has no rules"),
        }
    }
}

impl std::error::Error for CompileError {}

/// Compile a resolved grammar into a scanner and rule table.
pub fn compile(grammar: &ResolvedGrammar) -> Result<CompiledGrammar, CompileError> {
    if grammar.rules().is_empty() {
        return Err(CompileError::EmptyGrammar);
    }

    let index: HashMap<&str, usize> = grammar
        .rules()
        .iter()
        .enumerate()
        .map(|(position, rule)| (rule.name.as_str(), position))
        .collect();

    let mut literals: Vec<String> = Vec::new();
    let mut rules = Vec::with_capacity(grammar.rules().len());

    for rule in grammar.rules() {
        let mut alternatives = Vec::with_capacity(rule.alternatives.len());
        for alternative in &rule.alternatives {
            let mut symbols = Vec::with_capacity(alternative.len());
            for symbol in alternative {
                let matcher = match &symbol.kind {
                    SymbolKind::Rule(name) => match index.get(name.as_str()) {
                        Some(&position) => SymbolMatcher::Rule(position),
                        None => return Err(CompileError::UndefinedRule(name.clone())),
                    },
                    SymbolKind::Terminal(name) => {
                        if grammar.terminal(name).is_none() {
                            return Err(CompileError::UndefinedTerminal(name.clone()));
                        }
                        SymbolMatcher::Terminal(TerminalId::Named(name.clone()))
                    }
                    SymbolKind::Literal(text) => {
                        if !literals.contains(text) {
                            literals.push(text.clone());
                        }
                        SymbolMatcher::Terminal(TerminalId::Literal(text.clone()))
                    }
                };
                symbols.push(CompiledSymbol {
                    matcher,
                    quantifier: symbol.quantifier,
                });
            }
            alternatives.push(symbols);
        }
        rules.push(CompiledRule {
            name: rule.name.clone(),
            alternatives,
        });
    }

    // Named terminals first in declaration order, anonymous literals after;
    // the scanner breaks ties by position.
    let mut specs: Vec<TerminalSpec> = grammar
        .terminals()
        .iter()
        .map(|def| TerminalSpec {
            id: TerminalId::Named(def.name.clone()),
            pattern: def.pattern.clone(),
            ignored: grammar.is_ignored(&def.name),
        })
        .collect();
    specs.extend(literals.into_iter().map(|text| TerminalSpec {
        id: TerminalId::Literal(text.clone()),
        pattern: TerminalPattern::Literal(text),
        ignored: false,
    }));

    let scanner = Scanner::new(specs).map_err(CompileError::BadTerminalPattern)?;

    let start = index[grammar.start()];
    Ok(CompiledGrammar {
        start,
        rules,
        scanner,
    })
}
