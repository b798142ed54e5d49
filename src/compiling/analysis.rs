//! Static grammar analysis
//!
//! Merged flavor grammars have a known defect class: a malformed line
//! meant for one rule can be absorbed by a broader sibling alternative.
//! Because matching is ordered choice, the absorption is deterministic,
//! and it is visible statically as FIRST-set overlap between alternatives
//! of the same rule. `analyze` reports that overlap as shadowing warnings,
//! along with rules unreachable from the start rule and terminals nothing
//! references.

use crate::composing::ResolvedGrammar;
use crate::grammar::ast::{Alternative, Quantifier, Symbol, SymbolKind};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// Rule not reachable from the start rule.
    UnreachableRule(String),
    /// Named terminal no reachable rule references and `%ignore` omits.
    UnusedTerminal(String),
    /// An earlier alternative can start with the same terminal as a later
    /// one; under ordered choice the earlier one is tried first and may
    /// absorb the later one's input.
    ShadowedAlternative {
        rule: String,
        earlier: usize,
        later: usize,
        witness: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnreachableRule(name) => {
                write!(f, "rule `{name}` is unreachable from `start`")
            }
            Warning::UnusedTerminal(name) => write!(f, "terminal {name} is never used"),
            Warning::ShadowedAlternative {
                rule,
                earlier,
                later,
                witness,
            } => write!(
                f,
                "rule `{rule}`: alternative {} may shadow alternative {} (both can start with {witness})",
                earlier + 1,
                later + 1,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisReport {
    pub warnings: Vec<Warning>,
}

impl AnalysisReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Analyze a resolved grammar. Warnings come in a stable order: shadowing
/// by rule declaration, then unreachable rules, then unused terminals.
pub fn analyze(grammar: &ResolvedGrammar) -> AnalysisReport {
    let nullable = nullable_rules(grammar);
    let first = first_sets(grammar, &nullable);
    let mut warnings = Vec::new();

    for rule in grammar.rules() {
        let firsts: Vec<BTreeSet<String>> = rule
            .alternatives
            .iter()
            .map(|alternative| first_of_alternative(alternative, &nullable, &first))
            .collect();
        for later in 1..firsts.len() {
            for earlier in 0..later {
                if let Some(witness) = firsts[earlier].intersection(&firsts[later]).next() {
                    warnings.push(Warning::ShadowedAlternative {
                        rule: rule.name.clone(),
                        earlier,
                        later,
                        witness: witness.clone(),
                    });
                }
            }
        }
    }

    let reachable = reachable_rules(grammar);
    for rule in grammar.rules() {
        if !reachable.contains(rule.name.as_str()) {
            warnings.push(Warning::UnreachableRule(rule.name.clone()));
        }
    }

    let used = used_terminals(grammar, &reachable);
    for terminal in grammar.terminals() {
        if !used.contains(terminal.name.as_str()) && !grammar.is_ignored(&terminal.name) {
            warnings.push(Warning::UnusedTerminal(terminal.name.clone()));
        }
    }

    AnalysisReport { warnings }
}

fn symbol_nullable(symbol: &Symbol, nullable: &HashSet<String>) -> bool {
    if matches!(
        symbol.quantifier,
        Quantifier::Optional | Quantifier::ZeroOrMore
    ) {
        return true;
    }
    match &symbol.kind {
        SymbolKind::Rule(name) => nullable.contains(name),
        _ => false,
    }
}

fn nullable_rules(grammar: &ResolvedGrammar) -> HashSet<String> {
    let mut nullable: HashSet<String> = HashSet::new();
    loop {
        let mut changed = false;
        for rule in grammar.rules() {
            if nullable.contains(&rule.name) {
                continue;
            }
            let is_nullable = rule.alternatives.iter().any(|alternative| {
                alternative
                    .iter()
                    .all(|symbol| symbol_nullable(symbol, &nullable))
            });
            if is_nullable {
                nullable.insert(rule.name.clone());
                changed = true;
            }
        }
        if !changed {
            return nullable;
        }
    }
}

/// Terminal display name a symbol can contribute to a FIRST set.
fn first_of_symbol(
    symbol: &Symbol,
    first: &HashMap<String, BTreeSet<String>>,
) -> BTreeSet<String> {
    match &symbol.kind {
        SymbolKind::Terminal(name) => BTreeSet::from([name.clone()]),
        SymbolKind::Literal(text) => BTreeSet::from([format!("\"{text}\"")]),
        SymbolKind::Rule(name) => first.get(name).cloned().unwrap_or_default(),
    }
}

fn first_of_alternative(
    alternative: &Alternative,
    nullable: &HashSet<String>,
    first: &HashMap<String, BTreeSet<String>>,
) -> BTreeSet<String> {
    let mut set = BTreeSet::new();
    for symbol in alternative {
        set.extend(first_of_symbol(symbol, first));
        if !symbol_nullable(symbol, nullable) {
            break;
        }
    }
    set
}

fn first_sets(
    grammar: &ResolvedGrammar,
    nullable: &HashSet<String>,
) -> HashMap<String, BTreeSet<String>> {
    let mut first: HashMap<String, BTreeSet<String>> = grammar
        .rules()
        .iter()
        .map(|rule| (rule.name.clone(), BTreeSet::new()))
        .collect();

    loop {
        let mut changed = false;
        for rule in grammar.rules() {
            let mut set = first[&rule.name].clone();
            for alternative in &rule.alternatives {
                set.extend(first_of_alternative(alternative, nullable, &first));
            }
            if set.len() != first[&rule.name].len() {
                first.insert(rule.name.clone(), set);
                changed = true;
            }
        }
        if !changed {
            return first;
        }
    }
}

fn reachable_rules(grammar: &ResolvedGrammar) -> HashSet<String> {
    let mut reachable = HashSet::new();
    let mut queue = vec![grammar.start().to_string()];
    while let Some(name) = queue.pop() {
        if !reachable.insert(name.clone()) {
            continue;
        }
        let Some(rule) = grammar.rule(&name) else {
            continue;
        };
        for alternative in &rule.alternatives {
            for symbol in alternative {
                if let SymbolKind::Rule(target) = &symbol.kind {
                    if !reachable.contains(target) {
                        queue.push(target.clone());
                    }
                }
            }
        }
    }
    reachable
}

fn used_terminals(grammar: &ResolvedGrammar, reachable: &HashSet<String>) -> HashSet<String> {
    let mut used = HashSet::new();
    for rule in grammar.rules() {
        if !reachable.contains(rule.name.as_str()) {
            continue;
        }
        for alternative in &rule.alternatives {
            for symbol in alternative {
                if let SymbolKind::Terminal(name) = &symbol.kind {
                    used.insert(name.clone());
                }
            }
        }
    }
    used
}
