//! Grammar composition resolution
//!
//! Resolution folds a sequence of grammar modules (base first, then
//! extensions in declared order) into one rule set. Items apply top to
//! bottom within a module:
//!
//! - a plain rule or terminal definition adds a new name; colliding with an
//!   existing name is an error, so a module cannot shadow a base rule by
//!   accident;
//! - `%extend` appends alternatives to an existing rule, which keeps every
//!   previously accepted line accepted under ordered-choice matching;
//! - `%override` replaces a rule's whole alternative list, including
//!   alternatives added by earlier extensions (last override wins);
//! - `%ignore` marks a terminal as discarded by the scanner.
//!
//! Extending or overriding a name that does not exist in the accumulated
//! set is an error. After all modules apply, every symbol reference is
//! checked, so a resolved grammar contains no dangling names.

use crate::grammar::ast::{GrammarModule, ItemKind, Rule, SymbolKind, TerminalDef};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// A fully resolved rule set, ready for compilation.
///
/// Rule and terminal order is the order names were first introduced; the
/// start rule is the first rule of the base module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedGrammar {
    start: String,
    rules: Vec<Rule>,
    terminals: Vec<TerminalDef>,
    ignored: Vec<String>,
    #[serde(skip)]
    rule_index: HashMap<String, usize>,
    #[serde(skip)]
    terminal_index: HashMap<String, usize>,
}

impl ResolvedGrammar {
    /// Name of the start rule.
    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn terminals(&self) -> &[TerminalDef] {
        &self.terminals
    }

    /// Terminal names discarded by the scanner.
    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rule_index.get(name).map(|&index| &self.rules[index])
    }

    pub fn terminal(&self, name: &str) -> Option<&TerminalDef> {
        self.terminal_index
            .get(name)
            .map(|&index| &self.terminals[index])
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored.iter().any(|ignored| ignored == name)
    }
}

impl fmt::Display for ResolvedGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{rule}")?;
        }
        if !self.terminals.is_empty() {
            writeln!(f)?;
            for terminal in &self.terminals {
                writeln!(f, "{terminal}")?;
            }
        }
        for name in &self.ignored {
            writeln!(f, "%ignore {name}")?;
        }
        Ok(())
    }
}

/// A composition error with the module and line of the offending item.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeError {
    pub module: String,
    pub line: usize,
    pub kind: ComposeErrorKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComposeErrorKind {
    /// `%extend`/`%override` names a rule absent from the accumulated set.
    UnknownRule(String),
    /// `%override` names a terminal absent from the accumulated set.
    UnknownTerminal(String),
    /// A plain definition collides with an existing rule.
    DuplicateRule(String),
    /// A plain definition collides with an existing terminal.
    DuplicateTerminal(String),
    /// A rule body references a rule that was never defined.
    UndefinedRuleReference { rule: String, reference: String },
    /// A rule body references a terminal that was never defined.
    UndefinedTerminalReference { rule: String, reference: String },
    /// `%ignore` names a terminal that was never defined.
    UnknownIgnoredTerminal(String),
    /// An `%import` survived to resolution; the loader flattens these.
    UnresolvedImport(String),
    /// No module contributed any rule.
    EmptyGrammar,
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.module, self.line, self.kind)
    }
}

impl fmt::Display for ComposeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposeErrorKind::UnknownRule(name) => {
                write!(f, "cannot modify unknown rule `{name}`")
            }
            ComposeErrorKind::UnknownTerminal(name) => {
                write!(f, "cannot override unknown terminal `{name}`")
            }
            ComposeErrorKind::DuplicateRule(name) => write!(
                f,
                "rule `{name}` is already defined; use %extend or %override"
            ),
            ComposeErrorKind::DuplicateTerminal(name) => write!(
                f,
                "terminal `{name}` is already defined; use %override"
            ),
            ComposeErrorKind::UndefinedRuleReference { rule, reference } => {
                write!(f, "rule `{rule}` references undefined rule `{reference}`")
            }
            ComposeErrorKind::UndefinedTerminalReference { rule, reference } => write!(
                f,
                "rule `{rule}` references undefined terminal `{reference}`"
            ),
            ComposeErrorKind::UnknownIgnoredTerminal(name) => {
                write!(f, "%ignore names unknown terminal `{name}`")
            }
            ComposeErrorKind::UnresolvedImport(name) => {
                write!(f, "unresolved import `{name}`")
            }
            ComposeErrorKind::EmptyGrammar => write!(f, "grammar has no rules"),
        }
    }
}

impl std::error::Error for ComposeError {}

/// Resolve a module sequence (base first, extensions after, in declared
/// order) into a single grammar.
pub fn resolve(modules: &[GrammarModule]) -> Result<ResolvedGrammar, ComposeError> {
    let mut grammar = ResolvedGrammar {
        start: String::new(),
        rules: Vec::new(),
        terminals: Vec::new(),
        ignored: Vec::new(),
        rule_index: HashMap::new(),
        terminal_index: HashMap::new(),
    };
    // Where each rule was introduced, for reference-error reporting.
    let mut rule_origin: HashMap<String, (String, usize)> = HashMap::new();

    for module in modules {
        for item in &module.items {
            let error = |kind| ComposeError {
                module: module.name.clone(),
                line: item.line,
                kind,
            };

            match &item.kind {
                ItemKind::Rule(rule) => {
                    if grammar.rule_index.contains_key(&rule.name) {
                        return Err(error(ComposeErrorKind::DuplicateRule(rule.name.clone())));
                    }
                    rule_origin.insert(rule.name.clone(), (module.name.clone(), item.line));
                    grammar
                        .rule_index
                        .insert(rule.name.clone(), grammar.rules.len());
                    grammar.rules.push(rule.clone());
                }
                ItemKind::Terminal(def) => {
                    if grammar.terminal_index.contains_key(&def.name) {
                        return Err(error(ComposeErrorKind::DuplicateTerminal(def.name.clone())));
                    }
                    grammar
                        .terminal_index
                        .insert(def.name.clone(), grammar.terminals.len());
                    grammar.terminals.push(def.clone());
                }
                ItemKind::ExtendRule { name, alternatives } => {
                    match grammar.rule_index.get(name) {
                        Some(&index) => {
                            grammar.rules[index].alternatives.extend(alternatives.clone())
                        }
                        None => return Err(error(ComposeErrorKind::UnknownRule(name.clone()))),
                    }
                }
                ItemKind::OverrideRule { name, alternatives } => {
                    match grammar.rule_index.get(name) {
                        Some(&index) => grammar.rules[index].alternatives = alternatives.clone(),
                        None => return Err(error(ComposeErrorKind::UnknownRule(name.clone()))),
                    }
                }
                ItemKind::OverrideTerminal(def) => match grammar.terminal_index.get(&def.name) {
                    Some(&index) => grammar.terminals[index].pattern = def.pattern.clone(),
                    None => {
                        return Err(error(ComposeErrorKind::UnknownTerminal(def.name.clone())))
                    }
                },
                ItemKind::Ignore(name) => {
                    if !grammar.ignored.iter().any(|ignored| ignored == name) {
                        grammar.ignored.push(name.clone());
                    }
                }
                ItemKind::Import(name) => {
                    return Err(error(ComposeErrorKind::UnresolvedImport(name.clone())))
                }
            }
        }
    }

    let first_module = modules.first().map(|module| module.name.clone());
    if grammar.rules.is_empty() {
        return Err(ComposeError {
            module: first_module.unwrap_or_default(),
            line: 0,
            kind: ComposeErrorKind::EmptyGrammar,
        });
    }
    grammar.start = grammar.rules[0].name.clone();

    check_references(&grammar, &rule_origin)?;

    Ok(grammar)
}

/// Every symbol reference and every ignored name must exist.
fn check_references(
    grammar: &ResolvedGrammar,
    rule_origin: &HashMap<String, (String, usize)>,
) -> Result<(), ComposeError> {
    for rule in &grammar.rules {
        let (module, line) = rule_origin
            .get(&rule.name)
            .cloned()
            .unwrap_or_default();
        for alternative in &rule.alternatives {
            for symbol in alternative {
                match &symbol.kind {
                    SymbolKind::Rule(name) if grammar.rule(name).is_none() => {
                        return Err(ComposeError {
                            module: module.clone(),
                            line,
                            kind: ComposeErrorKind::UndefinedRuleReference {
                                rule: rule.name.clone(),
                                reference: name.clone(),
                            },
                        });
                    }
                    SymbolKind::Terminal(name) if grammar.terminal(name).is_none() => {
                        return Err(ComposeError {
                            module: module.clone(),
                            line,
                            kind: ComposeErrorKind::UndefinedTerminalReference {
                                rule: rule.name.clone(),
                                reference: name.clone(),
                            },
                        });
                    }
                    _ => {}
                }
            }
        }
    }

    for name in &grammar.ignored {
        if grammar.terminal(name).is_none() {
            return Err(ComposeError {
                module: String::new(),
                line: 0,
                kind: ComposeErrorKind::UnknownIgnoredTerminal(name.clone()),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::{Quantifier, Symbol};
    use crate::grammar::parse_module;

    const BASE: &str = "\
start: textline
     | common_line

textline: LINENO word+
common_line: AND word+
word: SIGN

LINENO: /[0-9]+'?\\./
AND: \"And\"
SIGN: /[a-zA-Z0-9'-]+/
WS: /[ \\t]+/
%ignore WS
";

    fn base() -> GrammarModule {
        parse_module("base", BASE).unwrap()
    }

    fn extension(source: &str) -> GrammarModule {
        parse_module("ext", source).unwrap()
    }

    fn extension2(source: &str) -> GrammarModule {
        parse_module("ext2", source).unwrap()
    }

    #[test]
    fn base_alone_resolves_unchanged() {
        let module = base();
        let grammar = resolve(std::slice::from_ref(&module)).unwrap();

        assert_eq!(grammar.start(), "start");
        assert_eq!(grammar.rules().len(), 4);
        assert_eq!(grammar.rule("textline").unwrap().alternatives.len(), 1);
        assert_eq!(grammar.terminals().len(), 4);
        assert_eq!(grammar.ignored(), &["WS".to_string()]);
    }

    #[test]
    fn extend_appends_alternatives() {
        let modules = vec![base(), extension("%extend word: LINENO")];
        let grammar = resolve(&modules).unwrap();

        let word = grammar.rule("word").unwrap();
        assert_eq!(
            word.alternatives,
            vec![
                vec![Symbol::terminal("SIGN")],
                vec![Symbol::terminal("LINENO")],
            ]
        );
    }

    #[test]
    fn override_replaces_all_alternatives() {
        let modules = vec![
            base(),
            extension("%extend word: AND"),
            extension2("%override word: LINENO"),
        ];
        let grammar = resolve(&modules).unwrap();

        let word = grammar.rule("word").unwrap();
        assert_eq!(word.alternatives, vec![vec![Symbol::terminal("LINENO")]]);
    }

    #[test]
    fn extend_after_override_appends_to_overridden_definition() {
        let modules = vec![
            base(),
            extension("%override word: LINENO"),
            extension2("%extend word: AND"),
        ];
        let grammar = resolve(&modules).unwrap();

        let word = grammar.rule("word").unwrap();
        assert_eq!(
            word.alternatives,
            vec![
                vec![Symbol::terminal("LINENO")],
                vec![Symbol::terminal("AND")],
            ]
        );
    }

    #[test]
    fn extensions_can_define_new_rules() {
        let modules = vec![
            base(),
            extension("%extend start: oracc_line\noracc_line: LINK word+\nLINK: \">>\""),
        ];
        let grammar = resolve(&modules).unwrap();

        assert_eq!(grammar.rule("start").unwrap().alternatives.len(), 3);
        assert_eq!(
            grammar.rule("oracc_line").unwrap().alternatives,
            vec![vec![
                Symbol::terminal("LINK"),
                Symbol::rule("word").with_quantifier(Quantifier::OneOrMore),
            ]]
        );
    }

    #[test]
    fn terminal_override_replaces_pattern() {
        let modules = vec![base(), extension("%override LINENO: /[0-9]+[a-z]?\\./")];
        let grammar = resolve(&modules).unwrap();

        assert_eq!(
            grammar.terminal("LINENO").unwrap().pattern,
            crate::grammar::ast::TerminalPattern::Regex("[0-9]+[a-z]?\\.".to_string()),
        );
    }

    #[test]
    fn extending_unknown_rule_fails() {
        let modules = vec![base(), extension("%extend ruling: SIGN")];
        let error = resolve(&modules).unwrap_err();

        assert_eq!(error.module, "ext");
        assert_eq!(
            error.kind,
            ComposeErrorKind::UnknownRule("ruling".to_string())
        );
    }

    #[test]
    fn overriding_unknown_rule_fails() {
        let modules = vec![base(), extension("%override ruling: SIGN")];
        let error = resolve(&modules).unwrap_err();

        assert_eq!(
            error.kind,
            ComposeErrorKind::UnknownRule("ruling".to_string())
        );
    }

    #[test]
    fn redefining_an_existing_rule_fails() {
        let modules = vec![base(), extension("word: LINENO")];
        let error = resolve(&modules).unwrap_err();

        assert_eq!(
            error.kind,
            ComposeErrorKind::DuplicateRule("word".to_string())
        );
    }

    #[test]
    fn undefined_references_are_rejected() {
        let module = parse_module("base", "start: missing_rule\n").unwrap();
        let error = resolve(std::slice::from_ref(&module)).unwrap_err();

        assert_eq!(
            error.kind,
            ComposeErrorKind::UndefinedRuleReference {
                rule: "start".to_string(),
                reference: "missing_rule".to_string(),
            }
        );
    }

    #[test]
    fn unresolved_import_is_an_error() {
        let module = parse_module("base", "%import common\nstart: SIGN\nSIGN: /x/\n").unwrap();
        let error = resolve(std::slice::from_ref(&module)).unwrap_err();

        assert_eq!(
            error.kind,
            ComposeErrorKind::UnresolvedImport("common".to_string())
        );
    }

    #[test]
    fn display_renders_grammar_listing() {
        let module = parse_module("base", "start: SIGN+\nSIGN: /[a-z]+/\nWS: / +/\n%ignore WS\n")
            .unwrap();
        let grammar = resolve(std::slice::from_ref(&module)).unwrap();

        assert_eq!(
            grammar.to_string(),
            "start: SIGN+\n\nSIGN: /[a-z]+/\nWS: / +/\n%ignore WS\n"
        );
    }
}
