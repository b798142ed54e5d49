//! Grammar module loading
//!
//! Modules live as `<name>.atfg` files in a grammar directory. Loading a
//! module pulls in its `%import` closure depth-first: imports land ahead of
//! the importing module in the returned sequence, each module is loaded at
//! most once per flavor, and import cycles are reported with the cycle
//! path. `%import` items are stripped from the returned modules, so the
//! sequence feeds straight into [`resolve`](crate::composing::resolve).

use crate::composing::manifest::FlavorSpec;
use crate::grammar::ast::{GrammarModule, ItemKind};
use crate::grammar::parser::{parse_module, SyntaxError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

/// File extension of grammar modules.
pub const MODULE_EXTENSION: &str = "atfg";

/// Module names are plain identifiers; anything else (separators, dots)
/// could escape the grammar directory when joined into a path.
static MODULE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new("^[a-z_][a-z0-9_]*$").unwrap());

#[derive(Debug)]
pub enum LoadError {
    /// A module name that is not a plain identifier.
    InvalidModuleName(String),
    ModuleNotFound { module: String, path: PathBuf },
    Io { module: String, error: io::Error },
    Syntax(Vec<SyntaxError>),
    /// Modules that import each other, in import order, first repeated last.
    ImportCycle(Vec<String>),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::InvalidModuleName(name) => {
                write!(f, "invalid module name `{name}`")
            }
            LoadError::ModuleNotFound { module, path } => {
                write!(f, "module `{module}` not found at {}", path.display())
            }
            LoadError::Io { module, error } => {
                write!(f, "failed to read module `{module}`: {error}")
            }
            LoadError::Syntax(errors) => {
                write!(f, "{}", errors[0])?;
                for error in &errors[1..] {
                    write!(f, "\n{error}")?;
                }
                Ok(())
            }
            LoadError::ImportCycle(path) => {
                write!(f, "import cycle: {}", path.join(" -> "))
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Loads grammar modules from a directory.
pub struct ModuleLoader {
    root: PathBuf,
}

impl ModuleLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ModuleLoader { root: root.into() }
    }

    /// Path a module name resolves to.
    pub fn module_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{MODULE_EXTENSION}"))
    }

    /// Load and parse a single module file, imports left in place.
    pub fn load_module(&self, name: &str) -> Result<GrammarModule, LoadError> {
        if !MODULE_NAME.is_match(name) {
            return Err(LoadError::InvalidModuleName(name.to_string()));
        }
        let path = self.module_path(name);
        let source = fs::read_to_string(&path).map_err(|error| {
            if error.kind() == io::ErrorKind::NotFound {
                LoadError::ModuleNotFound {
                    module: name.to_string(),
                    path: path.clone(),
                }
            } else {
                LoadError::Io {
                    module: name.to_string(),
                    error,
                }
            }
        })?;
        parse_module(name, &source).map_err(LoadError::Syntax)
    }

    /// Load a module with its import closure, imports first.
    pub fn load_closure(&self, name: &str) -> Result<Vec<GrammarModule>, LoadError> {
        let mut loaded = HashSet::new();
        let mut modules = Vec::new();
        self.visit(name, &mut loaded, &mut Vec::new(), &mut modules)?;
        Ok(modules)
    }

    /// Load a flavor's whole module sequence: the base closure, then each
    /// extension's closure in declared order. A module shared between the
    /// base and an extension is loaded once.
    pub fn load_flavor(&self, spec: &FlavorSpec) -> Result<Vec<GrammarModule>, LoadError> {
        let mut loaded = HashSet::new();
        let mut modules = Vec::new();
        self.visit(&spec.base, &mut loaded, &mut Vec::new(), &mut modules)?;
        for extension in &spec.extensions {
            self.visit(extension, &mut loaded, &mut Vec::new(), &mut modules)?;
        }
        Ok(modules)
    }

    fn visit(
        &self,
        name: &str,
        loaded: &mut HashSet<String>,
        stack: &mut Vec<String>,
        modules: &mut Vec<GrammarModule>,
    ) -> Result<(), LoadError> {
        if loaded.contains(name) {
            return Ok(());
        }
        if let Some(position) = stack.iter().position(|entry| entry == name) {
            let mut cycle = stack[position..].to_vec();
            cycle.push(name.to_string());
            return Err(LoadError::ImportCycle(cycle));
        }

        stack.push(name.to_string());
        let module = self.load_module(name)?;
        let imports: Vec<String> = module.imports().map(str::to_string).collect();
        for import in &imports {
            self.visit(import, loaded, stack, modules)?;
        }
        stack.pop();

        loaded.insert(name.to_string());
        modules.push(strip_imports(module));
        Ok(())
    }
}

/// Drop `%import` items; the closure walk has already honored them.
fn strip_imports(mut module: GrammarModule) -> GrammarModule {
    module
        .items
        .retain(|item| !matches!(item.kind, ItemKind::Import(_)));
    module
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn module_path_appends_extension() {
        let loader = ModuleLoader::new("grammars");
        assert_eq!(
            loader.module_path("common"),
            Path::new("grammars").join("common.atfg")
        );
    }

    #[test]
    fn missing_module_is_reported_by_name() {
        let loader = ModuleLoader::new("grammars");
        match loader.load_module("no_such_module") {
            Err(LoadError::ModuleNotFound { module, .. }) => {
                assert_eq!(module, "no_such_module")
            }
            other => panic!("expected ModuleNotFound, got {other:?}"),
        }
    }

    #[test]
    fn path_escaping_module_names_are_rejected() {
        let loader = ModuleLoader::new("grammars");
        match loader.load_module("../secrets") {
            Err(LoadError::InvalidModuleName(name)) => assert_eq!(name, "../secrets"),
            other => panic!("expected InvalidModuleName, got {other:?}"),
        }
    }

    #[test]
    fn strip_imports_keeps_other_items() {
        let module = parse_module("m", "%import common\nword: SIGN\nSIGN: /x/\n").unwrap();
        let stripped = strip_imports(module);
        assert_eq!(stripped.items.len(), 2);
        assert!(stripped.imports().next().is_none());
    }
}
