//! Flavor composition
//!
//! A flavor of the format is declared as a base grammar module plus an
//! ordered list of extension modules. [`loader`] brings modules and their
//! `%import` closures in from a grammar directory, [`manifest`] reads the
//! flavor declarations from `flavors.yaml`, and [`resolver`] merges the
//! module sequence into a single [`ResolvedGrammar`] with no unresolved
//! references.

pub mod loader;
pub mod manifest;
pub mod resolver;

pub use loader::{LoadError, ModuleLoader};
pub use manifest::{FlavorManifest, FlavorSpec, ManifestError};
pub use resolver::{resolve, ComposeError, ComposeErrorKind, ResolvedGrammar};
