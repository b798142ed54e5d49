//! Flavor manifest
//!
//! `flavors.yaml` in the grammar directory declares the known flavors:
//!
//! ```text
//! flavors:
//!   ebl:
//!     base: ebl
//!   oracc:
//!     base: common
//!     extensions: [oracc]
//! ```
//!
//! Extension order in the manifest is the order the resolver applies them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Default manifest file name inside a grammar directory.
pub const MANIFEST_FILE: &str = "flavors.yaml";

/// One flavor: a base module plus ordered extension modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorSpec {
    pub base: String,
    #[serde(default)]
    pub extensions: Vec<String>,
}

/// The manifest of all declared flavors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorManifest {
    pub flavors: BTreeMap<String, FlavorSpec>,
}

#[derive(Debug)]
pub enum ManifestError {
    Io(io::Error),
    Yaml(serde_yaml::Error),
    UnknownFlavor(String),
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestError::Io(error) => write!(f, "failed to read manifest: {error}"),
            ManifestError::Yaml(error) => write!(f, "invalid manifest: {error}"),
            ManifestError::UnknownFlavor(name) => write!(f, "unknown flavor `{name}`"),
        }
    }
}

impl std::error::Error for ManifestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ManifestError::Io(error) => Some(error),
            ManifestError::Yaml(error) => Some(error),
            ManifestError::UnknownFlavor(_) => None,
        }
    }
}

impl FlavorManifest {
    pub fn parse(source: &str) -> Result<Self, ManifestError> {
        serde_yaml::from_str(source).map_err(ManifestError::Yaml)
    }

    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let source = fs::read_to_string(path).map_err(ManifestError::Io)?;
        Self::parse(&source)
    }

    pub fn flavor(&self, name: &str) -> Result<&FlavorSpec, ManifestError> {
        self.flavors
            .get(name)
            .ok_or_else(|| ManifestError::UnknownFlavor(name.to_string()))
    }

    /// Flavor names in stable (sorted) order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.flavors.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = "\
flavors:
  ebl:
    base: ebl
  oracc:
    base: common
    extensions: [oracc]
";

    #[test]
    fn parses_flavor_specs() {
        let manifest = FlavorManifest::parse(MANIFEST).unwrap();

        assert_eq!(
            manifest.flavor("ebl").unwrap(),
            &FlavorSpec {
                base: "ebl".to_string(),
                extensions: vec![],
            }
        );
        assert_eq!(
            manifest.flavor("oracc").unwrap(),
            &FlavorSpec {
                base: "common".to_string(),
                extensions: vec!["oracc".to_string()],
            }
        );
    }

    #[test]
    fn names_are_sorted() {
        let manifest = FlavorManifest::parse(MANIFEST).unwrap();
        let names: Vec<_> = manifest.names().collect();
        assert_eq!(names, vec!["ebl", "oracc"]);
    }

    #[test]
    fn unknown_flavor_is_an_error() {
        let manifest = FlavorManifest::parse(MANIFEST).unwrap();
        let error = manifest.flavor("cdli").unwrap_err();
        assert_eq!(error.to_string(), "unknown flavor `cdli`");
    }

    #[test]
    fn extension_order_is_preserved() {
        let manifest = FlavorManifest::parse(
            "flavors:\n  all:\n    base: common\n    extensions: [oracc, cdli, ebl]\n",
        )
        .unwrap();
        assert_eq!(
            manifest.flavor("all").unwrap().extensions,
            vec!["oracc", "cdli", "ebl"]
        );
    }
}
