//! The output aggregate handed to downstream consumers.

use std::collections::HashSet;
use std::fmt;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::interface::Interface;

/// Alias under which the source package is imported when output is rendered
/// into a different package.
pub const SOURCE_ALIAS: &str = "srcPkgAlias";

/// The importable form of a canonical path: a package found in a `vendor/`
/// directory is imported by the path below the innermost `vendor`.
pub fn strip_vendor(path: &str) -> &str {
    if let Some(i) = path.rfind("/vendor/") {
        return &path[i + "/vendor/".len()..];
    }
    path.strip_prefix("vendor/").unwrap_or(path)
}

/// A package referenced by the rendered output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Import {
    /// Name the package is referred to by in the output
    pub package: String,

    /// Canonical import path
    pub path: String,
}

impl Import {
    /// Create a new import. A vendored canonical path is recorded as the
    /// path code imports it by.
    pub fn new(package: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        Import {
            package: package.into(),
            path: strip_vendor(&path).to_string(),
        }
    }

    /// Check if the display name differs from the last path segment, which
    /// means the output must spell the alias out in its import block.
    pub fn is_aliased(&self) -> bool {
        self.path.rsplit('/').next() != Some(self.package.as_str())
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_aliased() {
            write!(f, "{} \"{}\"", self.package, self.path)
        } else {
            write!(f, "\"{}\"", self.path)
        }
    }
}

/// Remove imports whose canonical path was already seen, keeping the first.
pub fn dedup_imports(imports: impl IntoIterator<Item = Import>) -> Vec<Import> {
    let mut seen = HashSet::new();
    imports
        .into_iter()
        .filter(|imp| seen.insert(imp.path.clone()))
        .collect()
}

/// Resolved interfaces plus everything needed to render them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Package {
    /// Name of the output package
    pub name: String,

    /// Import of the source package, when output lives outside it
    pub source: Option<Import>,

    /// Interfaces in request order
    pub interfaces: Vec<Interface>,

    /// Packages referenced by the interfaces
    pub imports: Vec<Import>,

    /// `imports` plus the source package import
    pub imports_with_source: Vec<Import>,
}

impl Package {
    /// Look up an interface by name.
    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    /// Serialize the package for a template engine.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize package model")
    }
}
