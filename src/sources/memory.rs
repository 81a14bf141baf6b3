//! In-memory source - packages registered as source text.

use std::collections::BTreeMap;

use crate::sources::source::{majority_name, parse_package, LoadError, Source, SourcePackage};
use crate::syntax::parse_package_name;

/// A source serving packages from memory, keyed by import path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    packages: BTreeMap<String, BTreeMap<String, String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package from `(file name, contents)` pairs.
    pub fn with_package(mut self, path: &str, files: &[(&str, &str)]) -> Self {
        for (name, text) in files {
            self.add_file(path, name, text);
        }
        self
    }

    /// Add one file to a package, creating the package if needed.
    pub fn add_file(&mut self, path: &str, name: &str, text: &str) {
        self.packages
            .entry(path.to_string())
            .or_default()
            .insert(name.to_string(), text.to_string());
    }

    /// Check if a package is registered.
    pub fn contains(&self, path: &str) -> bool {
        self.packages.contains_key(path)
    }

    fn files(&self, path: &str) -> Result<Vec<(String, String)>, LoadError> {
        let files = self
            .packages
            .get(path)
            .ok_or_else(|| LoadError::NotFound {
                path: path.to_string(),
                searched: Vec::new(),
            })?;
        Ok(files
            .iter()
            .filter(|(name, _)| name.ends_with(".go") && !name.ends_with("_test.go"))
            .map(|(name, text)| (name.clone(), text.clone()))
            .collect())
    }
}

impl Source for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn locate(&mut self, path: &str, _from: Option<&str>) -> Result<String, LoadError> {
        if self.contains(path) {
            Ok(path.to_string())
        } else {
            Err(LoadError::NotFound {
                path: path.to_string(),
                searched: Vec::new(),
            })
        }
    }

    fn load_package(
        &mut self,
        path: &str,
        _from: Option<&str>,
    ) -> Result<SourcePackage, LoadError> {
        let files = self.files(path)?;
        parse_package(path, None, files)
    }

    fn package_name(&mut self, path: &str, _from: Option<&str>) -> Result<String, LoadError> {
        let files = self.files(path)?;
        let names: Vec<String> = files
            .iter()
            .filter_map(|(_, text)| parse_package_name(text).ok())
            .collect();
        majority_name(names.iter().map(String::as_str)).ok_or_else(|| LoadError::NoPackage {
            path: path.to_string(),
        })
    }
}
