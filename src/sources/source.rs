//! Source trait - common interface for all package sources.

#![allow(unused_assignments)] // False positives from thiserror derive

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::syntax::{parse_file, SourceFile};
use crate::util::diagnostic::{format_all, Diagnostic};

/// A source of parsed Go packages.
///
/// `from` is the canonical path of the importing package, when the request
/// comes from an import clause. Sources that support `vendor/` directories
/// use it to pick the right copy.
pub trait Source {
    /// Get the source name for display.
    fn name(&self) -> &str;

    /// Resolve a request to the package's canonical import path.
    fn locate(&mut self, path: &str, from: Option<&str>) -> Result<String, LoadError>;

    /// Load and parse a package. The import graph is left empty; it is
    /// filled in by [`SourceCache`](super::SourceCache).
    fn load_package(&mut self, path: &str, from: Option<&str>)
        -> Result<SourcePackage, LoadError>;

    /// Read the package's declared name without parsing whole files.
    fn package_name(&mut self, path: &str, from: Option<&str>) -> Result<String, LoadError>;
}

/// Where an import of a package leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedPackage {
    /// Canonical import path
    pub path: String,
    /// Name from the package clause
    pub name: String,
}

/// A loaded, parsed package.
#[derive(Debug, Clone)]
pub struct SourcePackage {
    /// Canonical import path
    pub path: String,

    /// Name from the package clause
    pub name: String,

    /// Directory the files were read from, if on disk
    pub dir: Option<PathBuf>,

    /// Parsed files, sorted by file name
    pub files: Vec<SourceFile>,

    /// Import path as written in a file -> imported package
    pub imports: BTreeMap<String, ImportedPackage>,
}

impl SourcePackage {
    /// Look up an import by the path written in an import clause.
    pub fn imported(&self, path: &str) -> Option<&ImportedPackage> {
        self.imports.get(path)
    }

    /// Distinct import paths written in any file, in file order.
    pub fn import_paths(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for spec in self.files.iter().flat_map(|f| &f.imports) {
            if !seen.contains(&spec.path.as_str()) {
                seen.push(spec.path.as_str());
            }
        }
        seen
    }
}

/// Errors from loading packages.
#[derive(Error, Debug, MietteDiagnostic)]
pub enum LoadError {
    #[error("cannot find package `{path}`")]
    #[diagnostic(
        code(ifacegen::load::not_found),
        help("check GOPATH, GOROOT, and the `replace` table of the loader config")
    )]
    NotFound { path: String, searched: Vec<PathBuf> },

    #[error("failed to read `{}`", .path.display())]
    #[diagnostic(code(ifacegen::load::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("package `{path}` has errors:\n{}", format_all(.diagnostics))]
    #[diagnostic(code(ifacegen::load::diagnostics))]
    Diagnostics {
        path: String,
        diagnostics: Vec<Diagnostic>,
    },

    #[error("no buildable Go source files in `{path}`")]
    #[diagnostic(code(ifacegen::load::no_package))]
    NoPackage { path: String },

    #[error("package loading was cancelled")]
    #[diagnostic(code(ifacegen::load::cancelled))]
    Cancelled,

    #[error("deadline exceeded while loading packages")]
    #[diagnostic(code(ifacegen::load::deadline))]
    DeadlineExceeded,
}

impl LoadError {
    /// Check if the package could not be found at all.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound { .. } | LoadError::NoPackage { .. })
    }
}

/// Parse the files of one package.
///
/// Every syntax error in every file is collected into one
/// [`LoadError::Diagnostics`]. Files whose package clause differs from the
/// majority are dropped.
pub(crate) fn parse_package(
    path: &str,
    dir: Option<PathBuf>,
    mut files: Vec<(String, String)>,
) -> Result<SourcePackage, LoadError> {
    if files.is_empty() {
        return Err(LoadError::NoPackage {
            path: path.to_string(),
        });
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));

    let mut parsed = Vec::with_capacity(files.len());
    let mut diagnostics = Vec::new();
    for (name, text) in &files {
        match parse_file(name, text) {
            Ok(file) => parsed.push(file),
            Err(errors) => {
                let location = dir.as_ref().map_or_else(|| PathBuf::from(name), |d| d.join(name));
                diagnostics.extend(
                    errors
                        .iter()
                        .map(|e| Diagnostic::from_syntax(&location, text, e)),
                );
            }
        }
    }
    if !diagnostics.is_empty() {
        return Err(LoadError::Diagnostics {
            path: path.to_string(),
            diagnostics,
        });
    }

    let name = majority_name(parsed.iter().map(|f| f.package.as_str())).ok_or_else(|| {
        LoadError::NoPackage {
            path: path.to_string(),
        }
    })?;
    parsed.retain(|f| f.package == name);

    Ok(SourcePackage {
        path: path.to_string(),
        name,
        dir,
        files: parsed,
        imports: BTreeMap::new(),
    })
}

/// The most common package name; ties go to the earliest.
pub(crate) fn majority_name<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (i, name) in names.into_iter().enumerate() {
        counts.entry(name).or_insert((0, i)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1)))
        .map(|(name, _)| name.to_string())
}

/// Guess a package's name from its import path.
///
/// Only used when the package cannot be located: takes the last path
/// segment, skipping a `vN` major version suffix, cut at the first `.`,
/// with `-` mapped to `_`.
pub fn guess_package_name(path: &str) -> String {
    let mut segments = path.rsplit('/').filter(|s| !s.is_empty());
    let mut last = segments.next().unwrap_or(path);
    if is_major_version(last) {
        if let Some(prev) = segments.next() {
            last = prev;
        }
    }
    let base = last.split('.').next().unwrap_or(last);
    base.replace('-', "_")
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_package_name() {
        assert_eq!(guess_package_name("io"), "io");
        assert_eq!(guess_package_name("net/http"), "http");
        assert_eq!(guess_package_name("github.com/spf13/pflag"), "pflag");
        assert_eq!(guess_package_name("gopkg.in/yaml.v3"), "yaml");
        assert_eq!(guess_package_name("github.com/go-kit/kit/v2"), "kit");
        assert_eq!(guess_package_name("example.com/go-foo"), "go_foo");
    }

    #[test]
    fn test_majority_name() {
        assert_eq!(
            majority_name(["happy", "main", "happy"]),
            Some("happy".to_string())
        );
        assert_eq!(majority_name(["b", "a"]), Some("b".to_string()));
        assert_eq!(majority_name(Vec::<&str>::new()), None);
    }

    #[test]
    fn test_parse_package_collects_all_diagnostics() {
        let files = vec![
            ("b.go".to_string(), "package p\ntype B interface { F( }\n".to_string()),
            ("a.go".to_string(), "type A int\n".to_string()),
            ("c.go".to_string(), "package p\n".to_string()),
        ];
        let err = parse_package("example.com/p", None, files).unwrap_err();
        match err {
            LoadError::Diagnostics { diagnostics, .. } => assert_eq!(diagnostics.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_package_sorts_and_filters() {
        let files = vec![
            ("b.go".to_string(), "package p\ntype B int\n".to_string()),
            ("gen.go".to_string(), "package main\n".to_string()),
            ("a.go".to_string(), "package p\ntype A int\n".to_string()),
        ];
        let pkg = parse_package("example.com/p", None, files).unwrap();
        assert_eq!(pkg.name, "p");
        let names: Vec<_> = pkg.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.go", "b.go"]);
    }
}
