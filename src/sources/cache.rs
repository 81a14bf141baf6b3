//! Source cache management.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::sources::source::{guess_package_name, ImportedPackage, LoadError, Source, SourcePackage};
use crate::util::Cancellation;

/// Caches loaded packages and declared package names for one source.
///
/// Packages are cached by canonical path and by every request that led to
/// them. A cache is borrowed mutably for the duration of a load call; give
/// each concurrent call its own cache.
pub struct SourceCache {
    source: Box<dyn Source>,

    /// Loaded packages by canonical path
    packages: HashMap<String, Arc<SourcePackage>>,

    /// (requested path, importing package) -> canonical path
    requests: HashMap<(String, Option<String>), String>,

    /// Declared package names by requested path
    names: HashMap<String, String>,
}

impl SourceCache {
    /// Create a new source cache.
    pub fn new(source: impl Source + 'static) -> Self {
        SourceCache {
            source: Box::new(source),
            packages: HashMap::new(),
            requests: HashMap::new(),
            names: HashMap::new(),
        }
    }

    /// Check if a package is cached under its canonical path.
    pub fn is_cached(&self, path: &str) -> bool {
        self.packages.contains_key(path)
    }

    /// Number of packages loaded so far.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Load a package, with its import graph filled in.
    pub fn load(
        &mut self,
        cancel: &Cancellation,
        path: &str,
        from: Option<&str>,
    ) -> Result<Arc<SourcePackage>, LoadError> {
        let key = (path.to_string(), from.map(str::to_string));
        if let Some(pkg) = self.requests.get(&key).and_then(|c| self.packages.get(c)) {
            return Ok(Arc::clone(pkg));
        }

        cancel.check()?;
        // The same import path can lead to different packages for
        // different importers, so the lookup goes through the source.
        let canonical = self.source.locate(path, from)?;
        if let Some(existing) = self.packages.get(&canonical) {
            let existing = Arc::clone(existing);
            self.requests.insert(key, canonical);
            return Ok(existing);
        }

        debug!("loading package {} from {} source", path, self.source.name());
        let mut pkg = self.source.load_package(path, from)?;

        self.fill_imports(cancel, &mut pkg)?;
        debug!(
            "loaded package {} ({}): {} files, {} imports",
            pkg.path,
            pkg.name,
            pkg.files.len(),
            pkg.imports.len()
        );

        self.names.insert(pkg.path.clone(), pkg.name.clone());
        let pkg = Arc::new(pkg);
        self.requests.insert(key, pkg.path.clone());
        self.packages.insert(pkg.path.clone(), Arc::clone(&pkg));
        Ok(pkg)
    }

    /// Declared name of a package, read from its package clause.
    ///
    /// A package that cannot be found gets a name guessed from its path.
    pub fn package_name(
        &mut self,
        cancel: &Cancellation,
        path: &str,
        from: Option<&str>,
    ) -> Result<String, LoadError> {
        cancel.check()?;
        let canonical = match self.source.locate(path, from) {
            Ok(canonical) => canonical,
            Err(e) if e.is_not_found() => return Ok(Self::guess_name(&e, path)),
            Err(e) => return Err(e),
        };
        if let Some(name) = self.names.get(&canonical) {
            return Ok(name.clone());
        }

        let name = match self.source.package_name(path, from) {
            Ok(name) => name,
            Err(e) if e.is_not_found() => return Ok(Self::guess_name(&e, path)),
            Err(e) => return Err(e),
        };
        self.names.insert(canonical, name.clone());
        Ok(name)
    }

    fn guess_name(err: &LoadError, path: &str) -> String {
        let guess = guess_package_name(path);
        warn!("{}; assuming package name `{}`", err, guess);
        guess
    }

    /// Resolve every import written in the package's files.
    fn fill_imports(
        &mut self,
        cancel: &Cancellation,
        pkg: &mut SourcePackage,
    ) -> Result<(), LoadError> {
        let paths: Vec<String> = pkg.import_paths().into_iter().map(str::to_string).collect();
        for written in paths {
            // cgo pseudo-package
            if written == "C" {
                continue;
            }
            let canonical = match self.source.locate(&written, Some(&pkg.path)) {
                Ok(canonical) => canonical,
                Err(e) if e.is_not_found() => written.clone(),
                Err(e) => return Err(e),
            };
            let name = self.package_name(cancel, &written, Some(&pkg.path))?;
            pkg.imports.insert(
                written,
                ImportedPackage {
                    path: canonical,
                    name,
                },
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MemorySource;

    fn source() -> MemorySource {
        MemorySource::new()
            .with_package(
                "example.com/app",
                &[(
                    "app.go",
                    "package app\n\nimport (\n\t\"io\"\n\tyaml \"gopkg.in/yaml.v3\"\n\t\"example.com/go-lib\"\n)\n",
                )],
            )
            .with_package("io", &[("io.go", "package io\n")])
            .with_package("example.com/go-lib", &[("lib.go", "package lib\n")])
    }

    #[test]
    fn test_load_fills_import_graph() {
        let mut cache = SourceCache::new(source());
        let cancel = Cancellation::new();
        let pkg = cache.load(&cancel, "example.com/app", None).unwrap();

        assert_eq!(pkg.imported("io").unwrap().name, "io");
        // Declared name, not the path's last segment.
        assert_eq!(pkg.imported("example.com/go-lib").unwrap().name, "lib");
        // Not registered: falls back to the guess.
        assert_eq!(pkg.imported("gopkg.in/yaml.v3").unwrap().name, "yaml");
    }

    #[test]
    fn test_load_is_cached() {
        let mut cache = SourceCache::new(source());
        let cancel = Cancellation::new();
        let first = cache.load(&cancel, "io", None).unwrap();
        let second = cache.load(&cancel, "io", Some("example.com/app")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // A cancelled token only stops requests not seen before.
        cancel.cancel();
        let again = cache.load(&cancel, "io", Some("example.com/app")).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert!(matches!(
            cache.load(&cancel, "example.com/go-lib", None),
            Err(LoadError::Cancelled)
        ));
    }

    #[test]
    fn test_load_missing_package() {
        let mut cache = SourceCache::new(source());
        let err = cache
            .load(&Cancellation::new(), "example.com/missing", None)
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(cache.is_empty());
    }
}
