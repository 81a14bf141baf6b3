//! Path source - Go packages on the local filesystem.
//!
//! Import paths are searched in the order the go command's classic search
//! path uses: `vendor/` directories of the importing tree, the enclosing
//! module, configured replacements, `GOPATH/src`, then `GOROOT/src`.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::core::strip_vendor;
use crate::sources::build::BuildContext;
use crate::sources::source::{majority_name, parse_package, LoadError, Source, SourcePackage};
use crate::syntax::parse_package_name;
use crate::util::LoaderConfig;

/// A Go module: the directory holding `go.mod` and its module path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub root: PathBuf,
    pub path: String,
}

/// A source for packages in directories on disk.
pub struct PathSource {
    config: LoaderConfig,
    build: BuildContext,

    /// Canonical import path -> directory, for every package located so far
    dirs: HashMap<String, PathBuf>,

    /// (requested path, importing package) -> (canonical path, directory)
    located: HashMap<(String, Option<String>), (String, PathBuf)>,
}

impl PathSource {
    /// Create a new path source.
    pub fn new(config: LoaderConfig) -> Self {
        let build = BuildContext::new(config.goos.clone(), config.goarch.clone());
        PathSource {
            config,
            build,
            dirs: HashMap::new(),
            located: HashMap::new(),
        }
    }

    /// Create a path source configured from the environment.
    pub fn from_env() -> Self {
        PathSource::new(LoaderConfig::from_env())
    }

    /// Requests starting with `.` or `/` name a directory rather than an
    /// import path.
    fn is_dir_request(path: &str) -> bool {
        path.starts_with('.') || path.starts_with('/') || Path::new(path).is_absolute()
    }

    /// Find the package directory and canonical path for a request.
    fn find(&mut self, path: &str, from: Option<&str>) -> Result<(String, PathBuf), LoadError> {
        if Self::is_dir_request(path) {
            let dir = PathBuf::from(path);
            if !dir.is_dir() {
                return Err(LoadError::NotFound {
                    path: path.to_string(),
                    searched: vec![dir],
                });
            }
            let dir = std::fs::canonicalize(&dir).unwrap_or(dir);
            let canonical = self.import_path_for_dir(&dir);
            debug!("directory {} is package {}", dir.display(), canonical);
            self.dirs.insert(canonical.clone(), dir.clone());
            return Ok((canonical, dir));
        }

        // A vendored canonical path names one directory; any other import
        // path may lead somewhere else for a different importer.
        if strip_vendor(path) != path {
            if let Some(dir) = self.dirs.get(path) {
                return Ok((path.to_string(), dir.clone()));
            }
        }

        let key = (path.to_string(), from.map(str::to_string));
        if let Some(found) = self.located.get(&key) {
            return Ok(found.clone());
        }

        let mut searched = Vec::new();
        for (candidate, vendored) in self.candidates(path, from) {
            trace!("looking for {} in {}", path, candidate.display());
            if !self.has_go_files(&candidate) {
                searched.push(candidate);
                continue;
            }
            let canonical = if vendored {
                let dir = std::fs::canonicalize(&candidate).unwrap_or_else(|_| candidate.clone());
                self.import_path_for_dir(&dir)
            } else {
                path.to_string()
            };
            debug!("{} resolves to {} in {}", path, canonical, candidate.display());
            self.dirs.insert(canonical.clone(), candidate.clone());
            self.located.insert(key, (canonical.clone(), candidate.clone()));
            return Ok((canonical, candidate));
        }

        Err(LoadError::NotFound {
            path: path.to_string(),
            searched,
        })
    }

    /// Candidate directories for an import path, in search order, each
    /// flagged when it lies in a `vendor/` directory.
    fn candidates(&self, path: &str, from: Option<&str>) -> Vec<(PathBuf, bool)> {
        let mut candidates = Vec::new();
        let rel = import_path_to_rel(path);

        let from_dir = from.and_then(|f| self.dirs.get(f));
        let module = from_dir
            .and_then(|d| find_module(d))
            .or_else(|| self.config.module_root.as_deref().and_then(read_module));

        if self.config.vendor {
            if let Some(dir) = from_dir {
                // Walk up to the module root (or filesystem root) looking
                // for vendor directories.
                for ancestor in dir.ancestors() {
                    candidates.push((ancestor.join("vendor").join(&rel), true));
                    let at_module_root = module.as_ref().is_some_and(|m| m.root == ancestor);
                    let at_gopath_src = self.config.gopath_src().is_some_and(|s| s == ancestor);
                    if at_module_root || at_gopath_src {
                        break;
                    }
                }
            } else if let Some(module) = &module {
                candidates.push((module.root.join("vendor").join(&rel), true));
            }
        }

        if let Some(module) = &module {
            if let Some(rest) = strip_path_prefix(path, &module.path) {
                candidates.push((module.root.join(import_path_to_rel(rest)), false));
            }
        }

        // Longest matching replacement wins.
        let replacement = self
            .config
            .replace
            .iter()
            .filter_map(|(prefix, dir)| strip_path_prefix(path, prefix).map(|rest| (prefix, dir, rest)))
            .max_by_key(|(prefix, _, _)| prefix.len());
        if let Some((_, dir, rest)) = replacement {
            candidates.push((dir.join(import_path_to_rel(rest)), false));
        }

        if let Some(src) = self.config.gopath_src() {
            candidates.push((src.join(&rel), false));
        }
        if let Some(src) = self.config.goroot_src() {
            candidates.push((src.join(&rel), false));
        }

        candidates
    }

    /// Canonical import path of a package directory.
    fn import_path_for_dir(&self, dir: &Path) -> String {
        let module = find_module(dir).or_else(|| {
            self.config
                .module_root
                .as_deref()
                .and_then(read_module)
                .filter(|m| dir.starts_with(&m.root))
        });
        if let Some(module) = module {
            if let Ok(rel) = dir.strip_prefix(&module.root) {
                return join_import_path(&module.path, rel);
            }
        }

        if let Some(src) = self.config.gopath_src() {
            let src = std::fs::canonicalize(&src).unwrap_or(src);
            if let Ok(rel) = dir.strip_prefix(&src) {
                return join_import_path("", rel);
            }
        }

        dir.display().to_string()
    }

    fn has_go_files(&self, dir: &Path) -> bool {
        dir.is_dir() && self.go_files(dir).is_ok_and(|files| !files.is_empty())
    }

    /// Buildable `.go` files directly in `dir`, sorted by name, with their
    /// contents.
    fn go_files(&self, dir: &Path) -> Result<Vec<(String, String)>, LoadError> {
        let mut files = Vec::new();
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry.map_err(|e| LoadError::Io {
                path: e.path().unwrap_or(dir).to_path_buf(),
                source: e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop")),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if !name.ends_with(".go")
                || name.ends_with("_test.go")
                || name.starts_with('.')
                || name.starts_with('_')
                || !self.build.matches_file_name(name)
            {
                continue;
            }
            let text = std::fs::read_to_string(entry.path()).map_err(|e| LoadError::Io {
                path: entry.path().to_path_buf(),
                source: e,
            })?;
            if !self.build.matches_source(&text) {
                trace!("skipping {} (build constraints)", entry.path().display());
                continue;
            }
            files.push((name.to_string(), text));
        }
        Ok(files)
    }
}

impl Source for PathSource {
    fn name(&self) -> &str {
        "path"
    }

    fn locate(&mut self, path: &str, from: Option<&str>) -> Result<String, LoadError> {
        self.find(path, from).map(|(canonical, _)| canonical)
    }

    fn load_package(
        &mut self,
        path: &str,
        from: Option<&str>,
    ) -> Result<SourcePackage, LoadError> {
        let (canonical, dir) = self.find(path, from)?;
        let files = self.go_files(&dir)?;
        if files.is_empty() {
            return Err(LoadError::NoPackage { path: canonical });
        }
        debug!(
            "parsing {} files of {} in {}",
            files.len(),
            canonical,
            dir.display()
        );
        parse_package(&canonical, Some(dir), files)
    }

    fn package_name(&mut self, path: &str, from: Option<&str>) -> Result<String, LoadError> {
        let (canonical, dir) = self.find(path, from)?;
        let files = self.go_files(&dir)?;
        // Files with a broken package clause don't vote; a full load
        // reports them.
        let names: Vec<String> = files
            .iter()
            .filter_map(|(_, text)| parse_package_name(text).ok())
            .collect();
        majority_name(names.iter().map(String::as_str))
            .ok_or(LoadError::NoPackage { path: canonical })
    }
}

fn module_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^\s*module\s+"?([^\s"]+)"?"#).expect("module directive regex is valid")
    })
}

/// Read the module path from `<root>/go.mod`.
pub fn read_module(root: &Path) -> Option<Module> {
    let text = std::fs::read_to_string(root.join("go.mod")).ok()?;
    let caps = module_regex().captures(&text)?;
    Some(Module {
        root: root.to_path_buf(),
        path: caps[1].to_string(),
    })
}

/// Find the module enclosing `dir`.
pub fn find_module(dir: &Path) -> Option<Module> {
    dir.ancestors().find_map(read_module)
}

/// The remainder of `path` after an import path prefix, matching whole
/// segments only.
fn strip_path_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    if path == prefix {
        return Some("");
    }
    path.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('/'))
}

fn import_path_to_rel(path: &str) -> PathBuf {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn join_import_path(base: &str, rel: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    if !base.is_empty() {
        parts.push(base.to_string());
    }
    for component in rel.components() {
        if let Component::Normal(part) = component {
            parts.push(part.to_string_lossy().into_owned());
        }
    }
    parts.join("/")
}
