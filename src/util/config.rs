//! Loader configuration.
//!
//! The filesystem source searches the same places the Go toolchain's
//! classic search path does. Settings come from the environment
//! (`GOPATH`, `GOROOT`, `GOOS`, `GOARCH`) or from a TOML file:
//!
//! ```toml
//! gopath = "/home/me/go"
//! goroot = "/usr/local/go"
//! goos = "linux"
//! goarch = "amd64"
//! module_root = "/work/project"
//! vendor = true
//!
//! [replace]
//! "github.com/example/dep" = "../dep"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Settings for locating Go packages on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// GOPATH workspace root; packages live under `<gopath>/src`
    pub gopath: Option<PathBuf>,

    /// Go installation root; the standard library lives under `<goroot>/src`
    pub goroot: Option<PathBuf>,

    /// Target operating system for filename build constraints
    pub goos: String,

    /// Target architecture for filename build constraints
    pub goarch: String,

    /// Directory containing `go.mod`, when not discoverable from the
    /// requested package directory
    pub module_root: Option<PathBuf>,

    /// Whether `vendor/` directories are searched
    pub vendor: bool,

    /// Import path prefix to directory overrides, like `replace` in go.mod
    pub replace: BTreeMap<String, PathBuf>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            gopath: None,
            goroot: None,
            goos: host_goos().to_string(),
            goarch: host_goarch().to_string(),
            module_root: None,
            vendor: true,
            replace: BTreeMap::new(),
        }
    }
}

impl LoaderConfig {
    /// Build a configuration from the process environment.
    ///
    /// `GOPATH` defaults to `~/go`, as the go command does.
    pub fn from_env() -> Self {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());

        let gopath = env("GOPATH")
            .map(|p| {
                // Only the first entry of a list is searched.
                std::env::split_paths(&p)
                    .next()
                    .unwrap_or_else(|| PathBuf::from(&p))
            })
            .or_else(default_gopath);

        LoaderConfig {
            gopath,
            goroot: env("GOROOT").map(PathBuf::from),
            goos: env("GOOS").unwrap_or_else(|| host_goos().to_string()),
            goarch: env("GOARCH").unwrap_or_else(|| host_goarch().to_string()),
            ..LoaderConfig::default()
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read loader config: {}", path.display()))?;

        let mut config: LoaderConfig = toml::from_str(&contents)
            .with_context(|| format!("failed to parse loader config: {}", path.display()))?;

        // Relative replace targets are relative to the config file.
        if let Some(base) = path.parent() {
            for dir in config.replace.values_mut() {
                if dir.is_relative() {
                    *dir = base.join(&*dir);
                }
            }
        }

        Ok(config)
    }

    /// Load configuration, falling back to the environment if the file
    /// doesn't exist or can't be read.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!(
                    "Failed to load loader config from {}: {:#}",
                    path.display(),
                    e
                );
                Self::from_env()
            })
        } else {
            Self::from_env()
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory: {}", parent.display())
            })?;
        }

        let contents =
            toml::to_string_pretty(self).with_context(|| "failed to serialize loader config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("failed to write loader config: {}", path.display()))?;

        Ok(())
    }

    /// `<gopath>/src`, if a GOPATH is configured.
    pub fn gopath_src(&self) -> Option<PathBuf> {
        self.gopath.as_ref().map(|p| p.join("src"))
    }

    /// `<goroot>/src`, if a GOROOT is configured.
    pub fn goroot_src(&self) -> Option<PathBuf> {
        self.goroot.as_ref().map(|p| p.join("src"))
    }
}

/// `~/go`, the go command's default GOPATH.
pub fn default_gopath() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join("go"))
}

/// GOOS value for the host.
pub fn host_goos() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

/// GOARCH value for the host.
pub fn host_goarch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = LoaderConfig::default();
        assert!(config.vendor);
        assert!(config.replace.is_empty());
        assert!(!config.goos.is_empty());
        assert!(!config.goarch.is_empty());
    }

    #[test]
    fn test_config_parse() {
        let toml = r#"
gopath = "/opt/go"
goos = "windows"
vendor = false

[replace]
"github.com/example/dep" = "/work/dep"
"#;

        let config: LoaderConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.gopath, Some(PathBuf::from("/opt/go")));
        assert_eq!(config.goos, "windows");
        assert!(!config.vendor);
        assert_eq!(
            config.replace.get("github.com/example/dep"),
            Some(&PathBuf::from("/work/dep"))
        );
        assert_eq!(config.gopath_src(), Some(PathBuf::from("/opt/go/src")));
    }

    #[test]
    fn test_config_load_resolves_relative_replace() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("loader.toml");
        std::fs::write(&path, "[replace]\n\"example.com/dep\" = \"dep\"\n").unwrap();

        let config = LoaderConfig::load(&path).unwrap();
        assert_eq!(
            config.replace.get("example.com/dep"),
            Some(&tmp.path().join("dep"))
        );
    }

    #[test]
    fn test_config_save_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("loader.toml");

        let mut config = LoaderConfig::default();
        config.goroot = Some(PathBuf::from("/usr/local/go"));
        config.save(&path).unwrap();

        let loaded = LoaderConfig::load(&path).unwrap();
        assert_eq!(loaded.goroot, Some(PathBuf::from("/usr/local/go")));
    }

    #[test]
    fn test_config_load_invalid() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("loader.toml");
        std::fs::write(&path, "vendor = \"maybe\"").unwrap();

        let err = LoaderConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse loader config"));
    }

    #[test]
    fn test_host_names() {
        assert_ne!(host_goos(), "macos");
        assert_ne!(host_goarch(), "x86_64");
    }
}
