//! Test fixtures for common resolution scenarios.
//!
//! The Go sources live under `tests/testdata/` so the integration tests can
//! point a real GOPATH and GOROOT at the same trees.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::sources::{MemorySource, SourceCache};

pub const HAPPY: &str = "example.com/fixtures/happy";
pub const SUB_HAPPY: &str = "example.com/fixtures/sub/happy";
pub const EDGE: &str = "example.com/fixtures/edge";
pub const PFLAG: &str = "github.com/spf13/pflag";
pub const YAML: &str = "example.com/go-yaml";

/// A Go package: import path plus source files.
#[derive(Debug, Clone)]
pub struct PackageFixture {
    /// Import path
    pub path: String,
    /// File name -> contents
    pub files: BTreeMap<String, String>,
}

impl PackageFixture {
    /// Create a new empty package fixture.
    pub fn new(path: impl Into<String>) -> Self {
        PackageFixture {
            path: path.into(),
            files: BTreeMap::new(),
        }
    }

    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(name.into(), content.into());
        self
    }

    /// Write the package under `src_root`, at its import path.
    pub fn write_to(&self, src_root: &Path) -> std::io::Result<PathBuf> {
        let dir = self.path.split('/').fold(src_root.to_path_buf(), |d, s| d.join(s));
        std::fs::create_dir_all(&dir)?;
        for (name, content) in &self.files {
            std::fs::write(dir.join(name), content)?;
        }
        Ok(dir)
    }

    /// Register the package in a memory source.
    pub fn add_to(&self, source: &mut MemorySource) {
        for (name, content) in &self.files {
            source.add_file(&self.path, name, content);
        }
    }
}

/// The happy-path package and the package importing it.
pub fn happy_packages() -> Vec<PackageFixture> {
    vec![
        PackageFixture::new(HAPPY).with_file(
            "happy.go",
            include_str!("../../tests/testdata/gopath/src/example.com/fixtures/happy/happy.go"),
        ),
        PackageFixture::new(SUB_HAPPY).with_file(
            "happy.go",
            include_str!("../../tests/testdata/gopath/src/example.com/fixtures/sub/happy/happy.go"),
        ),
    ]
}

/// Packages exercising failure modes and unusual declarations.
pub fn edge_packages() -> Vec<PackageFixture> {
    vec![
        PackageFixture::new(EDGE)
            .with_file(
                "a.go",
                include_str!("../../tests/testdata/gopath/src/example.com/fixtures/edge/a.go"),
            )
            .with_file(
                "b.go",
                include_str!("../../tests/testdata/gopath/src/example.com/fixtures/edge/b.go"),
            )
            .with_file(
                "edge_test.go",
                include_str!("../../tests/testdata/gopath/src/example.com/fixtures/edge/edge_test.go"),
            ),
        PackageFixture::new(YAML).with_file(
            "yaml.go",
            include_str!("../../tests/testdata/gopath/src/example.com/go-yaml/yaml.go"),
        ),
    ]
}

/// Stand-ins for the standard library and third-party dependencies.
pub fn dependency_packages() -> Vec<PackageFixture> {
    vec![
        PackageFixture::new("io").with_file(
            "io.go",
            include_str!("../../tests/testdata/goroot/src/io/io.go"),
        ),
        PackageFixture::new("os").with_file(
            "file.go",
            include_str!("../../tests/testdata/goroot/src/os/file.go"),
        ),
        PackageFixture::new("net/http").with_file(
            "server.go",
            include_str!("../../tests/testdata/goroot/src/net/http/server.go"),
        ),
        PackageFixture::new("time").with_file(
            "time.go",
            include_str!("../../tests/testdata/goroot/src/time/time.go"),
        ),
        PackageFixture::new(PFLAG).with_file(
            "flag.go",
            include_str!("../../tests/testdata/gopath/src/github.com/spf13/pflag/flag.go"),
        ),
    ]
}

/// A memory source holding every fixture package.
pub fn fixture_source() -> MemorySource {
    let mut source = MemorySource::new();
    for pkg in happy_packages()
        .iter()
        .chain(&edge_packages())
        .chain(&dependency_packages())
    {
        pkg.add_to(&mut source);
    }
    source
}

/// A fresh cache over [`fixture_source`].
pub fn fixture_cache() -> SourceCache {
    SourceCache::new(fixture_source())
}
