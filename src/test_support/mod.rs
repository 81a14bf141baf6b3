//! Test utilities for ifacegen unit tests.
//!
//! Provides the shared Go fixture packages and a logging hook so `tracing`
//! output shows up under `cargo test -- --nocapture`.
//!
//! # Example
//!
//! ```rust,ignore
//! use ifacegen::test_support::{fixture_cache, init_logging, HAPPY};
//!
//! #[test]
//! fn test_example() {
//!     init_logging();
//!     let mut cache = fixture_cache();
//!     // Resolve against HAPPY...
//! }
//! ```

pub mod fixtures;

use std::sync::Once;

use tracing_subscriber::EnvFilter;

// Re-export fixtures for convenience
pub use fixtures::*;

static LOGGING: Once = Once::new();

/// Route `tracing` output to the test harness, filtered by `RUST_LOG`.
pub fn init_logging() {
    LOGGING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::Source;

    #[test]
    fn test_fixture_source_has_every_package() {
        let source = fixture_source();
        for path in [HAPPY, SUB_HAPPY, EDGE, YAML, PFLAG, "io", "os", "net/http", "time"] {
            assert!(source.contains(path), "missing {path}");
        }
    }

    #[test]
    fn test_declared_name_differs_from_directory() {
        let mut source = fixture_source();
        assert_eq!(source.package_name(YAML, None).unwrap(), "yaml");
    }

    #[test]
    fn test_write_to_lays_out_import_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = PackageFixture::new("example.com/a/b")
            .with_file("b.go", "package b\n")
            .write_to(tmp.path())
            .unwrap();
        assert_eq!(dir, tmp.path().join("example.com").join("a").join("b"));
        assert!(dir.join("b.go").is_file());
    }
}
