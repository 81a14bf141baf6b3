//! ifacegen - Go interface contract extraction
//!
//! This crate loads Go packages, resolves named interfaces into their
//! flattened method sets (following embeddings and aliases across package
//! boundaries), and produces a language-neutral model that code generators
//! use to emit decorators and proxies.
//!
//! ```rust,ignore
//! use ifacegen::{load_package, Cancellation, PathSource, SourceCache};
//!
//! let mut cache = SourceCache::new(PathSource::from_env());
//! let pkg = load_package(
//!     &Cancellation::new(),
//!     &mut cache,
//!     "net/http",
//!     "example.com/wrappers",
//!     &["Handler"],
//! )?;
//! println!("{}", pkg.to_json()?);
//! ```

pub mod core;
pub mod ops;
pub mod resolver;
pub mod sources;
pub mod syntax;
pub mod util;

/// Test utilities for ifacegen unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides the shared Go fixture packages.
#[cfg(test)]
pub mod test_support;

pub use core::{Import, Interface, Method, Package, Parameter, Type, SOURCE_ALIAS};

pub use ops::{load_interfaces, load_package, load_package_from_config, load_package_with_config};
pub use resolver::ResolveError;
pub use sources::{LoadError, MemorySource, PathSource, Source, SourceCache};
pub use util::{Cancellation, Diagnostic, LoaderConfig};
