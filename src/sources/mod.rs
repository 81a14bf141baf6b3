//! Package sources.
//!
//! Sources locate Go packages and parse their files (on disk, or in memory).
//! The cache sits in front of a source and fills in each package's import
//! graph with declared package names.

pub mod build;
pub mod cache;
pub mod memory;
pub mod path;
pub mod source;

pub use cache::SourceCache;
pub use memory::MemorySource;
pub use path::PathSource;
pub use source::{guess_package_name, ImportedPackage, LoadError, Source, SourcePackage};
