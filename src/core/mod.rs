//! Core data model.
//!
//! The output of resolution: types as they appear in method signatures,
//! flattened interfaces, and the package aggregate handed to renderers.

pub mod interface;
pub mod package;
pub mod types;

pub use interface::{Interface, Method, Parameter};
pub use package::{dedup_imports, strip_vendor, Import, Package, SOURCE_ALIAS};
pub use types::{ArrayLen, ChanDir, Type};
