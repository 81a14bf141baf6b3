//! Shared utilities

pub mod cancel;
pub mod config;
pub mod diagnostic;

pub use cancel::Cancellation;
pub use config::LoaderConfig;
pub use diagnostic::Diagnostic;
