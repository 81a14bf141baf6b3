//! Resolution error types and diagnostics.

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::sources::LoadError;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error while resolving an interface.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ResolveError {
    #[error("failed to load package `{package}`")]
    #[diagnostic(code(ifacegen::resolve::loader))]
    Loader {
        package: String,
        #[source]
        #[diagnostic_source]
        source: LoadError,
    },

    #[error("type `{name}` is not declared in package `{package}`")]
    #[diagnostic(code(ifacegen::resolve::not_found))]
    DeclarationNotFound { name: String, package: String },

    #[error("`{name}` in package `{package}`: {detail} is not supported")]
    #[diagnostic(
        code(ifacegen::resolve::unsupported),
        help("only interface types, plain and package-qualified names are resolved")
    )]
    UnsupportedExpression {
        name: String,
        package: String,
        detail: String,
    },

    #[error("unknown type expression ({shape}) in package `{package}`")]
    #[diagnostic(code(ifacegen::resolve::unknown_type))]
    UnknownTypeExpression { package: String, shape: String },

    #[error("package alias `{alias}` is not imported in package `{package}`")]
    #[diagnostic(code(ifacegen::resolve::unknown_alias))]
    UnknownPackageAlias { alias: String, package: String },

    #[error("interface embedding cycle: {}", .chain.join(" -> "))]
    #[diagnostic(code(ifacegen::resolve::cycle))]
    CycleDetected { chain: Vec<String> },

    #[error("while resolving `{name}` in package `{package}`")]
    #[diagnostic(code(ifacegen::resolve::context))]
    Resolving {
        name: String,
        package: String,
        #[source]
        source: Box<ResolveError>,
    },
}

impl ResolveError {
    /// Wrap this error with the declaration being resolved.
    pub fn resolving(self, name: impl Into<String>, package: impl Into<String>) -> Self {
        ResolveError::Resolving {
            name: name.into(),
            package: package.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, below any `Resolving` context.
    pub fn root(&self) -> &ResolveError {
        let mut err = self;
        while let ResolveError::Resolving { source, .. } = err {
            err = source;
        }
        err
    }

    /// The `name in package` frames of the context chain, outermost first.
    pub fn trail(&self) -> Vec<String> {
        let mut trail = Vec::new();
        let mut err = self;
        while let ResolveError::Resolving {
            name,
            package,
            source,
        } = err
        {
            trail.push(format!("{}.{}", package, name));
            err = source;
        }
        trail
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let root = self.root();
        let mut diag = match root {
            ResolveError::Loader { package, source } => {
                let mut diag = Diagnostic::error(format!("failed to load package `{}`", package))
                    .with_context(source.to_string());
                if source.is_not_found() {
                    diag = diag.with_suggestion(suggestions::PACKAGE_NOT_FOUND);
                }
                diag
            }

            ResolveError::DeclarationNotFound { name, package } => Diagnostic::error(format!(
                "type `{}` is not declared in package `{}`",
                name, package
            ))
            .with_suggestion("Check the spelling of the interface name"),

            ResolveError::CycleDetected { chain } => {
                Diagnostic::error("interface embedding cycle")
                    .with_context(format!("cycle: {}", chain.join(" -> ")))
                    .with_suggestion("Break the cycle by removing one of the embeddings")
            }

            other => Diagnostic::error(other.to_string()),
        };

        for frame in self.trail() {
            diag = diag.with_context(format!("while resolving {}", frame));
        }
        diag
    }
}
