//! Declaration lookup and classification.

use crate::core::{Method, Parameter, Type};
use crate::sources::SourcePackage;
use crate::syntax::{InterfaceElem, SourceFile, TypeExprKind, TypeSpec};

use super::errors::ResolveError;

/// What a named type declaration turned out to be.
#[derive(Debug, Clone, Copy)]
pub enum Declaration<'p> {
    /// `type Name interface { ... }`
    Interface {
        file: &'p SourceFile,
        elems: &'p [InterfaceElem],
    },
    /// `type Name Other` or `type Name = Other`
    Local { file: &'p SourceFile, target: &'p str },
    /// `type Name pkg.Other` or `type Name = pkg.Other`
    Remote {
        file: &'p SourceFile,
        alias: &'p str,
        target: &'p str,
    },
    /// A predeclared interface the package doesn't shadow
    Predeclared(Predeclared),
}

/// Interfaces built into the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predeclared {
    /// `error`: `interface { Error() string }`
    Error,
    /// `any`: `interface{}`
    Any,
}

impl Predeclared {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "error" => Some(Predeclared::Error),
            "any" => Some(Predeclared::Any),
            _ => None,
        }
    }

    pub fn methods(&self) -> Vec<Method> {
        match self {
            Predeclared::Error => vec![Method::new("Error")
                .with_output(Parameter::new("result0", Type::builtin("string")))],
            Predeclared::Any => Vec::new(),
        }
    }
}

/// Find the first declaration of `name`: files in file-name order, then
/// declarations in source order.
pub fn find_type_spec<'p>(
    pkg: &'p SourcePackage,
    name: &str,
) -> Option<(&'p SourceFile, &'p TypeSpec)> {
    pkg.files
        .iter()
        .find_map(|file| file.type_spec(name).map(|spec| (file, spec)))
}

/// Locate and classify the declaration of `name` in `pkg`.
pub fn scan<'p>(pkg: &'p SourcePackage, name: &str) -> Result<Declaration<'p>, ResolveError> {
    let Some((file, spec)) = find_type_spec(pkg, name) else {
        return match Predeclared::from_name(name) {
            Some(predeclared) => Ok(Declaration::Predeclared(predeclared)),
            None => Err(ResolveError::DeclarationNotFound {
                name: name.to_string(),
                package: pkg.path.clone(),
            }),
        };
    };

    let unsupported = |detail: String| ResolveError::UnsupportedExpression {
        name: name.to_string(),
        package: pkg.path.clone(),
        detail,
    };

    if spec.is_generic() {
        return Err(unsupported("generic type declaration".to_string()));
    }

    match &spec.ty.unparen().kind {
        TypeExprKind::Interface(elems) => Ok(Declaration::Interface { file, elems }),
        TypeExprKind::Named(target) => Ok(Declaration::Local { file, target }),
        TypeExprKind::Qualified {
            package: alias,
            name: target,
        } => Ok(Declaration::Remote {
            file,
            alias,
            target,
        }),
        other => Err(unsupported(format!("declaration of {}", other.shape()))),
    }
}
