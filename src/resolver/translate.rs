//! Translation of syntax type expressions into the output type model.

use tracing::trace;

use crate::core::{Import, Method, Parameter, Type};
use crate::sources::SourcePackage;
use crate::syntax::{ArrayLength, Field, FuncSig, SourceFile, TypeExpr, TypeExprKind};

use super::errors::ResolveError;
use super::{merge_import, ResolveContext};

/// Where a type expression appears.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'p> {
    pub package: &'p SourcePackage,
    pub file: &'p SourceFile,
    /// Declaration or method the expression belongs to, for errors
    pub owner: &'p str,
}

impl Scope<'_> {
    pub(crate) fn unsupported(&self, detail: impl Into<String>) -> ResolveError {
        ResolveError::UnsupportedExpression {
            name: self.owner.to_string(),
            package: self.package.path.clone(),
            detail: detail.into(),
        }
    }
}

/// Check if an identifier is exported.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Parse an integer literal array length: decimal, hex, octal, or binary,
/// with optional `_` separators.
pub fn parse_array_len(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| *c != '_').collect();
    let lower = digits.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        u64::from_str_radix(bin, 2).ok()
    } else if let Some(oct) = lower.strip_prefix("0o") {
        u64::from_str_radix(oct, 8).ok()
    } else if lower.len() > 1 && lower.starts_with('0') {
        u64::from_str_radix(&lower[1..], 8).ok()
    } else {
        lower.parse().ok()
    }
}

/// Translate one type expression, recording the packages it references.
pub fn translate_type(
    ctx: &mut ResolveContext<'_>,
    scope: &Scope<'_>,
    expr: &TypeExpr,
    imports: &mut Vec<Import>,
) -> Result<Type, ResolveError> {
    let ty = match &expr.kind {
        TypeExprKind::Named(name) => {
            if is_exported(name) {
                ctx.qualify(scope.package, name, imports)
            } else {
                Type::builtin(name.as_str())
            }
        }

        TypeExprKind::Qualified {
            package: alias,
            name,
        } => {
            let table = ctx.alias_table(scope.package, scope.file);
            let imported = table
                .get(alias)
                .ok_or_else(|| ResolveError::UnknownPackageAlias {
                    alias: alias.clone(),
                    package: scope.package.path.clone(),
                })?;
            if ctx.is_root(&imported.path) {
                ctx.qualify(scope.package, name, imports)
            } else {
                merge_import(imports, Import::new(&imported.name, &imported.path));
                Type::exported(&imported.name, name.as_str())
            }
        }

        TypeExprKind::Pointer(elem) => Type::pointer(translate_type(ctx, scope, elem, imports)?),

        TypeExprKind::Slice(elem) => Type::slice(translate_type(ctx, scope, elem, imports)?),

        TypeExprKind::Array { len, elem } => {
            let len = match len {
                ArrayLength::Literal(text) => parse_array_len(text)
                    .ok_or_else(|| scope.unsupported(format!("array length `{}`", text)))?,
                ArrayLength::Inferred => {
                    return Err(scope.unsupported("array length `...`"));
                }
                ArrayLength::Expr(text) => {
                    return Err(scope.unsupported(format!("constant array length `{}`", text)));
                }
            };
            Type::array(len, translate_type(ctx, scope, elem, imports)?)
        }

        TypeExprKind::Map { key, value } => {
            let key = translate_type(ctx, scope, key, imports)?;
            let value = translate_type(ctx, scope, value, imports)?;
            Type::map(key, value)
        }

        TypeExprKind::Chan { dir, elem } => {
            Type::chan(*dir, translate_type(ctx, scope, elem, imports)?)
        }

        TypeExprKind::Ellipsis(elem) => Type::variadic(translate_type(ctx, scope, elem, imports)?),

        TypeExprKind::Func(sig) => {
            let inputs = translate_field_types(ctx, scope, &sig.params, imports)?;
            let outputs = translate_field_types(ctx, scope, &sig.results, imports)?;
            Type::func(inputs, outputs)
        }

        TypeExprKind::Paren(inner) => translate_type(ctx, scope, inner, imports)?,

        TypeExprKind::Interface(elems) if elems.is_empty() => Type::builtin("interface{}"),
        TypeExprKind::Interface(_) => {
            return Err(scope.unsupported("anonymous interface literal"));
        }

        TypeExprKind::Struct(fields) if fields.is_empty() => Type::builtin("struct{}"),
        TypeExprKind::Struct(_) => {
            return Err(scope.unsupported("anonymous struct literal"));
        }

        other @ (TypeExprKind::Generic { .. } | TypeExprKind::Union(_)) => {
            return Err(ResolveError::UnknownTypeExpression {
                package: scope.package.path.clone(),
                shape: other.shape().to_string(),
            });
        }
    };
    Ok(ty)
}

/// Types of a parameter list, one per name.
fn translate_field_types(
    ctx: &mut ResolveContext<'_>,
    scope: &Scope<'_>,
    fields: &[Field],
    imports: &mut Vec<Import>,
) -> Result<Vec<Type>, ResolveError> {
    let mut types = Vec::new();
    for field in fields {
        let ty = translate_type(ctx, scope, &field.ty, imports)?;
        let count = field.names.len().max(1);
        types.extend(std::iter::repeat(ty).take(count));
    }
    Ok(types)
}

/// Parameters of a list, naming unnamed ones `<prefix><position>`.
fn translate_params(
    ctx: &mut ResolveContext<'_>,
    scope: &Scope<'_>,
    fields: &[Field],
    prefix: &str,
    imports: &mut Vec<Import>,
) -> Result<Vec<Parameter>, ResolveError> {
    let mut params = Vec::new();
    for field in fields {
        let ty = translate_type(ctx, scope, &field.ty, imports)?;
        if field.names.is_empty() {
            params.push(Parameter::new(format!("{}{}", prefix, params.len()), ty));
            continue;
        }
        for name in &field.names {
            let name = if name == "_" {
                format!("{}{}", prefix, params.len())
            } else {
                name.clone()
            };
            params.push(Parameter::new(name, ty.clone()));
        }
    }
    Ok(params)
}

/// Translate an interface method.
pub fn translate_method(
    ctx: &mut ResolveContext<'_>,
    scope: &Scope<'_>,
    name: &str,
    sig: &FuncSig,
    imports: &mut Vec<Import>,
) -> Result<Method, ResolveError> {
    trace!("translating method {} of {}", name, scope.owner);
    let scope = Scope {
        owner: name,
        ..*scope
    };
    let inputs = translate_params(ctx, &scope, &sig.params, "param", imports)?;
    let outputs = translate_params(ctx, &scope, &sig.results, "result", imports)?;
    Ok(Method {
        name: name.to_string(),
        inputs,
        outputs,
    })
}
