//! Declaration-level syntax tree for Go source files.
//!
//! Only the parts of a file that describe its declaration surface are
//! modelled: the package clause, imports, and type declarations. Function,
//! variable, and constant declarations are skipped by the parser.

use crate::core::ChanDir;

use super::token::Span;

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// File name (no directory)
    pub name: String,

    /// Name from the package clause
    pub package: String,

    /// Import specs in source order
    pub imports: Vec<ImportSpec>,

    /// Type specs in source order
    pub types: Vec<TypeSpec>,
}

impl SourceFile {
    /// Find the first type spec with the given name.
    pub fn type_spec(&self, name: &str) -> Option<&TypeSpec> {
        self.types.iter().find(|t| t.name == name)
    }
}

/// How an import names the imported package in the file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportName {
    /// `import "path"`: the package's declared name
    Default,
    /// `import name "path"`
    Alias(String),
    /// `import _ "path"`
    Blank,
    /// `import . "path"`
    Dot,
}

/// A single import spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub name: ImportName,
    /// Import path as written, without quotes
    pub path: String,
    pub span: Span,
}

/// A type declaration: `type Name[P C] = Type` or `type Name Type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub name: String,
    /// `type A = B` rather than `type A B`
    pub is_alias: bool,
    pub type_params: Vec<TypeParam>,
    pub ty: TypeExpr,
    pub span: Span,
}

impl TypeSpec {
    /// Check if the declaration has type parameters.
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }
}

/// A type parameter and its constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParam {
    pub name: String,
    pub constraint: TypeExpr,
}

/// A type expression with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

impl TypeExpr {
    pub fn new(kind: TypeExprKind, span: Span) -> Self {
        TypeExpr { kind, span }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparen(&self) -> &TypeExpr {
        let mut expr = self;
        while let TypeExprKind::Paren(inner) = &expr.kind {
            expr = inner;
        }
        expr
    }

    /// The identifier, if this is a plain name.
    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            TypeExprKind::Named(name) => Some(name),
            _ => None,
        }
    }
}

/// The shape of a type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExprKind {
    /// `T`
    Named(String),
    /// `pkg.T`
    Qualified { package: String, name: String },
    /// `T[A, B]`
    Generic {
        base: Box<TypeExpr>,
        args: Vec<TypeExpr>,
    },
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `[]T`
    Slice(Box<TypeExpr>),
    /// `[N]T`
    Array {
        len: ArrayLength,
        elem: Box<TypeExpr>,
    },
    /// `map[K]V`
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// `chan T`, `chan<- T`, `<-chan T`
    Chan { dir: ChanDir, elem: Box<TypeExpr> },
    /// `func(...) ...`
    Func(FuncSig),
    /// `interface { ... }`
    Interface(Vec<InterfaceElem>),
    /// `struct { ... }`
    Struct(Vec<StructField>),
    /// `(T)`
    Paren(Box<TypeExpr>),
    /// `...T`, only valid as the last parameter type
    Ellipsis(Box<TypeExpr>),
    /// `~int | string`, only valid in constraints
    Union(Vec<UnionTerm>),
}

impl TypeExprKind {
    /// Short human-readable description used in error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            TypeExprKind::Named(_) => "identifier",
            TypeExprKind::Qualified { .. } => "qualified identifier",
            TypeExprKind::Generic { .. } => "generic instantiation",
            TypeExprKind::Pointer(_) => "pointer type",
            TypeExprKind::Slice(_) => "slice type",
            TypeExprKind::Array { .. } => "array type",
            TypeExprKind::Map { .. } => "map type",
            TypeExprKind::Chan { .. } => "channel type",
            TypeExprKind::Func(_) => "function type",
            TypeExprKind::Interface(_) => "interface literal",
            TypeExprKind::Struct(_) => "struct literal",
            TypeExprKind::Paren(_) => "parenthesized type",
            TypeExprKind::Ellipsis(_) => "variadic type",
            TypeExprKind::Union(_) => "type-set union",
        }
    }
}

/// Length of an array type as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayLength {
    /// An integer literal, kept as source text (`10`, `0x10`, `1_000`)
    Literal(String),
    /// `[...]T`
    Inferred,
    /// Any other constant expression, as source text
    Expr(String),
}

/// A parameter or result group: `a, b int`, or an unnamed `int`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Names in the group; empty for an unnamed parameter
    pub names: Vec<String>,
    pub ty: TypeExpr,
}

impl Field {
    pub fn unnamed(ty: TypeExpr) -> Self {
        Field {
            names: Vec::new(),
            ty,
        }
    }
}

/// Parameters and results of a function type or method.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FuncSig {
    pub params: Vec<Field>,
    pub results: Vec<Field>,
}

/// An element of an interface body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceElem {
    /// `Name(params) results`
    Method {
        name: String,
        sig: FuncSig,
        span: Span,
    },
    /// An embedded interface: `io.Reader`, `Base`
    Embedded(TypeExpr),
    /// A type-set element: `~int | ~string`
    Union(Vec<UnionTerm>),
}

/// One term of a type-set union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionTerm {
    pub tilde: bool,
    pub ty: TypeExpr,
}

/// A struct field group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    /// Field names; empty for an embedded field
    pub names: Vec<String>,
    pub ty: TypeExpr,
    pub tag: Option<String>,
}

impl StructField {
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}
