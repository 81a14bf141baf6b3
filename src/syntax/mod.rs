//! Go source front end: lexer, declaration parser, and syntax tree.

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{
    ArrayLength, Field, FuncSig, ImportName, ImportSpec, InterfaceElem, SourceFile, StructField,
    TypeExpr, TypeExprKind, TypeParam, TypeSpec, UnionTerm,
};
pub use errors::{line_col, SyntaxError};
pub use parser::{parse_file, parse_package_name, parse_type_expr};
pub use token::Span;
