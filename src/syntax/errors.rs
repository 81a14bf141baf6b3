//! Syntax errors.

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// An error found while lexing or parsing a source file.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("unexpected character '{ch}'")]
    #[diagnostic(code(ifacegen::syntax::unexpected_character))]
    UnexpectedCharacter {
        ch: char,
        #[label("unexpected character")]
        span: SourceSpan,
    },

    #[error("unterminated string literal")]
    #[diagnostic(
        code(ifacegen::syntax::unterminated_string),
        help("add a closing quote to terminate the literal")
    )]
    UnterminatedString {
        #[label("literal starts here")]
        span: SourceSpan,
    },

    #[error("unterminated block comment")]
    #[diagnostic(code(ifacegen::syntax::unterminated_comment))]
    UnterminatedComment {
        #[label("comment starts here")]
        span: SourceSpan,
    },

    #[error("expected {expected}, found {found}")]
    #[diagnostic(code(ifacegen::syntax::unexpected_token))]
    UnexpectedToken {
        expected: String,
        found: String,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("missing package clause")]
    #[diagnostic(
        code(ifacegen::syntax::missing_package),
        help("every Go source file must start with `package <name>`")
    )]
    MissingPackageClause {
        #[label("expected `package` here")]
        span: SourceSpan,
    },
}

impl SyntaxError {
    /// Byte offset where the error was found.
    pub fn offset(&self) -> usize {
        match self {
            SyntaxError::UnexpectedCharacter { span, .. }
            | SyntaxError::UnterminatedString { span }
            | SyntaxError::UnterminatedComment { span }
            | SyntaxError::UnexpectedToken { span, .. }
            | SyntaxError::MissingPackageClause { span } => span.offset(),
        }
    }
}

/// 1-based line and column of a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let col = before.rfind('\n').map_or(offset, |nl| offset - nl - 1) + 1;
    (line, col)
}
