//! Diagnostic records for problems found while loading packages.
//!
//! Syntax errors are reported per file with a resolved line and column so
//! that a failed load can list every problem at once.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::syntax::{line_col, SyntaxError};

/// Common suggestion messages.
pub mod suggestions {
    /// A package could not be located on the search path.
    pub const PACKAGE_NOT_FOUND: &str =
        "check GOPATH, GOROOT, and the `replace` table of the loader config";

    /// A file failed to parse.
    pub const SYNTAX_ERROR: &str = "run `gofmt -l` on the package to locate the broken file";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// Where a diagnostic points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: PathBuf,
    /// 1-based line and column, when known
    pub position: Option<(usize, usize)>,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some((line, col)) => write!(f, "{}:{}:{}", self.path.display(), line, col),
            None => write!(f, "{}", self.path.display()),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location
    pub location: Option<Location>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::error(message)
        }
    }

    /// Build an error diagnostic from a syntax error in `source`.
    pub fn from_syntax(path: &Path, source: &str, error: &SyntaxError) -> Self {
        let (line, col) = line_col(source, error.offset());
        let snippet = source.lines().nth(line - 1).unwrap_or("").trim_end();
        let mut diag = Diagnostic::error(error.to_string()).with_location_at(path, line, col);
        if !snippet.is_empty() {
            diag = diag.with_context(snippet);
        }
        diag
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(Location {
            path: path.into(),
            position: None,
        });
        self
    }

    /// Add a file location with line and column.
    pub fn with_location_at(mut self, path: impl Into<PathBuf>, line: usize, col: usize) -> Self {
        self.location = Some(Location {
            path: path.into(),
            position: Some((line, col)),
        });
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = if color {
            match self.severity {
                Severity::Error => "\x1b[1;31merror\x1b[0m",
                Severity::Warning => "\x1b[1;33mwarning\x1b[0m",
                Severity::Note => "\x1b[1;36mnote\x1b[0m",
            }
        } else {
            match self.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
                Severity::Note => "note",
            }
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        if let Some(ref location) = self.location {
            output.push_str(&format!("  --> {}\n", location));
        }

        for ctx in &self.context {
            output.push_str(&format!("   | {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            for suggestion in &self.suggestions {
                output.push_str(&format!("{}: {}\n", help_prefix, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Render several diagnostics as one block.
pub fn format_all(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.format(false))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("expected type, found `}`")
            .with_location_at("pkg/a.go", 3, 14)
            .with_context("type A interface { F( }")
            .with_suggestion(suggestions::SYNTAX_ERROR);

        let output = diag.format(false);
        assert!(output.starts_with("error: expected type"));
        assert!(output.contains("--> pkg/a.go:3:14"));
        assert!(output.contains("| type A interface"));
        assert!(output.contains("help: run `gofmt -l`"));
    }

    #[test]
    fn test_from_syntax_error() {
        let source = "package a\n\ntype A interface { F( }\n";
        let errors = crate::syntax::parse_file("a.go", source).unwrap_err();
        let diag = Diagnostic::from_syntax(Path::new("/src/a/a.go"), source, &errors[0]);

        let location = diag.location.unwrap();
        assert_eq!(location.position.map(|p| p.0), Some(3));
        assert_eq!(diag.context, vec!["type A interface { F( }"]);
    }

    #[test]
    fn test_format_all_joins() {
        let out = format_all(&[Diagnostic::error("one"), Diagnostic::warning("two")]);
        assert!(out.contains("error: one"));
        assert!(out.contains("warning: two"));
    }
}
