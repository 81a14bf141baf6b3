//! Recursive descent parser for Go declarations.
//!
//! Parses the package clause, imports, and type declarations of a file.
//! Function, method, variable, and constant declarations are skipped by
//! balanced-bracket scanning.

use crate::core::ChanDir;

use super::ast::{
    ArrayLength, Field, FuncSig, ImportName, ImportSpec, InterfaceElem, SourceFile, StructField,
    TypeExpr, TypeExprKind, TypeParam, TypeSpec, UnionTerm,
};
use super::errors::SyntaxError;
use super::lexer::{tokenize, Lexer};
use super::token::{Span, Token, TokenKind};

type PResult<T> = Result<T, SyntaxError>;

/// Parse a whole file. Lexer errors are all reported; parsing stops at the
/// first syntax error.
pub fn parse_file(name: &str, source: &str) -> Result<SourceFile, Vec<SyntaxError>> {
    let (tokens, errors) = tokenize(source);
    if !errors.is_empty() {
        return Err(errors);
    }
    Parser::new(source, tokens).file(name).map_err(|e| vec![e])
}

/// Read only the package clause of a file.
pub fn parse_package_name(source: &str) -> Result<String, SyntaxError> {
    let mut lexer = Lexer::new(source);
    let mut token = lexer.next_token();
    while token.kind == TokenKind::Semicolon {
        token = lexer.next_token();
    }
    if token.kind != TokenKind::Package {
        return Err(SyntaxError::MissingPackageClause {
            span: token.span.into(),
        });
    }
    let name = lexer.next_token();
    if name.kind != TokenKind::Ident {
        return Err(SyntaxError::UnexpectedToken {
            expected: "package name".to_string(),
            found: name.kind.to_string(),
            span: name.span.into(),
        });
    }
    Ok(name.text(source).to_string())
}

/// Parse a single type expression, e.g. for configuration or tests.
pub fn parse_type_expr(source: &str) -> Result<TypeExpr, Vec<SyntaxError>> {
    let (tokens, errors) = tokenize(source);
    if !errors.is_empty() {
        return Err(errors);
    }
    let mut parser = Parser::new(source, tokens);
    let ty = parser.parse_type().map_err(|e| vec![e])?;
    parser.eat(TokenKind::Semicolon);
    if parser.peek() != TokenKind::Eof {
        return Err(vec![parser.unexpected("end of type")]);
    }
    Ok(ty)
}

pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        Parser {
            source,
            tokens,
            pos: 0,
        }
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    fn current(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> TokenKind {
        self.current().kind
    }

    fn peek_at(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    fn bump(&mut self) -> Token {
        let token = self.current();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek() == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> PResult<Token> {
        if self.peek() == kind {
            Ok(self.bump())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_ident(&mut self, expected: &str) -> PResult<String> {
        let token = self.expect(TokenKind::Ident, expected)?;
        Ok(token.text(self.source).to_string())
    }

    fn skip_semicolons(&mut self) {
        while self.eat(TokenKind::Semicolon) {}
    }

    fn expect_terminator(&mut self) -> PResult<()> {
        if self.eat(TokenKind::Semicolon) || self.peek() == TokenKind::Eof {
            Ok(())
        } else {
            Err(self.unexpected("`;` or newline"))
        }
    }

    fn describe(&self, token: Token) -> String {
        match token.kind {
            TokenKind::Ident => format!("`{}`", token.text(self.source)),
            TokenKind::Semicolon if token.span.is_empty() => "newline".to_string(),
            kind => kind.to_string(),
        }
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        let token = self.current();
        SyntaxError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.describe(token),
            span: token.span.into(),
        }
    }

    fn span_from(&self, start: Span) -> Span {
        let end = if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            start
        };
        start.to(end)
    }

    /// Index of the `]` matching the `[` at `open`.
    fn matching_bracket(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(open) {
            match token.kind {
                TokenKind::LBracket | TokenKind::LParen | TokenKind::LBrace => depth += 1,
                TokenKind::RBracket | TokenKind::RParen | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return (token.kind == TokenKind::RBracket).then_some(i);
                    }
                }
                TokenKind::Eof => return None,
                _ => {}
            }
        }
        None
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    pub fn file(&mut self, name: &str) -> PResult<SourceFile> {
        self.skip_semicolons();
        if self.peek() != TokenKind::Package {
            return Err(SyntaxError::MissingPackageClause {
                span: self.current().span.into(),
            });
        }
        self.bump();
        let package = self.expect_ident("package name")?;
        self.expect_terminator()?;

        let mut file = SourceFile {
            name: name.to_string(),
            package,
            imports: Vec::new(),
            types: Vec::new(),
        };

        loop {
            self.skip_semicolons();
            match self.peek() {
                TokenKind::Eof => break,
                TokenKind::Import => self.import_decl(&mut file.imports)?,
                TokenKind::Type => self.type_decl(&mut file.types)?,
                TokenKind::Func | TokenKind::Var | TokenKind::Const => self.skip_decl(),
                _ => return Err(self.unexpected("declaration")),
            }
            self.expect_terminator()?;
        }

        Ok(file)
    }

    fn import_decl(&mut self, imports: &mut Vec<ImportSpec>) -> PResult<()> {
        self.bump();
        if self.eat(TokenKind::LParen) {
            loop {
                self.skip_semicolons();
                if self.eat(TokenKind::RParen) {
                    break;
                }
                imports.push(self.import_spec()?);
                if !self.eat(TokenKind::Semicolon) {
                    self.expect(TokenKind::RParen, "`)`")?;
                    break;
                }
            }
        } else {
            imports.push(self.import_spec()?);
        }
        Ok(())
    }

    fn import_spec(&mut self) -> PResult<ImportSpec> {
        let start = self.current().span;
        let name = match self.peek() {
            TokenKind::Ident => {
                let token = self.bump();
                match token.text(self.source) {
                    "_" => ImportName::Blank,
                    alias => ImportName::Alias(alias.to_string()),
                }
            }
            TokenKind::Dot => {
                self.bump();
                ImportName::Dot
            }
            _ => ImportName::Default,
        };
        let path = self.expect(TokenKind::String, "import path")?;
        Ok(ImportSpec {
            name,
            path: unquote(path.text(self.source)),
            span: self.span_from(start),
        })
    }

    fn type_decl(&mut self, types: &mut Vec<TypeSpec>) -> PResult<()> {
        self.bump();
        if self.eat(TokenKind::LParen) {
            loop {
                self.skip_semicolons();
                if self.eat(TokenKind::RParen) {
                    break;
                }
                types.push(self.type_spec()?);
                if !self.eat(TokenKind::Semicolon) {
                    self.expect(TokenKind::RParen, "`)`")?;
                    break;
                }
            }
        } else {
            types.push(self.type_spec()?);
        }
        Ok(())
    }

    fn type_spec(&mut self) -> PResult<TypeSpec> {
        let start = self.current().span;
        let name = self.expect_ident("type name")?;
        let type_params = if self.looks_like_type_params() {
            self.type_params()?
        } else {
            Vec::new()
        };
        let is_alias = self.eat(TokenKind::Assign);
        let ty = self.parse_type()?;
        Ok(TypeSpec {
            name,
            is_alias,
            type_params,
            ty,
            span: self.span_from(start),
        })
    }

    /// Distinguish `type T[P any] ...` from `type T [N]int`.
    fn looks_like_type_params(&self) -> bool {
        self.peek() == TokenKind::LBracket
            && self.peek_at(1) == TokenKind::Ident
            && matches!(
                self.peek_at(2),
                TokenKind::Ident
                    | TokenKind::Comma
                    | TokenKind::Interface
                    | TokenKind::Tilde
                    | TokenKind::LBracket
                    | TokenKind::Func
                    | TokenKind::Map
                    | TokenKind::Chan
                    | TokenKind::Arrow
                    | TokenKind::Struct
                    | TokenKind::LParen
            )
    }

    fn type_params(&mut self) -> PResult<Vec<TypeParam>> {
        self.expect(TokenKind::LBracket, "`[`")?;
        let mut entries: Vec<(String, Option<TypeExpr>)> = Vec::new();
        loop {
            let name = self.expect_ident("type parameter name")?;
            let constraint = if matches!(self.peek(), TokenKind::Comma | TokenKind::RBracket) {
                None
            } else {
                Some(self.union()?)
            };
            entries.push((name, constraint));
            if !self.eat(TokenKind::Comma) || self.peek() == TokenKind::RBracket {
                break;
            }
        }
        self.expect(TokenKind::RBracket, "`]`")?;

        // `[K, V any]`: names without a constraint share the next one.
        let mut params = Vec::with_capacity(entries.len());
        let mut shared: Option<TypeExpr> = None;
        for (name, constraint) in entries.into_iter().rev() {
            if let Some(c) = constraint {
                shared = Some(c);
            }
            let constraint = shared
                .clone()
                .ok_or_else(|| self.unexpected("type parameter constraint"))?;
            params.push(TypeParam { name, constraint });
        }
        params.reverse();
        Ok(params)
    }

    fn skip_decl(&mut self) {
        self.bump();
        let mut depth = 0usize;
        loop {
            match self.peek() {
                TokenKind::Eof => break,
                TokenKind::Semicolon if depth == 0 => break,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            self.bump();
        }
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn starts_type(kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Ident
                | TokenKind::Star
                | TokenKind::LBracket
                | TokenKind::Map
                | TokenKind::Chan
                | TokenKind::Arrow
                | TokenKind::Func
                | TokenKind::Interface
                | TokenKind::Struct
        )
    }

    /// Whether the `[` at `open` starts type arguments rather than the
    /// array type of a following name, as in `a [2]int`.
    fn is_instantiation(&self, open: usize) -> bool {
        let next = self.tokens.get(open + 1).map(|t| t.kind);
        if matches!(next, Some(TokenKind::RBracket) | Some(TokenKind::Ellipsis)) {
            return false;
        }
        match self.matching_bracket(open) {
            Some(close) => {
                let after = self.tokens.get(close + 1).map_or(TokenKind::Eof, |t| t.kind);
                !Self::starts_type(after)
            }
            None => false,
        }
    }

    pub fn parse_type(&mut self) -> PResult<TypeExpr> {
        let start = self.current().span;
        let kind = match self.peek() {
            TokenKind::Ident => {
                let name = self.bump().text(self.source).to_string();
                let base = if self.eat(TokenKind::Dot) {
                    let sel = self.expect_ident("type name after `.`")?;
                    TypeExprKind::Qualified {
                        package: name,
                        name: sel,
                    }
                } else {
                    TypeExprKind::Named(name)
                };
                if self.peek() == TokenKind::LBracket && self.is_instantiation(self.pos) {
                    let base = TypeExpr::new(base, self.span_from(start));
                    let args = self.type_args()?;
                    TypeExprKind::Generic {
                        base: Box::new(base),
                        args,
                    }
                } else {
                    base
                }
            }
            TokenKind::Star => {
                self.bump();
                TypeExprKind::Pointer(Box::new(self.parse_type()?))
            }
            TokenKind::LBracket => {
                self.bump();
                if self.eat(TokenKind::RBracket) {
                    TypeExprKind::Slice(Box::new(self.parse_type()?))
                } else {
                    let len = self.array_length()?;
                    self.expect(TokenKind::RBracket, "`]`")?;
                    TypeExprKind::Array {
                        len,
                        elem: Box::new(self.parse_type()?),
                    }
                }
            }
            TokenKind::Map => {
                self.bump();
                self.expect(TokenKind::LBracket, "`[`")?;
                let key = self.parse_type()?;
                self.expect(TokenKind::RBracket, "`]`")?;
                let value = self.parse_type()?;
                TypeExprKind::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                }
            }
            TokenKind::Chan => {
                self.bump();
                let dir = if self.eat(TokenKind::Arrow) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                TypeExprKind::Chan {
                    dir,
                    elem: Box::new(self.parse_type()?),
                }
            }
            TokenKind::Arrow => {
                self.bump();
                self.expect(TokenKind::Chan, "`chan`")?;
                TypeExprKind::Chan {
                    dir: ChanDir::Recv,
                    elem: Box::new(self.parse_type()?),
                }
            }
            TokenKind::Func => {
                self.bump();
                TypeExprKind::Func(self.signature()?)
            }
            TokenKind::Interface => {
                self.bump();
                TypeExprKind::Interface(self.interface_body()?)
            }
            TokenKind::Struct => {
                self.bump();
                TypeExprKind::Struct(self.struct_body()?)
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_type()?;
                self.expect(TokenKind::RParen, "`)`")?;
                TypeExprKind::Paren(Box::new(inner))
            }
            _ => return Err(self.unexpected("type")),
        };
        Ok(TypeExpr::new(kind, self.span_from(start)))
    }

    fn type_args(&mut self) -> PResult<Vec<TypeExpr>> {
        self.expect(TokenKind::LBracket, "`[`")?;
        let mut args = Vec::new();
        loop {
            args.push(self.parse_type()?);
            if !self.eat(TokenKind::Comma) || self.peek() == TokenKind::RBracket {
                break;
            }
        }
        self.expect(TokenKind::RBracket, "`]`")?;
        Ok(args)
    }

    fn array_length(&mut self) -> PResult<ArrayLength> {
        if self.peek() == TokenKind::Ellipsis && self.peek_at(1) == TokenKind::RBracket {
            self.bump();
            return Ok(ArrayLength::Inferred);
        }
        let first = self.current();
        let mut depth = 0usize;
        let mut count = 0usize;
        loop {
            match self.peek() {
                TokenKind::Eof => return Err(self.unexpected("`]`")),
                TokenKind::RBracket if depth == 0 => break,
                TokenKind::LBracket | TokenKind::LParen | TokenKind::LBrace => depth += 1,
                TokenKind::RBracket | TokenKind::RParen | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            self.bump();
            count += 1;
        }
        if count == 0 {
            return Err(self.unexpected("array length"));
        }
        let span = self.span_from(first.span);
        let text = self.source[span.start..span.end].to_string();
        if count == 1 && first.kind == TokenKind::Int {
            Ok(ArrayLength::Literal(text))
        } else {
            Ok(ArrayLength::Expr(text))
        }
    }

    fn union(&mut self) -> PResult<TypeExpr> {
        let start = self.current().span;
        let mut terms = Vec::new();
        loop {
            let tilde = self.eat(TokenKind::Tilde);
            let ty = self.parse_type()?;
            terms.push(UnionTerm { tilde, ty });
            if !self.eat(TokenKind::Pipe) {
                break;
            }
        }
        if terms.len() == 1 && !terms[0].tilde {
            if let Some(term) = terms.pop() {
                return Ok(term.ty);
            }
        }
        Ok(TypeExpr::new(TypeExprKind::Union(terms), self.span_from(start)))
    }

    // =========================================================================
    // Signatures
    // =========================================================================

    fn signature(&mut self) -> PResult<FuncSig> {
        let params = self.param_list()?;
        let results = match self.peek() {
            TokenKind::LParen => self.param_list()?,
            kind if Self::starts_type(kind) => vec![Field::unnamed(self.parse_type()?)],
            _ => Vec::new(),
        };
        Ok(FuncSig { params, results })
    }

    fn param_type(&mut self) -> PResult<TypeExpr> {
        let start = self.current().span;
        if self.eat(TokenKind::Ellipsis) {
            let elem = self.parse_type()?;
            return Ok(TypeExpr::new(
                TypeExprKind::Ellipsis(Box::new(elem)),
                self.span_from(start),
            ));
        }
        self.parse_type()
    }

    /// Parse `(a, b int, c string)` or `(int, string)`.
    fn param_list(&mut self) -> PResult<Vec<Field>> {
        self.expect(TokenKind::LParen, "`(`")?;
        let mut entries: Vec<(TypeExpr, Option<TypeExpr>)> = Vec::new();
        loop {
            if self.peek() == TokenKind::RParen {
                break;
            }
            let first = self.param_type()?;
            let second = if matches!(self.peek(), TokenKind::Comma | TokenKind::RParen) {
                None
            } else {
                Some(self.param_type()?)
            };
            entries.push((first, second));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "`)`")?;

        let named = entries.iter().any(|(_, second)| second.is_some());
        if !named {
            return Ok(entries
                .into_iter()
                .map(|(ty, _)| Field::unnamed(ty))
                .collect());
        }

        let mut fields = Vec::new();
        let mut pending = Vec::new();
        for (first, second) in entries {
            let name = match first.as_ident() {
                Some(name) => name.to_string(),
                None => {
                    return Err(SyntaxError::UnexpectedToken {
                        expected: "parameter name".to_string(),
                        found: first.kind.shape().to_string(),
                        span: first.span.into(),
                    })
                }
            };
            pending.push(name);
            if let Some(ty) = second {
                fields.push(Field {
                    names: std::mem::take(&mut pending),
                    ty,
                });
            }
        }
        if !pending.is_empty() {
            return Err(SyntaxError::UnexpectedToken {
                expected: "parameter type".to_string(),
                found: "`)`".to_string(),
                span: self.span_from(self.current().span).into(),
            });
        }
        Ok(fields)
    }

    // =========================================================================
    // Composite literals
    // =========================================================================

    fn interface_body(&mut self) -> PResult<Vec<InterfaceElem>> {
        self.expect(TokenKind::LBrace, "`{`")?;
        let mut elems = Vec::new();
        loop {
            self.skip_semicolons();
            if self.eat(TokenKind::RBrace) {
                break;
            }
            elems.push(self.interface_elem()?);
            if !self.eat(TokenKind::Semicolon) {
                self.expect(TokenKind::RBrace, "`}`")?;
                break;
            }
        }
        Ok(elems)
    }

    fn interface_elem(&mut self) -> PResult<InterfaceElem> {
        if self.peek() == TokenKind::Ident && self.peek_at(1) == TokenKind::LParen {
            let start = self.current().span;
            let name = self.expect_ident("method name")?;
            let sig = self.signature()?;
            return Ok(InterfaceElem::Method {
                name,
                sig,
                span: self.span_from(start),
            });
        }
        let ty = self.union()?;
        Ok(match ty.kind {
            TypeExprKind::Union(terms) => InterfaceElem::Union(terms),
            _ => InterfaceElem::Embedded(ty),
        })
    }

    fn struct_body(&mut self) -> PResult<Vec<StructField>> {
        self.expect(TokenKind::LBrace, "`{`")?;
        let mut fields = Vec::new();
        loop {
            self.skip_semicolons();
            if self.eat(TokenKind::RBrace) {
                break;
            }
            let mut field = self.struct_field()?;
            if self.peek() == TokenKind::String {
                let tag = self.bump();
                field.tag = Some(unquote(tag.text(self.source)));
            }
            fields.push(field);
            if !self.eat(TokenKind::Semicolon) {
                self.expect(TokenKind::RBrace, "`}`")?;
                break;
            }
        }
        Ok(fields)
    }

    fn struct_field(&mut self) -> PResult<StructField> {
        let embedded = match self.peek() {
            TokenKind::Star => true,
            TokenKind::Ident => match self.peek_at(1) {
                TokenKind::Semicolon | TokenKind::RBrace | TokenKind::String | TokenKind::Dot => {
                    true
                }
                TokenKind::LBracket => self.is_instantiation(self.pos + 1),
                _ => false,
            },
            _ => false,
        };
        if embedded {
            return Ok(StructField {
                names: Vec::new(),
                ty: self.parse_type()?,
                tag: None,
            });
        }
        let mut names = vec![self.expect_ident("field name")?];
        while self.eat(TokenKind::Comma) {
            names.push(self.expect_ident("field name")?);
        }
        Ok(StructField {
            names,
            ty: self.parse_type()?,
            tag: None,
        })
    }
}

/// Strip the quotes from a string literal.
fn unquote(text: &str) -> String {
    let inner = text
        .strip_prefix(['"', '`'])
        .and_then(|t| t.strip_suffix(['"', '`']))
        .unwrap_or(text);
    inner.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> SourceFile {
        match parse_file("test.go", src) {
            Ok(file) => file,
            Err(errors) => panic!("parse failed: {:?}", errors),
        }
    }

    fn ty(src: &str) -> TypeExprKind {
        parse_type_expr(src).unwrap().kind
    }

    #[test]
    fn test_package_and_imports() {
        let file = parse(
            r#"
// Package doc.
package happy

import "fmt"

import (
	"io"
	nethttp "net/http"
	_ "embed"
	. "strings"
)
"#,
        );
        assert_eq!(file.package, "happy");
        let imports: Vec<_> = file
            .imports
            .iter()
            .map(|i| (i.name.clone(), i.path.as_str()))
            .collect();
        assert_eq!(
            imports,
            vec![
                (ImportName::Default, "fmt"),
                (ImportName::Default, "io"),
                (ImportName::Alias("nethttp".to_string()), "net/http"),
                (ImportName::Blank, "embed"),
                (ImportName::Dot, "strings"),
            ]
        );
    }

    #[test]
    fn test_type_specs() {
        let file = parse(
            r#"package p

type A interface {
	F(x int) (string, error)
}

type (
	B interface { A; G() }
	C = B
	D B
	E io.Reader
)
"#,
        );
        let names: Vec<_> = file.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D", "E"]);
        assert!(file.type_spec("C").unwrap().is_alias);
        assert!(!file.type_spec("D").unwrap().is_alias);
        assert_eq!(
            file.type_spec("E").unwrap().ty.kind,
            TypeExprKind::Qualified {
                package: "io".to_string(),
                name: "Reader".to_string()
            }
        );

        let TypeExprKind::Interface(elems) = &file.type_spec("B").unwrap().ty.kind else {
            panic!("expected interface");
        };
        assert_eq!(elems.len(), 2);
        assert!(matches!(&elems[0], InterfaceElem::Embedded(t) if t.as_ident() == Some("A")));
        assert!(matches!(&elems[1], InterfaceElem::Method { name, .. } if name == "G"));
    }

    #[test]
    fn test_skips_funcs_vars_consts() {
        let file = parse(
            r#"package p

const Max = 10

var (
	x = map[string]int{"a": 1}
	y struct{ a int }
)

func (s *S) Do(a, b int) (err error) {
	if a > b {
		return nil
	}
	for i := 0; i < 10; i++ {
	}
	return
}

func helper() {}

type S struct{}
"#,
        );
        assert_eq!(file.types.len(), 1);
        assert_eq!(file.types[0].name, "S");
    }

    #[test]
    fn test_param_grouping() {
        let TypeExprKind::Func(sig) = ty("func(a, b int, c ...string) (n int, err error)") else {
            panic!("expected func");
        };
        assert_eq!(sig.params.len(), 2);
        assert_eq!(sig.params[0].names, vec!["a", "b"]);
        assert_eq!(sig.params[1].names, vec!["c"]);
        assert!(matches!(sig.params[1].ty.kind, TypeExprKind::Ellipsis(_)));
        assert_eq!(sig.results.len(), 2);
        assert_eq!(sig.results[1].names, vec!["err"]);
    }

    #[test]
    fn test_unnamed_params() {
        let TypeExprKind::Func(sig) = ty("func(int, bool) (string, error)") else {
            panic!("expected func");
        };
        assert_eq!(sig.params.len(), 2);
        assert!(sig.params.iter().all(|f| f.names.is_empty()));
        assert_eq!(sig.results.len(), 2);
    }

    #[test]
    fn test_single_result() {
        let TypeExprKind::Func(sig) = ty("func() *os.File") else {
            panic!("expected func");
        };
        assert!(sig.params.is_empty());
        assert_eq!(sig.results.len(), 1);
        assert!(matches!(sig.results[0].ty.kind, TypeExprKind::Pointer(_)));
    }

    #[test]
    fn test_named_array_param() {
        let TypeExprKind::Func(sig) = ty("func(a [2]int, b []string, c List[int])") else {
            panic!("expected func");
        };
        assert_eq!(sig.params.len(), 3);
        assert!(matches!(
            &sig.params[0].ty.kind,
            TypeExprKind::Array { len: ArrayLength::Literal(n), .. } if n == "2"
        ));
        assert!(matches!(sig.params[1].ty.kind, TypeExprKind::Slice(_)));
        assert!(matches!(sig.params[2].ty.kind, TypeExprKind::Generic { .. }));
    }

    #[test]
    fn test_channels() {
        assert!(matches!(ty("chan int"), TypeExprKind::Chan { dir: ChanDir::Both, .. }));
        assert!(matches!(ty("chan<- int"), TypeExprKind::Chan { dir: ChanDir::Send, .. }));
        assert!(matches!(ty("<-chan int"), TypeExprKind::Chan { dir: ChanDir::Recv, .. }));
    }

    #[test]
    fn test_array_lengths() {
        assert!(matches!(
            ty("[0x10]byte"),
            TypeExprKind::Array { len: ArrayLength::Literal(_), .. }
        ));
        assert!(matches!(
            ty("[N * 2]byte"),
            TypeExprKind::Array { len: ArrayLength::Expr(e), .. } if e == "N * 2"
        ));
        assert!(matches!(
            ty("[...]byte"),
            TypeExprKind::Array { len: ArrayLength::Inferred, .. }
        ));
    }

    #[test]
    fn test_struct_fields_and_tags() {
        let TypeExprKind::Struct(fields) = ty(
            "struct {\n\tio.Reader\n\t*Base\n\tA, B string `json:\"a\"`\n\tC chan bool\n}",
        ) else {
            panic!("expected struct");
        };
        assert_eq!(fields.len(), 4);
        assert!(fields[0].is_embedded());
        assert!(fields[1].is_embedded());
        assert_eq!(fields[2].names, vec!["A", "B"]);
        assert_eq!(fields[2].tag.as_deref(), Some("json:\"a\""));
    }

    #[test]
    fn test_generic_declarations() {
        let file = parse(
            "package p\n\ntype List[T any] interface { Get(i int) T }\ntype Pair[K comparable, V any] struct{}\ntype Num interface { ~int | ~float64 }\ntype Arr [N]int\n",
        );
        let list = file.type_spec("List").unwrap();
        assert!(list.is_generic());
        assert_eq!(list.type_params[0].name, "T");

        let pair = file.type_spec("Pair").unwrap();
        assert_eq!(pair.type_params.len(), 2);

        let TypeExprKind::Interface(elems) = &file.type_spec("Num").unwrap().ty.kind else {
            panic!("expected interface");
        };
        assert!(matches!(&elems[0], InterfaceElem::Union(terms) if terms.len() == 2));

        assert!(!file.type_spec("Arr").unwrap().is_generic());
    }

    #[test]
    fn test_shared_type_param_constraint() {
        let file = parse("package p\ntype M[K, V any] interface{}\n");
        let params = &file.type_spec("M").unwrap().type_params;
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].constraint.as_ident(), Some("any"));
    }

    #[test]
    fn test_missing_package_clause() {
        let errors = parse_file("x.go", "type A int\n").unwrap_err();
        assert!(matches!(errors[0], SyntaxError::MissingPackageClause { .. }));
    }

    #[test]
    fn test_unexpected_token() {
        let errors = parse_file("x.go", "package p\ntype A interface { F( }\n").unwrap_err();
        assert!(matches!(errors[0], SyntaxError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_package_name_only() {
        assert_eq!(
            parse_package_name("// comment\npackage yaml // import \"gopkg.in/yaml.v3\"\n")
                .unwrap(),
            "yaml"
        );
        assert!(parse_package_name("").is_err());
    }
}
