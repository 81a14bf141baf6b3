//! Go lexer with automatic semicolon insertion.

use super::errors::SyntaxError;
use super::token::{Span, Token, TokenKind};

pub struct Lexer<'src> {
    source: &'src str,
    chars: std::iter::Peekable<std::str::CharIndices<'src>>,
    start: usize,
    current: usize,
    // Kind of the last emitted token, for semicolon insertion
    last: Option<TokenKind>,
    errors: Vec<SyntaxError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            start: 0,
            current: 0,
            last: None,
            errors: Vec::new(),
        }
    }

    /// Lex the whole source, returning tokens and any errors found.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<SyntaxError>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            tokens.push(token);
            if token.kind == TokenKind::Eof {
                break;
            }
        }
        (tokens, self.errors)
    }

    /// Get the next token from the source.
    pub fn next_token(&mut self) -> Token {
        loop {
            if self.skip_trivia() {
                return self.auto_semicolon();
            }

            self.start = self.current;
            let Some(c) = self.advance() else {
                if self.inserts_semicolon() {
                    return self.auto_semicolon();
                }
                return self.make_token(TokenKind::Eof);
            };

            let kind = match c {
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '[' => TokenKind::LBracket,
                ']' => TokenKind::RBracket,
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                ',' => TokenKind::Comma,
                ';' => TokenKind::Semicolon,
                '~' => TokenKind::Tilde,
                ':' => {
                    if self.match_char('=') {
                        TokenKind::Operator
                    } else {
                        TokenKind::Colon
                    }
                }
                '.' => {
                    if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                        self.number()
                    } else if self.peek() == Some('.') && self.peek_second() == Some('.') {
                        self.advance();
                        self.advance();
                        TokenKind::Ellipsis
                    } else {
                        TokenKind::Dot
                    }
                }
                '*' => self.operator_eq(TokenKind::Star),
                '=' => {
                    if self.match_char('=') {
                        TokenKind::Operator
                    } else {
                        TokenKind::Assign
                    }
                }
                '|' => {
                    if self.match_char('|') || self.match_char('=') {
                        TokenKind::Operator
                    } else {
                        TokenKind::Pipe
                    }
                }
                '<' => {
                    if self.match_char('-') {
                        TokenKind::Arrow
                    } else {
                        if self.match_char('<') {
                            self.match_char('=');
                        } else {
                            self.match_char('=');
                        }
                        TokenKind::Operator
                    }
                }
                '>' => {
                    if self.match_char('>') {
                        self.match_char('=');
                    } else {
                        self.match_char('=');
                    }
                    TokenKind::Operator
                }
                '+' | '-' => {
                    if self.match_char(c) {
                        TokenKind::IncDec
                    } else {
                        self.match_char('=');
                        TokenKind::Operator
                    }
                }
                '&' => {
                    if !self.match_char('&') && self.match_char('^') {
                        self.match_char('=');
                    } else {
                        self.match_char('=');
                    }
                    TokenKind::Operator
                }
                '/' | '%' | '^' | '!' => self.operator_eq(TokenKind::Operator),
                '"' => self.interpreted_string('"', TokenKind::String),
                '\'' => self.interpreted_string('\'', TokenKind::Rune),
                '`' => self.raw_string(),
                c if c.is_ascii_digit() => self.number(),
                c if is_ident_start(c) => self.identifier(),
                other => {
                    self.errors.push(SyntaxError::UnexpectedCharacter {
                        ch: other,
                        span: self.span().into(),
                    });
                    continue;
                }
            };
            return self.make_token(kind);
        }
    }

    fn span(&self) -> Span {
        Span::new(self.start, self.current)
    }

    fn make_token(&mut self, kind: TokenKind) -> Token {
        self.last = Some(kind);
        Token::new(kind, self.span())
    }

    fn inserts_semicolon(&self) -> bool {
        self.last.is_some_and(|k| k.ends_statement())
    }

    fn auto_semicolon(&mut self) -> Token {
        self.last = Some(TokenKind::Semicolon);
        Token::new(TokenKind::Semicolon, Span::new(self.current, self.current))
    }

    fn advance(&mut self) -> Option<char> {
        let (idx, c) = self.chars.next()?;
        self.current = idx + c.len_utf8();
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_second(&self) -> Option<char> {
        let mut it = self.source[self.current..].chars();
        it.next();
        it.next()
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn operator_eq(&mut self, kind: TokenKind) -> TokenKind {
        if self.match_char('=') {
            TokenKind::Operator
        } else {
            kind
        }
    }

    /// Skip whitespace and comments. Returns true when a newline (or a
    /// comment spanning one) was crossed at a point where Go inserts a
    /// semicolon.
    fn skip_trivia(&mut self) -> bool {
        loop {
            match self.peek() {
                Some('\n') => {
                    if self.inserts_semicolon() {
                        // The newline itself terminates the statement.
                        self.start = self.current;
                        self.advance();
                        return true;
                    }
                    self.advance();
                }
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') => match self.peek_second() {
                    Some('/') => {
                        while let Some(c) = self.peek() {
                            if c == '\n' {
                                break;
                            }
                            self.advance();
                        }
                    }
                    Some('*') => {
                        let start = self.current;
                        self.advance();
                        self.advance();
                        let mut crossed_newline = false;
                        let mut closed = false;
                        while let Some(c) = self.advance() {
                            if c == '\n' {
                                crossed_newline = true;
                            } else if c == '*' && self.peek() == Some('/') {
                                self.advance();
                                closed = true;
                                break;
                            }
                        }
                        if !closed {
                            self.errors.push(SyntaxError::UnterminatedComment {
                                span: Span::new(start, self.current).into(),
                            });
                        }
                        if crossed_newline && self.inserts_semicolon() {
                            return true;
                        }
                    }
                    _ => return false,
                },
                _ => return false,
            }
        }
    }

    fn identifier(&mut self) -> TokenKind {
        while self.peek().is_some_and(is_ident_continue) {
            self.advance();
        }
        TokenKind::keyword(&self.source[self.start..self.current]).unwrap_or(TokenKind::Ident)
    }

    fn number(&mut self) -> TokenKind {
        let text_start = self.start;
        let hex = self.source[text_start..].starts_with("0x")
            || self.source[text_start..].starts_with("0X");
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_alphanumeric() || c == '_' || c == '.' => {
                    self.advance();
                    let exponent = if hex {
                        c == 'p' || c == 'P'
                    } else {
                        c == 'e' || c == 'E'
                    };
                    if exponent && matches!(self.peek(), Some('+') | Some('-')) {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
        let text = &self.source[text_start..self.current];
        if text.ends_with('i') {
            TokenKind::Imaginary
        } else if hex {
            if text.contains('.') || text.contains('p') || text.contains('P') {
                TokenKind::Float
            } else {
                TokenKind::Int
            }
        } else if text.contains('.') || text.contains('e') || text.contains('E') {
            TokenKind::Float
        } else {
            TokenKind::Int
        }
    }

    fn interpreted_string(&mut self, quote: char, kind: TokenKind) -> TokenKind {
        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.errors.push(SyntaxError::UnterminatedString {
                        span: self.span().into(),
                    });
                    return kind;
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some(c) => {
                    self.advance();
                    if c == quote {
                        return kind;
                    }
                }
            }
        }
    }

    fn raw_string(&mut self) -> TokenKind {
        loop {
            match self.advance() {
                None => {
                    self.errors.push(SyntaxError::UnterminatedString {
                        span: self.span().into(),
                    });
                    return TokenKind::String;
                }
                Some('`') => return TokenKind::String,
                Some(_) => {}
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Lex `source` into tokens.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<SyntaxError>) {
    Lexer::new(source).tokenize()
}
