//! File selection by build constraints.
//!
//! A file is part of the build for a target when its name carries no
//! `_GOOS`/`_GOARCH` suffix for another platform and its `//go:build` line
//! (or legacy `// +build` lines) evaluates to true.

const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "armbe", "arm64", "arm64be", "loong64", "mips", "mipsle",
    "mips64", "mips64le", "mips64p32", "mips64p32le", "ppc", "ppc64", "ppc64le", "riscv",
    "riscv64", "s390", "s390x", "sparc", "sparc64", "wasm",
];

const UNIX_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "linux",
    "netbsd", "openbsd", "solaris",
];

/// The platform files are selected for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    pub goos: String,
    pub goarch: String,
}

impl BuildContext {
    pub fn new(goos: impl Into<String>, goarch: impl Into<String>) -> Self {
        BuildContext {
            goos: goos.into(),
            goarch: goarch.into(),
        }
    }

    fn matches_os(&self, os: &str) -> bool {
        self.goos == os
            || (os == "linux" && self.goos == "android")
            || (os == "solaris" && self.goos == "illumos")
            || (os == "darwin" && self.goos == "ios")
    }

    /// Check a build tag.
    fn has_tag(&self, tag: &str) -> bool {
        match tag {
            "unix" => UNIX_OS.contains(&self.goos.as_str()),
            "gc" => true,
            // Release tags: every go1.N is satisfied.
            t if t.starts_with("go1.") => true,
            t if KNOWN_OS.contains(&t) => self.matches_os(t),
            t => t == self.goarch,
        }
    }

    /// Check a file name against `_GOOS`, `_GOARCH`, and `_GOOS_GOARCH`
    /// suffixes.
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        let stem = file_name.strip_suffix(".go").unwrap_or(file_name);
        let Some(idx) = stem.find('_') else {
            return true;
        };
        let parts: Vec<&str> = stem[idx..].split('_').collect();
        let n = parts.len();
        if n >= 2 && KNOWN_OS.contains(&parts[n - 2]) && KNOWN_ARCH.contains(&parts[n - 1]) {
            return self.matches_os(parts[n - 2]) && self.goarch == parts[n - 1];
        }
        let last = parts[n - 1];
        if KNOWN_OS.contains(&last) {
            return self.matches_os(last);
        }
        if KNOWN_ARCH.contains(&last) {
            return self.goarch == last;
        }
        true
    }

    /// Check the build constraint lines in the file header.
    pub fn matches_source(&self, source: &str) -> bool {
        let mut legacy = Vec::new();
        for line in source.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(expr) = line.strip_prefix("//go:build") {
                return self.eval(expr.trim()).unwrap_or(false);
            }
            if let Some(expr) = line.strip_prefix("// +build") {
                legacy.push(expr.trim());
                continue;
            }
            if !line.starts_with("//") {
                break;
            }
        }
        // Legacy lines: space-separated options are ORed, comma-separated
        // terms ANDed, and separate lines ANDed.
        legacy.iter().all(|line| {
            line.split_whitespace().any(|option| {
                option.split(',').all(|term| match term.strip_prefix('!') {
                    Some(tag) => !self.has_tag(tag),
                    None => self.has_tag(term),
                })
            })
        })
    }

    /// Evaluate a `//go:build` expression. Returns `None` when the
    /// expression does not parse.
    pub fn eval(&self, expr: &str) -> Option<bool> {
        let tokens = tokenize_constraint(expr)?;
        let mut parser = ConstraintParser {
            ctx: self,
            tokens: &tokens,
            pos: 0,
        };
        let value = parser.or()?;
        (parser.pos == tokens.len()).then_some(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ConstraintToken {
    Tag(String),
    Not,
    And,
    Or,
    LParen,
    RParen,
}

fn tokenize_constraint(expr: &str) -> Option<Vec<ConstraintToken>> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ' ' | '\t' => {}
            '!' => tokens.push(ConstraintToken::Not),
            '(' => tokens.push(ConstraintToken::LParen),
            ')' => tokens.push(ConstraintToken::RParen),
            '&' if chars.next_if_eq(&'&').is_some() => tokens.push(ConstraintToken::And),
            '|' if chars.next_if_eq(&'|').is_some() => tokens.push(ConstraintToken::Or),
            c if c.is_alphanumeric() || c == '_' || c == '.' => {
                let mut tag = c.to_string();
                while let Some(next) = chars.next_if(|n| n.is_alphanumeric() || *n == '_' || *n == '.')
                {
                    tag.push(next);
                }
                tokens.push(ConstraintToken::Tag(tag));
            }
            _ => return None,
        }
    }
    Some(tokens)
}

struct ConstraintParser<'a> {
    ctx: &'a BuildContext,
    tokens: &'a [ConstraintToken],
    pos: usize,
}

impl ConstraintParser<'_> {
    fn peek(&self) -> Option<&ConstraintToken> {
        self.tokens.get(self.pos)
    }

    fn or(&mut self) -> Option<bool> {
        let mut value = self.and()?;
        while self.peek() == Some(&ConstraintToken::Or) {
            self.pos += 1;
            let rhs = self.and()?;
            value = value || rhs;
        }
        Some(value)
    }

    fn and(&mut self) -> Option<bool> {
        let mut value = self.not()?;
        while self.peek() == Some(&ConstraintToken::And) {
            self.pos += 1;
            let rhs = self.not()?;
            value = value && rhs;
        }
        Some(value)
    }

    fn not(&mut self) -> Option<bool> {
        let token = self.peek()?.clone();
        self.pos += 1;
        match token {
            ConstraintToken::Not => self.not().map(|v| !v),
            ConstraintToken::LParen => {
                let value = self.or()?;
                (self.peek() == Some(&ConstraintToken::RParen)).then(|| {
                    self.pos += 1;
                    value
                })
            }
            ConstraintToken::Tag(tag) => Some(self.ctx.has_tag(&tag)),
            _ => None,
        }
    }
}
