//! Minimal JavaScript tokenizer.
//!
//! Just enough lexing to find declaration calls and module syntax without
//! being fooled by comments or string contents. It never fails: anything it
//! does not understand becomes a punctuation token.

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Ident(String),
    /// A quoted string literal, escapes decoded.
    Str(String),
    Number,
    /// A template literal; its contents are not inspected.
    Template,
    Regex,
    Punct(char),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

impl Token {
    pub fn is_ident(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident(ident) if ident == name)
    }

    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }

    pub fn as_str_lit(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Str(value) => Some(value),
            _ => None,
        }
    }
}

/// Keywords after which a `/` starts a regular expression.
const REGEX_PRECEDING_KEYWORDS: &[&str] = &[
    "return", "typeof", "case", "do", "else", "in", "instanceof", "new", "delete", "void",
    "throw", "yield", "await",
];

pub struct Lexer {
    chars: Vec<char>,
    idx: usize,
    line: usize,
}

impl Lexer {
    pub fn new(src: &str) -> Self {
        Lexer {
            chars: src.chars().collect(),
            idx: 0,
            line: 1,
        }
    }

    pub fn lex_all(mut self) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::new();
        while let Some(kind) = self.next_kind(tokens.last()) {
            let line = self.line;
            tokens.push(Token { kind, line });
        }
        tokens
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.idx).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.idx + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.idx += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn next_kind(&mut self, prev: Option<&Token>) -> Option<TokenKind> {
        loop {
            let c = self.peek()?;
            match c {
                c if c.is_whitespace() => {
                    self.bump();
                }
                '/' if self.peek_at(1) == Some('/') => self.skip_line_comment(),
                '/' if self.peek_at(1) == Some('*') => self.skip_block_comment(),
                '\'' | '"' => {
                    self.bump();
                    return Some(TokenKind::Str(self.read_string(c)));
                }
                '`' => {
                    self.bump();
                    self.skip_template();
                    return Some(TokenKind::Template);
                }
                '/' if regex_allowed(prev) => {
                    self.bump();
                    self.skip_regex();
                    return Some(TokenKind::Regex);
                }
                c if c.is_ascii_digit() => {
                    while self
                        .peek()
                        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
                    {
                        self.bump();
                    }
                    return Some(TokenKind::Number);
                }
                c if is_ident_char(c) => {
                    let mut ident = String::new();
                    while let Some(c) = self.peek().filter(|c| is_ident_char(*c)) {
                        ident.push(c);
                        self.bump();
                    }
                    return Some(TokenKind::Ident(ident));
                }
                other => {
                    self.bump();
                    return Some(TokenKind::Punct(other));
                }
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) {
        self.bump();
        self.bump();
        while let Some(c) = self.bump() {
            if c == '*' && self.peek() == Some('/') {
                self.bump();
                break;
            }
        }
    }

    /// Read a quoted string; the opening quote is already consumed.
    ///
    /// An unterminated string ends at the line break.
    fn read_string(&mut self, quote: char) -> String {
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
            match c {
                c if c == quote => break,
                '\\' => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('\n') | None => {}
                    Some(escaped) => value.push(escaped),
                },
                c => value.push(c),
            }
        }
        value
    }

    fn skip_template(&mut self) {
        let mut depth = 0usize;
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    self.bump();
                }
                '`' if depth == 0 => break,
                '$' if depth == 0 && self.peek() == Some('{') => {
                    self.bump();
                    depth = 1;
                }
                '`' => self.skip_template(),
                '{' if depth > 0 => depth += 1,
                '}' if depth > 0 => depth -= 1,
                '\'' | '"' if depth > 0 => {
                    self.read_string(c);
                }
                _ => {}
            }
        }
    }

    fn skip_regex(&mut self) {
        let mut in_class = false;
        while let Some(c) = self.peek() {
            if c == '\n' {
                return;
            }
            self.bump();
            match c {
                '\\' => {
                    self.bump();
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => break,
                _ => {}
            }
        }
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn regex_allowed(prev: Option<&Token>) -> bool {
    match prev.map(|t| &t.kind) {
        None => true,
        Some(TokenKind::Punct(c)) => !matches!(c, ')' | ']' | '}'),
        Some(TokenKind::Ident(ident)) => REGEX_PRECEDING_KEYWORDS.contains(&ident.as_str()),
        Some(_) => false,
    }
}

/// Tokenize `text`, dropping comments and whitespace.
pub fn tokenize(text: &str) -> Vec<Token> {
    Lexer::new(text).lex_all()
}

/// Blank out comments while keeping string literals and line structure.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q || c == '\n' {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                while chars.peek().is_some_and(|c| *c != '\n') {
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
                out.push(' ');
            }
            c => out.push(c),
        }
    }

    out
}
