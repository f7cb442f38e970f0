//! Tokenizer for tyn type annotations and declaration files.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - Token types
//! - `ScannerState` - Tokenizer state machine with save/restore for lookahead
//!
//! Only the declaration subset of TypeScript is recognised: there are no
//! template literals, regular expressions or operators beyond what type
//! annotations use.

use serde::Serialize;
use tyn_common::Span;
use tyn_common::diagnostics::{Diagnostic, diagnostic_codes};

/// Token kinds produced by the scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SyntaxKind {
    Unknown,
    EndOfFileToken,

    // Literals
    Identifier,
    StringLiteral,
    NumericLiteral,
    BigIntLiteral,
    /// A backtick string; only seen inside skipped bodies.
    TemplateLiteral,

    // Punctuation
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    LessThanToken,
    GreaterThanToken,
    CommaToken,
    SemicolonToken,
    ColonToken,
    QuestionToken,
    BarToken,
    AmpersandToken,
    EqualsToken,
    EqualsGreaterThanToken,
    DotToken,
    DotDotDotToken,
    MinusToken,
    /// Expression operators (`!`, `*`, `+`, `/`, `%`, ...) that only occur in skipped bodies.
    OperatorToken,

    // Declaration keywords
    TypeKeyword,
    InterfaceKeyword,
    ClassKeyword,
    DeclareKeyword,
    FunctionKeyword,
    ConstKeyword,
    ReadonlyKeyword,
    NewKeyword,
    ExtendsKeyword,

    // Type operator keywords
    TypeOfKeyword,
    IsKeyword,
    AssertsKeyword,
    ThisKeyword,

    // Literal keywords
    NullKeyword,
    UndefinedKeyword,
    TrueKeyword,
    FalseKeyword,

    // Primitive type keywords
    StringKeyword,
    NumberKeyword,
    BooleanKeyword,
    BigIntKeyword,
    SymbolKeyword,
    ObjectKeyword,
    AnyKeyword,
    UnknownKeyword,
    NeverKeyword,
    VoidKeyword,
}

impl SyntaxKind {
    /// Map identifier text to its keyword kind, if it is one.
    pub fn keyword_from_text(text: &str) -> Option<SyntaxKind> {
        Some(match text {
            "type" => SyntaxKind::TypeKeyword,
            "interface" => SyntaxKind::InterfaceKeyword,
            "class" => SyntaxKind::ClassKeyword,
            "declare" => SyntaxKind::DeclareKeyword,
            "function" => SyntaxKind::FunctionKeyword,
            "const" => SyntaxKind::ConstKeyword,
            "readonly" => SyntaxKind::ReadonlyKeyword,
            "new" => SyntaxKind::NewKeyword,
            "extends" => SyntaxKind::ExtendsKeyword,
            "typeof" => SyntaxKind::TypeOfKeyword,
            "is" => SyntaxKind::IsKeyword,
            "asserts" => SyntaxKind::AssertsKeyword,
            "this" => SyntaxKind::ThisKeyword,
            "null" => SyntaxKind::NullKeyword,
            "undefined" => SyntaxKind::UndefinedKeyword,
            "true" => SyntaxKind::TrueKeyword,
            "false" => SyntaxKind::FalseKeyword,
            "string" => SyntaxKind::StringKeyword,
            "number" => SyntaxKind::NumberKeyword,
            "boolean" => SyntaxKind::BooleanKeyword,
            "bigint" => SyntaxKind::BigIntKeyword,
            "symbol" => SyntaxKind::SymbolKeyword,
            "object" => SyntaxKind::ObjectKeyword,
            "any" => SyntaxKind::AnyKeyword,
            "unknown" => SyntaxKind::UnknownKeyword,
            "never" => SyntaxKind::NeverKeyword,
            "void" => SyntaxKind::VoidKeyword,
            _ => return None,
        })
    }

    #[inline]
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (SyntaxKind::TypeKeyword as u16)
    }

    /// Source text of a punctuation token, used in `'{0}' expected.` messages.
    pub fn punctuation_text(self) -> &'static str {
        match self {
            SyntaxKind::OpenBraceToken => "{",
            SyntaxKind::CloseBraceToken => "}",
            SyntaxKind::OpenParenToken => "(",
            SyntaxKind::CloseParenToken => ")",
            SyntaxKind::OpenBracketToken => "[",
            SyntaxKind::CloseBracketToken => "]",
            SyntaxKind::LessThanToken => "<",
            SyntaxKind::GreaterThanToken => ">",
            SyntaxKind::CommaToken => ",",
            SyntaxKind::SemicolonToken => ";",
            SyntaxKind::ColonToken => ":",
            SyntaxKind::QuestionToken => "?",
            SyntaxKind::BarToken => "|",
            SyntaxKind::AmpersandToken => "&",
            SyntaxKind::EqualsToken => "=",
            SyntaxKind::EqualsGreaterThanToken => "=>",
            SyntaxKind::DotToken => ".",
            SyntaxKind::DotDotDotToken => "...",
            SyntaxKind::MinusToken => "-",
            SyntaxKind::Identifier => "identifier",
            SyntaxKind::IsKeyword => "is",
            _ => "token",
        }
    }
}

/// Saved scanner position for speculative lookahead.
#[derive(Clone, Copy, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    token_value_start: usize,
    token_value_end: usize,
    preceding_line_break: bool,
}

/// Tokenizer state machine over a single source text.
pub struct ScannerState {
    text: String,
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    // The cooked value of the current token lives in `value` for string
    // literals (escapes resolved) and in the source range otherwise.
    value: String,
    token_value_start: usize,
    token_value_end: usize,
    preceding_line_break: bool,
    diagnostics: Vec<Diagnostic>,
}

impl ScannerState {
    pub fn new(text: impl Into<String>) -> Self {
        ScannerState {
            text: text.into(),
            pos: 0,
            token: SyntaxKind::Unknown,
            token_start: 0,
            value: String::new(),
            token_value_start: 0,
            token_value_end: 0,
            preceding_line_break: false,
            diagnostics: Vec::new(),
        }
    }

    #[inline]
    pub fn source_text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn get_token(&self) -> SyntaxKind {
        self.token
    }

    #[inline]
    pub fn get_token_start(&self) -> u32 {
        self.token_start as u32
    }

    #[inline]
    pub fn get_token_end(&self) -> u32 {
        self.pos as u32
    }

    #[inline]
    pub fn token_span(&self) -> Span {
        Span::new(self.token_start as u32, self.pos as u32)
    }

    /// Whether a line break separates the current token from the previous one.
    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.preceding_line_break
    }

    /// Text of the current token. For string literals this is the cooked
    /// value without quotes; for everything else the raw source text.
    pub fn get_token_value_ref(&self) -> &str {
        if self.token == SyntaxKind::StringLiteral {
            &self.value
        } else {
            self.text
                .get(self.token_value_start..self.token_value_end)
                .unwrap_or("")
        }
    }

    /// Take the diagnostics reported so far (unterminated strings, invalid characters).
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            token: self.token,
            token_start: self.token_start,
            token_value_start: self.token_value_start,
            token_value_end: self.token_value_end,
            preceding_line_break: self.preceding_line_break,
        }
    }

    /// Restore a snapshot. String literal values are re-cooked lazily, so a
    /// restored string token re-scans its own source range.
    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.token = snapshot.token;
        self.token_start = snapshot.token_start;
        self.token_value_start = snapshot.token_value_start;
        self.token_value_end = snapshot.token_value_end;
        self.preceding_line_break = snapshot.preceding_line_break;
        if self.token == SyntaxKind::StringLiteral {
            let errors = self.diagnostics.len();
            let end = self.pos;
            self.pos = self.token_start;
            self.scan_string_literal();
            self.pos = end;
            self.diagnostics.truncate(errors);
        }
    }

    /// Advance to the next token and return its kind.
    pub fn scan(&mut self) -> SyntaxKind {
        self.preceding_line_break = false;
        self.skip_trivia();
        self.token_start = self.pos;
        self.token_value_start = self.pos;

        let Some(ch) = self.current_char() else {
            self.token = SyntaxKind::EndOfFileToken;
            self.token_value_end = self.pos;
            return self.token;
        };

        self.token = match ch {
            '{' => self.single(SyntaxKind::OpenBraceToken),
            '}' => self.single(SyntaxKind::CloseBraceToken),
            '(' => self.single(SyntaxKind::OpenParenToken),
            ')' => self.single(SyntaxKind::CloseParenToken),
            '[' => self.single(SyntaxKind::OpenBracketToken),
            ']' => self.single(SyntaxKind::CloseBracketToken),
            '<' => self.single(SyntaxKind::LessThanToken),
            '>' => self.single(SyntaxKind::GreaterThanToken),
            ',' => self.single(SyntaxKind::CommaToken),
            ';' => self.single(SyntaxKind::SemicolonToken),
            ':' => self.single(SyntaxKind::ColonToken),
            '?' => self.single(SyntaxKind::QuestionToken),
            '|' => self.single(SyntaxKind::BarToken),
            '&' => self.single(SyntaxKind::AmpersandToken),
            '-' => self.single(SyntaxKind::MinusToken),
            '=' => {
                if self.peek_char(1) == Some('>') {
                    self.pos += 2;
                    SyntaxKind::EqualsGreaterThanToken
                } else {
                    self.single(SyntaxKind::EqualsToken)
                }
            }
            '.' => {
                if self.peek_char(1) == Some('.') && self.peek_char(2) == Some('.') {
                    self.pos += 3;
                    SyntaxKind::DotDotDotToken
                } else {
                    self.single(SyntaxKind::DotToken)
                }
            }
            '"' | '\'' => self.scan_string_literal(),
            '`' => self.scan_template_literal(),
            '!' | '*' | '+' | '/' | '%' | '^' | '~' | '@' => self.single(SyntaxKind::OperatorToken),
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_identifier_start(c) => self.scan_identifier(),
            c => {
                self.pos += c.len_utf8();
                self.diagnostics.push(
                    Diagnostic::from_code(diagnostic_codes::INVALID_CHARACTER, &[]).at(
                        "",
                        self.token_start as u32,
                        c.len_utf8() as u32,
                    ),
                );
                SyntaxKind::Unknown
            }
        };
        if !matches!(
            self.token,
            SyntaxKind::StringLiteral | SyntaxKind::BigIntLiteral
        ) {
            self.token_value_end = self.pos;
        }
        self.token
    }

    fn single(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        kind
    }

    #[inline]
    fn current_char(&self) -> Option<char> {
        self.text.get(self.pos..).and_then(|rest| rest.chars().next())
    }

    #[inline]
    fn peek_char(&self, offset: usize) -> Option<char> {
        self.text
            .get(self.pos..)
            .and_then(|rest| rest.chars().nth(offset))
    }

    fn skip_trivia(&mut self) {
        while let Some(ch) = self.current_char() {
            match ch {
                '\n' | '\r' => {
                    self.preceding_line_break = true;
                    self.pos += 1;
                }
                c if c.is_whitespace() => self.pos += c.len_utf8(),
                '/' if self.peek_char(1) == Some('/') => {
                    while let Some(c) = self.current_char() {
                        if c == '\n' {
                            break;
                        }
                        self.pos += c.len_utf8();
                    }
                }
                '/' if self.peek_char(1) == Some('*') => {
                    self.pos += 2;
                    loop {
                        match self.current_char() {
                            None => break,
                            Some('*') if self.peek_char(1) == Some('/') => {
                                self.pos += 2;
                                break;
                            }
                            Some(c) => {
                                if c == '\n' {
                                    self.preceding_line_break = true;
                                }
                                self.pos += c.len_utf8();
                            }
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn scan_string_literal(&mut self) -> SyntaxKind {
        let Some(quote) = self.current_char() else {
            return SyntaxKind::Unknown;
        };
        self.pos += 1;
        self.value.clear();
        loop {
            match self.current_char() {
                None | Some('\n') => {
                    self.diagnostics.push(
                        Diagnostic::from_code(diagnostic_codes::UNTERMINATED_STRING_LITERAL, &[])
                            .at(
                                "",
                                self.token_start as u32,
                                (self.pos - self.token_start) as u32,
                            ),
                    );
                    break;
                }
                Some(c) if c == quote => {
                    self.pos += 1;
                    break;
                }
                Some('\\') => {
                    self.pos += 1;
                    if let Some(escaped) = self.current_char() {
                        self.pos += escaped.len_utf8();
                        self.value.push(match escaped {
                            'n' => '\n',
                            't' => '\t',
                            'r' => '\r',
                            '0' => '\0',
                            other => other,
                        });
                    }
                }
                Some(c) => {
                    self.pos += c.len_utf8();
                    self.value.push(c);
                }
            }
        }
        self.token_value_end = self.pos;
        SyntaxKind::StringLiteral
    }

    /// Skip to the closing backtick; substitutions are not tokenized.
    fn scan_template_literal(&mut self) -> SyntaxKind {
        self.pos += 1;
        loop {
            match self.current_char() {
                None => {
                    self.diagnostics.push(
                        Diagnostic::from_code(diagnostic_codes::UNTERMINATED_STRING_LITERAL, &[])
                            .at(
                                "",
                                self.token_start as u32,
                                (self.pos - self.token_start) as u32,
                            ),
                    );
                    break;
                }
                Some('`') => {
                    self.pos += 1;
                    break;
                }
                Some('\\') => {
                    self.pos += 1;
                    if let Some(escaped) = self.current_char() {
                        self.pos += escaped.len_utf8();
                    }
                }
                Some(c) => self.pos += c.len_utf8(),
            }
        }
        SyntaxKind::TemplateLiteral
    }

    fn scan_number(&mut self) -> SyntaxKind {
        while let Some(c) = self.current_char() {
            if c.is_ascii_digit() || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.current_char() == Some('n') {
            self.token_value_end = self.pos;
            self.pos += 1;
            // The value excludes the `n` suffix.
            return SyntaxKind::BigIntLiteral;
        }
        if self.current_char() == Some('.')
            && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.pos += 1;
            while let Some(c) = self.current_char() {
                if c.is_ascii_digit() {
                    self.pos += 1;
                } else {
                    break;
                }
            }
        }
        SyntaxKind::NumericLiteral
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        while let Some(c) = self.current_char() {
            if is_identifier_part(c) {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        let text = self.text.get(self.token_start..self.pos).unwrap_or("");
        SyntaxKind::keyword_from_text(text).unwrap_or(SyntaxKind::Identifier)
    }
}

#[inline]
fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

#[inline]
fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
#[path = "../tests/scanner_tests.rs"]
mod scanner_tests;
