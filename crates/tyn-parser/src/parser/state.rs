//! Parser state - token cursor, expectations and diagnostics

use crate::ast::Ident;
use tyn_common::Span;
use tyn_common::diagnostics::{Diagnostic, diagnostic_codes};
use tyn_scanner::{ScannerState, SyntaxKind};

pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub(crate) current_token: SyntaxKind,
    pub(crate) file_name: String,
    diagnostics: Vec<Diagnostic>,
    /// End of the last consumed token, for node spans.
    last_token_end: u32,
    /// Position of the last reported error; suppresses cascades at one spot.
    last_error_pos: Option<u32>,
    /// Number of enclosing types being parsed.
    pub(crate) recursion_depth: u32,
}

impl ParserState {
    pub fn new(file_name: &str, text: &str) -> Self {
        let mut scanner = ScannerState::new(text);
        let current_token = scanner.scan();
        ParserState {
            scanner,
            current_token,
            file_name: file_name.to_string(),
            diagnostics: Vec::new(),
            last_token_end: 0,
            last_error_pos: None,
            recursion_depth: 0,
        }
    }

    pub fn into_diagnostics(mut self) -> Vec<Diagnostic> {
        let file_name = self.file_name.clone();
        let mut scanner_diagnostics = self.scanner.take_diagnostics();
        for diag in &mut scanner_diagnostics {
            diag.file = file_name.clone();
        }
        self.diagnostics.extend(scanner_diagnostics);
        self.diagnostics.sort_by_key(|d| d.start);
        self.diagnostics
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.current_token == kind
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.last_token_end = self.scanner.get_token_end();
        self.current_token = self.scanner.scan();
        self.current_token
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.scanner.get_token_start()
    }

    #[inline]
    pub(crate) fn token_end(&self) -> u32 {
        self.scanner.get_token_end()
    }

    #[inline]
    pub(crate) fn last_end(&self) -> u32 {
        self.last_token_end
    }

    /// Span from `start` to the end of the last consumed token.
    #[inline]
    pub(crate) fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.last_token_end.max(start))
    }

    pub(crate) fn token_text(&self) -> &str {
        self.scanner.get_token_value_ref()
    }

    /// Identifiers and keywords are both valid property and parameter names.
    pub(crate) fn is_identifier_or_keyword(&self) -> bool {
        self.current_token == SyntaxKind::Identifier || self.current_token.is_keyword()
    }

    /// Run `f` speculatively and restore the cursor afterwards.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let snapshot = self.scanner.save_state();
        let current = self.current_token;
        let last_end = self.last_token_end;
        let diagnostics = self.diagnostics.len();
        let result = f(self);
        self.scanner.restore_state(snapshot);
        self.current_token = current;
        self.last_token_end = last_end;
        self.diagnostics.truncate(diagnostics);
        result
    }

    // =========================================================================
    // Expectations
    // =========================================================================

    /// Consume `kind` or report `'{kind}' expected.` and leave the cursor.
    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            self.error_expected(kind.punctuation_text());
            false
        }
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    /// Consume an identifier (keywords allowed when `allow_keywords`).
    pub(crate) fn parse_identifier_name(&mut self, allow_keywords: bool) -> Ident {
        let start = self.token_pos();
        let ok = self.is_token(SyntaxKind::Identifier)
            || (allow_keywords && self.current_token.is_keyword());
        if ok {
            let ident = Ident::new(self.token_text(), Span::new(start, self.token_end()));
            self.next_token();
            ident
        } else {
            self.error_expected("identifier");
            Ident::new("", Span::at(start))
        }
    }

    /// Optional `;`; a line break or closing brace also terminates a declaration.
    pub(crate) fn parse_semicolon(&mut self) {
        if self.parse_optional(SyntaxKind::SemicolonToken) {
            return;
        }
        if self.is_token(SyntaxKind::CloseBraceToken)
            || self.is_token(SyntaxKind::EndOfFileToken)
            || self.scanner.has_preceding_line_break()
        {
            return;
        }
        self.error_expected(";");
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub(crate) fn error_expected(&mut self, what: &str) {
        self.error_at_current(diagnostic_codes::EXPECTED, &[what]);
    }

    pub(crate) fn error_type_expected(&mut self) {
        self.error_at_current(diagnostic_codes::TYPE_EXPECTED, &[]);
    }

    pub(crate) fn error_at_current(&mut self, code: u32, args: &[&str]) {
        let start = self.token_pos();
        let length = self.token_end().saturating_sub(start);
        self.error_at(start, length, code, args);
    }

    pub(crate) fn error_at(&mut self, start: u32, length: u32, code: u32, args: &[&str]) {
        if self.last_error_pos == Some(start) {
            return;
        }
        self.last_error_pos = Some(start);
        tracing::debug!(code, start, "parse error");
        self.diagnostics
            .push(Diagnostic::from_code(code, args).at(&self.file_name, start, length));
    }

    // =========================================================================
    // Recovery
    // =========================================================================

    /// Skip a balanced `{ ... }` block starting at the current `{`.
    pub(crate) fn skip_block(&mut self) {
        self.skip_balanced(SyntaxKind::OpenBraceToken, SyntaxKind::CloseBraceToken);
    }

    pub(crate) fn skip_balanced(&mut self, open: SyntaxKind, close: SyntaxKind) {
        if !self.is_token(open) {
            return;
        }
        let mut depth = 0u32;
        loop {
            match self.current_token {
                SyntaxKind::EndOfFileToken => return,
                kind if kind == open => depth += 1,
                kind if kind == close => {
                    depth -= 1;
                    if depth == 0 {
                        self.next_token();
                        return;
                    }
                }
                _ => {}
            }
            self.next_token();
        }
    }

    /// Skip tokens up to and including the next `;`, stopping early at a
    /// line break, a closing brace of the enclosing block, or end of file.
    /// Nested brackets are skipped whole.
    pub(crate) fn skip_to_statement_end(&mut self) {
        let mut consumed = 0u32;
        loop {
            match self.current_token {
                SyntaxKind::EndOfFileToken | SyntaxKind::CloseBraceToken => return,
                SyntaxKind::SemicolonToken => {
                    self.next_token();
                    return;
                }
                SyntaxKind::OpenBraceToken => self.skip_block(),
                SyntaxKind::OpenParenToken => {
                    self.skip_balanced(SyntaxKind::OpenParenToken, SyntaxKind::CloseParenToken)
                }
                SyntaxKind::OpenBracketToken => self.skip_balanced(
                    SyntaxKind::OpenBracketToken,
                    SyntaxKind::CloseBracketToken,
                ),
                _ => {
                    self.next_token();
                }
            }
            consumed += 1;
            if consumed > tyn_common::limits::MAX_RECOVERY_TOKENS
                || self.scanner.has_preceding_line_break()
            {
                return;
            }
        }
    }
}
