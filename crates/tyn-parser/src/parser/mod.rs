//! Recursive-descent parser.
//!
//! - `state.rs`: token cursor, expectations and diagnostics
//! - `state_types.rs`: type annotations
//! - `state_statements.rs`: top-level declarations and class/interface bodies

mod state;
mod state_statements;
mod state_types;

pub use state::ParserState;

use crate::ast::{SourceFile, TypeNode};
use tyn_common::Diagnostic;

/// A parsed artifact plus the diagnostics reported while parsing it.
#[derive(Clone, Debug)]
pub struct ParseResult<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> ParseResult<T> {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Parse a whole declaration file.
pub fn parse_source_file(file_name: &str, text: &str) -> ParseResult<SourceFile> {
    let mut parser = ParserState::new(file_name, text);
    let source_file = parser.parse_source_file();
    ParseResult {
        value: source_file,
        diagnostics: parser.into_diagnostics(),
    }
}

/// Parse a single type annotation such as `string | { kind: "circle" }`.
///
/// Trailing tokens after the type are reported as `';' expected.`.
pub fn parse_type_annotation(text: &str) -> ParseResult<TypeNode> {
    let mut parser = ParserState::new("<annotation>", text);
    let type_node = parser.parse_standalone_type();
    ParseResult {
        value: type_node,
        diagnostics: parser.into_diagnostics(),
    }
}
