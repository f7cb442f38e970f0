//! Parser for the declaration subset of TypeScript understood by tyn.
//!
//! Produces an owned AST (`SourceFile`, `Declaration`, `TypeNode`) from
//! `type`, `interface`, `class`, `function` and `declare const`
//! declarations. Function and method bodies are skipped; statements are
//! reported with TS1128 and skipped.

pub mod ast;
pub mod parser;

pub use ast::*;
pub use parser::{ParseResult, ParserState, parse_source_file, parse_type_annotation};

#[cfg(test)]
#[path = "../tests/state_type_tests.rs"]
mod state_type_tests;

#[cfg(test)]
#[path = "../tests/state_statement_tests.rs"]
mod state_statement_tests;
