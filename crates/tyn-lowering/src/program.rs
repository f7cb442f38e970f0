//! A set of parsed declaration files and the environment built from them.

use crate::environment::DeclarationEnvironment;
use crate::lower::TypeLowering;
use tracing::{Level, span};
use tyn_common::Diagnostic;
use tyn_parser::{SourceFile, parse_source_file};
use tyn_solver::TypeDatabase;

#[derive(Debug, Default)]
pub struct Program {
    source_files: Vec<SourceFile>,
    environment: DeclarationEnvironment,
    parse_diagnostics: Vec<Diagnostic>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the given `(file name, text)` pairs in order.
    pub fn from_sources<'s>(sources: impl IntoIterator<Item = (&'s str, &'s str)>) -> Self {
        let mut program = Program::new();
        for (file_name, text) in sources {
            program.add_source(file_name, text);
        }
        program
    }

    /// Parse one file and register its declarations. Declarations that
    /// parsed despite syntax errors are still registered.
    pub fn add_source(&mut self, file_name: &str, text: &str) {
        let _span = span!(Level::DEBUG, "add_source", file = file_name).entered();
        let parsed = parse_source_file(file_name, text);
        self.parse_diagnostics.extend(parsed.diagnostics);
        self.environment.add_source_file(&parsed.value);
        self.source_files.push(parsed.value);
    }

    pub fn source_files(&self) -> &[SourceFile] {
        &self.source_files
    }

    pub fn environment(&self) -> &DeclarationEnvironment {
        &self.environment
    }

    /// A lowering context over this program's declarations.
    pub fn lowering<'a>(&'a self, db: &'a dyn TypeDatabase) -> TypeLowering<'a> {
        TypeLowering::new(db, &self.environment)
    }

    /// Syntax and declaration diagnostics, before any lowering.
    pub fn declaration_diagnostics(&self) -> Vec<Diagnostic> {
        self.parse_diagnostics
            .iter()
            .chain(self.environment.diagnostics())
            .cloned()
            .collect()
    }

    /// Lower every declaration and return all diagnostics: syntax errors,
    /// duplicate names, then lowering errors.
    pub fn check(&self, db: &dyn TypeDatabase) -> Vec<Diagnostic> {
        let _span = span!(Level::DEBUG, "check", files = self.source_files.len()).entered();
        let lowering = self.lowering(db);
        lowering.lower_all_declarations();
        let mut diagnostics = self.declaration_diagnostics();
        diagnostics.extend(lowering.take_diagnostics());
        diagnostics
    }
}
