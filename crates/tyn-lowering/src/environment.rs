//! Declaration environment: every named type and value across the loaded
//! files, in declaration order.
//!
//! Types and values live in separate namespaces. A class declares a name in
//! both: its instance type and its constructor value.

use indexmap::IndexMap;
use tracing::{Level, debug, span};
use tyn_common::Diagnostic;
use tyn_common::diagnostics::diagnostic_codes;
use tyn_parser::{
    ClassDecl, ConstDecl, Declaration, FunctionDecl, Ident, InterfaceDecl, SourceFile, TypeAliasDecl,
};

/// A declaration in the type namespace.
#[derive(Clone, Debug)]
pub enum TypeDeclaration {
    Alias(TypeAliasDecl),
    Interface(InterfaceDecl),
    Class(ClassDecl),
}

impl TypeDeclaration {
    pub fn name(&self) -> &Ident {
        match self {
            TypeDeclaration::Alias(decl) => &decl.name,
            TypeDeclaration::Interface(decl) => &decl.name,
            TypeDeclaration::Class(decl) => &decl.name,
        }
    }
}

/// A declaration in the value namespace.
#[derive(Clone, Debug)]
pub enum ValueDeclaration {
    Function(FunctionDecl),
    Const(ConstDecl),
    /// The constructor of the class with this name.
    Class(Ident),
}

/// A declaration and the file it came from.
#[derive(Clone, Debug)]
pub struct Declared<T> {
    pub file: String,
    pub decl: T,
}

#[derive(Debug, Default)]
pub struct DeclarationEnvironment {
    types: IndexMap<String, Declared<TypeDeclaration>>,
    values: IndexMap<String, Declared<ValueDeclaration>>,
    diagnostics: Vec<Diagnostic>,
}

impl DeclarationEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every declaration of `source_file`.
    ///
    /// A name declared twice in the same namespace reports TS2300 at the
    /// second declaration, which is then ignored. Interfaces do not merge.
    pub fn add_source_file(&mut self, source_file: &SourceFile) {
        let _span = span!(
            Level::DEBUG,
            "add_source_file",
            file = %source_file.file_name,
            declarations = source_file.declarations.len()
        )
        .entered();

        let file = &source_file.file_name;
        for declaration in &source_file.declarations {
            match declaration {
                Declaration::TypeAlias(decl) => {
                    self.declare_type(file, TypeDeclaration::Alias(decl.clone()));
                }
                Declaration::Interface(decl) => {
                    self.declare_type(file, TypeDeclaration::Interface(decl.clone()));
                }
                Declaration::Class(decl) => {
                    if self.declare_type(file, TypeDeclaration::Class(decl.clone())) {
                        self.declare_value(file, ValueDeclaration::Class(decl.name.clone()));
                    }
                }
                Declaration::Function(decl) => {
                    self.declare_value(file, ValueDeclaration::Function(decl.clone()));
                }
                Declaration::Const(decl) => {
                    self.declare_value(file, ValueDeclaration::Const(decl.clone()));
                }
            }
        }
    }

    fn declare_type(&mut self, file: &str, decl: TypeDeclaration) -> bool {
        let name = decl.name().clone();
        if self.types.contains_key(&name.text) {
            self.report_duplicate(file, &name);
            return false;
        }
        debug!(name = %name.text, "declare type");
        self.types.insert(
            name.text,
            Declared {
                file: file.to_string(),
                decl,
            },
        );
        true
    }

    fn declare_value(&mut self, file: &str, decl: ValueDeclaration) -> bool {
        let name = match &decl {
            ValueDeclaration::Function(f) => f.name.clone(),
            ValueDeclaration::Const(c) => c.name.clone(),
            ValueDeclaration::Class(name) => name.clone(),
        };
        if self.values.contains_key(&name.text) {
            self.report_duplicate(file, &name);
            return false;
        }
        self.values.insert(
            name.text,
            Declared {
                file: file.to_string(),
                decl,
            },
        );
        true
    }

    fn report_duplicate(&mut self, file: &str, name: &Ident) {
        self.diagnostics.push(
            Diagnostic::from_code(diagnostic_codes::DUPLICATE_IDENTIFIER, &[name.text.as_str()])
                .at(file, name.span.start, name.span.len()),
        );
    }

    pub fn type_decl(&self, name: &str) -> Option<&Declared<TypeDeclaration>> {
        self.types.get(name)
    }

    pub fn value_decl(&self, name: &str) -> Option<&Declared<ValueDeclaration>> {
        self.values.get(name)
    }

    /// Type names in declaration order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Value names in declaration order.
    pub fn value_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
