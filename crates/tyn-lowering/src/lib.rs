//! Lowering from parsed declarations to solver types.
//!
//! - `environment`: declared names per namespace, in declaration order
//! - `lower`: `TypeLowering`, which turns `TypeNode`s into `TypeId`s
//! - `program`: parsing and registering a set of declaration files

pub mod environment;
pub mod lower;
mod lower_declarations;
pub mod program;

pub use environment::{DeclarationEnvironment, Declared, TypeDeclaration, ValueDeclaration};
pub use lower::{ANNOTATION_FILE, MAX_LOWERING_OPERATIONS, TypeLowering};
pub use program::Program;

#[cfg(test)]
#[path = "../tests/environment_tests.rs"]
mod environment_tests;

#[cfg(test)]
#[path = "../tests/lower_tests.rs"]
mod lower_tests;

#[cfg(test)]
#[path = "../tests/lower_declarations_tests.rs"]
mod lower_declarations_tests;

#[cfg(test)]
#[path = "../tests/program_tests.rs"]
mod program_tests;
