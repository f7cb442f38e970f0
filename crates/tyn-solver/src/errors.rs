//! Error types for solver operations that can fail.
//!
//! Guard evaluation is total and never fails; errors only arise when a type
//! is constructed from a malformed declaration, when a utility type is
//! applied to arguments it does not accept, and when an assertion is known
//! to be violated. Every error maps onto a numbered `Diagnostic`.

use thiserror::Error;
use tyn_common::Diagnostic;
use tyn_common::diagnostics::diagnostic_codes;

/// Why a written union was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidUnion {
    #[error("Union type declaration must have at least one member.")]
    Empty,
    #[error("Duplicate member '{0}' in union type declaration.")]
    DuplicateMember(String),
    #[error("Union '{0}' must be flattened before it can be a member of a declared union.")]
    NestedUnion(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TypeDeclarationError {
    #[error(transparent)]
    InvalidTypeDeclaration(#[from] InvalidUnion),

    #[error("Discriminant property '{property}' has the value {value} in more than one variant.")]
    AmbiguousDiscriminant { property: String, value: String },

    #[error("Variant '{variant}' has no literal discriminant property '{property}'.")]
    MissingDiscriminant { variant: String, property: String },
}

impl TypeDeclarationError {
    pub fn code(&self) -> u32 {
        match self {
            TypeDeclarationError::InvalidTypeDeclaration(InvalidUnion::Empty) => {
                diagnostic_codes::EMPTY_UNION_DECLARATION
            }
            TypeDeclarationError::InvalidTypeDeclaration(InvalidUnion::DuplicateMember(_)) => {
                diagnostic_codes::DUPLICATE_UNION_MEMBER
            }
            TypeDeclarationError::InvalidTypeDeclaration(InvalidUnion::NestedUnion(_)) => {
                diagnostic_codes::NESTED_UNION_MEMBER
            }
            TypeDeclarationError::AmbiguousDiscriminant { .. } => {
                diagnostic_codes::AMBIGUOUS_DISCRIMINANT
            }
            TypeDeclarationError::MissingDiscriminant { .. } => {
                diagnostic_codes::MISSING_DISCRIMINANT
            }
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            TypeDeclarationError::InvalidTypeDeclaration(InvalidUnion::Empty) => {
                Diagnostic::from_code(self.code(), &[])
            }
            TypeDeclarationError::InvalidTypeDeclaration(
                InvalidUnion::DuplicateMember(member) | InvalidUnion::NestedUnion(member),
            ) => Diagnostic::from_code(self.code(), &[member.as_str()]),
            TypeDeclarationError::AmbiguousDiscriminant { property, value } => {
                Diagnostic::from_code(self.code(), &[property.as_str(), value.as_str()])
            }
            TypeDeclarationError::MissingDiscriminant { variant, property } => {
                Diagnostic::from_code(self.code(), &[variant.as_str(), property.as_str()])
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("Generic type '{name}' requires {expected} type argument(s).")]
    WrongTypeArgumentCount {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Type '{type_text}' does not satisfy the constraint '{constraint}'.")]
    ConstraintViolation {
        type_text: String,
        constraint: String,
    },
}

impl EvaluationError {
    pub fn code(&self) -> u32 {
        match self {
            EvaluationError::WrongTypeArgumentCount { .. } => {
                diagnostic_codes::GENERIC_TYPE_REQUIRES_ARGUMENTS
            }
            EvaluationError::ConstraintViolation { .. } => {
                diagnostic_codes::TYPE_DOES_NOT_SATISFY_CONSTRAINT
            }
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            EvaluationError::WrongTypeArgumentCount { name, expected, .. } => {
                Diagnostic::from_code(self.code(), &[name.as_str(), &expected.to_string()])
            }
            EvaluationError::ConstraintViolation {
                type_text,
                constraint,
            } => Diagnostic::from_code(self.code(), &[type_text.as_str(), constraint.as_str()]),
        }
    }
}

/// A claim the caller knows to be false was passed to an assertion function.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AssertionError {
    #[error("Assertion failed: value of type '{actual}' is not '{asserted}'.")]
    Failed { actual: String, asserted: String },
}

impl AssertionError {
    pub fn code(&self) -> u32 {
        diagnostic_codes::TYPE_NOT_ASSIGNABLE
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            AssertionError::Failed { actual, asserted } => {
                Diagnostic::from_code(self.code(), &[actual.as_str(), asserted.as_str()])
            }
        }
    }
}
