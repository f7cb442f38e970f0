//! Evaluation of the built-in utility types.
//!
//! `Pick<User, "id">`, `Awaited<Promise<number>>`, `ReturnType<typeof f>` and
//! friends are type-level functions. `UtilityEvaluator` applies them to
//! already-lowered arguments; the rules for each family live in
//! `evaluate_rules/`.

use crate::db::TypeDatabase;
use crate::errors::EvaluationError;
use crate::format::format_type;
use crate::types::*;
use tracing::{Level, span, trace};

/// The utility types the evaluator knows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UtilityKind {
    Pick,
    Omit,
    Partial,
    Required,
    Readonly,
    ReadonlyArray,
    Record,
    Exclude,
    Extract,
    NonNullable,
    Awaited,
    Uppercase,
    Lowercase,
    Capitalize,
    Uncapitalize,
    NoInfer,
    InstanceType,
    ThisType,
    ThisParameterType,
    OmitThisParameter,
    ReturnType,
    Parameters,
    ConstructorParameters,
    Promise,
    Array,
}

impl UtilityKind {
    pub const ALL: &'static [UtilityKind] = &[
        UtilityKind::Pick,
        UtilityKind::Omit,
        UtilityKind::Partial,
        UtilityKind::Required,
        UtilityKind::Readonly,
        UtilityKind::ReadonlyArray,
        UtilityKind::Record,
        UtilityKind::Exclude,
        UtilityKind::Extract,
        UtilityKind::NonNullable,
        UtilityKind::Awaited,
        UtilityKind::Uppercase,
        UtilityKind::Lowercase,
        UtilityKind::Capitalize,
        UtilityKind::Uncapitalize,
        UtilityKind::NoInfer,
        UtilityKind::InstanceType,
        UtilityKind::ThisType,
        UtilityKind::ThisParameterType,
        UtilityKind::OmitThisParameter,
        UtilityKind::ReturnType,
        UtilityKind::Parameters,
        UtilityKind::ConstructorParameters,
        UtilityKind::Promise,
        UtilityKind::Array,
    ];

    pub fn from_name(name: &str) -> Option<UtilityKind> {
        UtilityKind::ALL.iter().copied().find(|k| k.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            UtilityKind::Pick => "Pick",
            UtilityKind::Omit => "Omit",
            UtilityKind::Partial => "Partial",
            UtilityKind::Required => "Required",
            UtilityKind::Readonly => "Readonly",
            UtilityKind::ReadonlyArray => "ReadonlyArray",
            UtilityKind::Record => "Record",
            UtilityKind::Exclude => "Exclude",
            UtilityKind::Extract => "Extract",
            UtilityKind::NonNullable => "NonNullable",
            UtilityKind::Awaited => "Awaited",
            UtilityKind::Uppercase => "Uppercase",
            UtilityKind::Lowercase => "Lowercase",
            UtilityKind::Capitalize => "Capitalize",
            UtilityKind::Uncapitalize => "Uncapitalize",
            UtilityKind::NoInfer => "NoInfer",
            UtilityKind::InstanceType => "InstanceType",
            UtilityKind::ThisType => "ThisType",
            UtilityKind::ThisParameterType => "ThisParameterType",
            UtilityKind::OmitThisParameter => "OmitThisParameter",
            UtilityKind::ReturnType => "ReturnType",
            UtilityKind::Parameters => "Parameters",
            UtilityKind::ConstructorParameters => "ConstructorParameters",
            UtilityKind::Promise => "Promise",
            UtilityKind::Array => "Array",
        }
    }

    /// Number of type arguments.
    pub fn arity(self) -> usize {
        match self {
            UtilityKind::Pick
            | UtilityKind::Omit
            | UtilityKind::Record
            | UtilityKind::Exclude
            | UtilityKind::Extract => 2,
            _ => 1,
        }
    }
}

/// String manipulation intrinsics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StringIntrinsicKind {
    Uppercase,
    Lowercase,
    Capitalize,
    Uncapitalize,
}

/// Evaluator for utility type applications.
pub struct UtilityEvaluator<'a> {
    db: &'a dyn TypeDatabase,
}

impl<'a> UtilityEvaluator<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        UtilityEvaluator { db }
    }

    // Accessor for evaluate_rules modules
    pub(crate) fn db(&self) -> &'a dyn TypeDatabase {
        self.db
    }

    /// Apply `kind` to `args`.
    pub fn evaluate(&self, kind: UtilityKind, args: &[TypeId]) -> Result<TypeId, EvaluationError> {
        let _span = span!(
            Level::TRACE,
            "evaluate_utility",
            kind = kind.name(),
            args = args.len()
        )
        .entered();

        if args.len() != kind.arity() {
            return Err(EvaluationError::WrongTypeArgumentCount {
                name: kind.name().to_string(),
                expected: kind.arity(),
                found: args.len(),
            });
        }
        let arg = args[0];
        let result = match kind {
            UtilityKind::Pick => self.evaluate_pick(arg, args[1])?,
            UtilityKind::Omit => self.evaluate_omit(arg, args[1])?,
            UtilityKind::Partial => self.evaluate_optionality(arg, true),
            UtilityKind::Required => self.evaluate_optionality(arg, false),
            UtilityKind::Readonly => self.evaluate_readonly(arg),
            UtilityKind::Record => self.evaluate_record(arg, args[1])?,
            UtilityKind::Exclude => self.evaluate_exclude(arg, args[1]),
            UtilityKind::Extract => self.evaluate_extract(arg, args[1]),
            UtilityKind::NonNullable => self.evaluate_non_nullable(arg),
            UtilityKind::Awaited => self.evaluate_awaited(arg),
            UtilityKind::Uppercase => {
                self.evaluate_string_intrinsic(StringIntrinsicKind::Uppercase, arg)?
            }
            UtilityKind::Lowercase => {
                self.evaluate_string_intrinsic(StringIntrinsicKind::Lowercase, arg)?
            }
            UtilityKind::Capitalize => {
                self.evaluate_string_intrinsic(StringIntrinsicKind::Capitalize, arg)?
            }
            UtilityKind::Uncapitalize => {
                self.evaluate_string_intrinsic(StringIntrinsicKind::Uncapitalize, arg)?
            }
            UtilityKind::ReturnType => self.evaluate_return_type(arg)?,
            UtilityKind::Parameters => self.evaluate_parameters(arg, false)?,
            UtilityKind::ConstructorParameters => self.evaluate_parameters(arg, true)?,
            UtilityKind::InstanceType => self.evaluate_instance_type(arg)?,
            UtilityKind::ThisParameterType => self.evaluate_this_parameter_type(arg)?,
            UtilityKind::OmitThisParameter => self.evaluate_omit_this_parameter(arg)?,
            UtilityKind::NoInfer => self.evaluate_no_infer(arg),
            UtilityKind::ThisType => self.db.this_type_marker(arg),
            UtilityKind::Promise => self.db.promise(arg),
            UtilityKind::Array => self.db.array(arg),
            UtilityKind::ReadonlyArray => self.db.readonly_array(arg),
        };
        trace!(result = result.0, "utility evaluated");
        Ok(result)
    }

    /// `NoInfer<T>` only matters where `T` can still be inferred.
    fn evaluate_no_infer(&self, arg: TypeId) -> TypeId {
        match self.db.lookup(arg) {
            Some(TypeData::TypeParameter(_)) => self.db.no_infer(arg),
            _ => arg,
        }
    }

    pub(crate) fn constraint_violation(&self, arg: TypeId, constraint: &str) -> EvaluationError {
        EvaluationError::ConstraintViolation {
            type_text: format_type(self.db, arg),
            constraint: constraint.to_string(),
        }
    }
}

/// Apply a utility type without constructing an evaluator.
pub fn evaluate_utility(
    db: &dyn TypeDatabase,
    kind: UtilityKind,
    args: &[TypeId],
) -> Result<TypeId, EvaluationError> {
    UtilityEvaluator::new(db).evaluate(kind, args)
}
