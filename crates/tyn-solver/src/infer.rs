//! Inference of a single type argument at a call site.
//!
//! ```typescript
//! function createStreetLight<C extends string>(colors: C[], defaultColor?: NoInfer<C>) {}
//! createStreetLight(["red", "yellow", "green"], "blue");
//! //                                            ~~~~~~ not assignable to "red" | "yellow" | "green"
//! ```
//!
//! Candidates come from parameters typed `T` or `T[]`. Positions wrapped in
//! `NoInfer<T>` contribute nothing and are only checked once `T` is fixed.

use crate::db::TypeDatabase;
use crate::format::format_type;
use crate::instantiate::{TypeSubstitution, instantiate_type};
use crate::subtype::is_subtype_of;
use crate::type_queries::{union_members, widen_literals};
use crate::types::*;
use serde::Serialize;
use tracing::{Level, span, trace};
use tyn_common::Diagnostic;
use tyn_common::diagnostics::diagnostic_codes;

/// An argument that does not fit its instantiated parameter.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArgumentMismatch {
    pub index: usize,
    pub diagnostic: Diagnostic,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InferenceResult {
    pub inferred: TypeId,
    pub mismatches: Vec<ArgumentMismatch>,
}

impl InferenceResult {
    pub fn is_ok(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Infer `type_param` from `args` passed to `params`, then check each
/// argument against its instantiated parameter.
pub fn infer_type_argument(
    db: &dyn TypeDatabase,
    type_param: TypeId,
    params: &[TypeId],
    args: &[TypeId],
) -> InferenceResult {
    let _span = span!(
        Level::TRACE,
        "infer_type_argument",
        type_param = type_param.0,
        args = args.len()
    )
    .entered();

    let constraint = match db.lookup(type_param) {
        Some(TypeData::TypeParameter(info)) => info.constraint,
        _ => None,
    };

    let mut candidates = Vec::new();
    for (&param, &arg) in params.iter().zip(args) {
        collect_candidates(db, type_param, param, arg, &mut candidates);
    }
    trace!(candidates = candidates.len(), "inference candidates");

    let inferred = if candidates.is_empty() {
        constraint.unwrap_or(TypeId::UNKNOWN)
    } else {
        let union = db.union(candidates);
        let keep_literals = constraint.is_some_and(|c| is_primitive_constraint(db, c));
        let inferred = if keep_literals {
            union
        } else {
            widen_literals(db, union)
        };
        match constraint {
            Some(c) if !is_subtype_of(db, inferred, c) => c,
            _ => inferred,
        }
    };

    let subst = TypeSubstitution::single(type_param, inferred);
    let mut mismatches = Vec::new();
    for (index, (&param, &arg)) in params.iter().zip(args).enumerate() {
        let expected = instantiate_type(db, param, &subst);
        if !is_subtype_of(db, arg, expected) {
            mismatches.push(ArgumentMismatch {
                index,
                diagnostic: Diagnostic::from_code(
                    diagnostic_codes::ARGUMENT_NOT_ASSIGNABLE,
                    &[
                        format_type(db, arg).as_str(),
                        format_type(db, expected).as_str(),
                    ],
                ),
            });
        }
    }

    InferenceResult {
        inferred,
        mismatches,
    }
}

fn collect_candidates(
    db: &dyn TypeDatabase,
    type_param: TypeId,
    param: TypeId,
    arg: TypeId,
    candidates: &mut Vec<TypeId>,
) {
    if param == type_param {
        candidates.push(arg);
        return;
    }
    match db.lookup(param) {
        Some(TypeData::Array(element) | TypeData::ReadonlyArray(element)) if element == type_param => {
            match db.lookup(arg) {
                Some(TypeData::Array(inner) | TypeData::ReadonlyArray(inner)) => candidates.push(inner),
                Some(TypeData::Tuple { elements, .. }) => {
                    candidates.extend(db.tuple_list(elements).iter().map(|e| e.type_id));
                }
                _ => {}
            }
        }
        // `T | undefined` from an optional parameter.
        Some(TypeData::Union(list)) if db.type_list(list).contains(&type_param) => {
            candidates.extend(
                union_members(db, arg)
                    .into_iter()
                    .filter(|m| !m.is_nullish()),
            );
        }
        _ => {}
    }
}

/// `string`, `number`, ... or a union of them: literal arguments keep
/// their literal types.
fn is_primitive_constraint(db: &dyn TypeDatabase, constraint: TypeId) -> bool {
    union_members(db, constraint).iter().all(|&m| {
        matches!(
            m,
            TypeId::STRING | TypeId::NUMBER | TypeId::BIGINT | TypeId::BOOLEAN | TypeId::SYMBOL
        )
    })
}
