//! Type representation, narrowing and utility-type evaluation.
//!
//! Types are interned into `TypeId` handles (`TypeInterner`) and every
//! operation works through the `TypeDatabase` trait:
//!
//! - **Relations**: structural subtyping and overlap (`subtype`)
//! - **Narrowing**: `TypeGuard` application producing a `GuardResult`
//! - **Exhaustiveness**: coverage of a discriminated union by `case` tags
//! - **Utility types**: `Pick`, `Awaited`, `ReturnType`, ... (`evaluate`)
//! - **Assertions**: `satisfies`, `as`, `!` and `this` context checks
//! - **Flow**: guards applied in sequence along one path
//! - **Inference**: one type argument, honouring `NoInfer<T>`
//!
//! Relations are coinductive: a cycle assumes the relation holds, so
//! recursive shapes terminate.

pub mod assertions;
mod db;
pub mod declare;
pub mod errors;
mod evaluate;
pub mod evaluate_rules;
pub mod exhaustiveness;
pub mod flow;
mod format;
pub mod infer;
pub mod instantiate;
mod intern;
mod narrowing;
mod narrowing_discriminants;
mod narrowing_property;
pub mod subtype;
pub mod type_queries;
pub mod types;

pub use assertions::{check_satisfies, check_this_context, check_type_assertion, non_null_assertion};
pub use db::TypeDatabase;
pub use declare::{
    DiscriminatedUnion, Variant, declare_discriminated_union, declare_literal_union, declare_union,
    find_discriminant_property,
};
pub use errors::{AssertionError, EvaluationError, InvalidUnion, TypeDeclarationError};
pub use evaluate::{StringIntrinsicKind, UtilityEvaluator, UtilityKind, evaluate_utility};
pub use exhaustiveness::{ExhaustivenessResult, check_exhaustiveness, check_never_assignment};
pub use flow::FlowNarrower;
pub use format::{TypeFormatter, format_type};
pub use infer::{ArgumentMismatch, InferenceResult, infer_type_argument};
pub use intern::TypeInterner;
pub use narrowing::{
    AssertionClaim, AssertionOutcome, GuardResult, NarrowingContext, TypeGuard, can_be_nullish,
    narrow, remove_nullish,
};
pub use subtype::{SubtypeChecker, are_types_overlapping, is_subtype_of};
pub use types::*;

#[cfg(test)]
#[path = "../tests/test_fixtures.rs"]
mod test_fixtures;

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod intern_tests;

#[cfg(test)]
#[path = "../tests/subtype_tests.rs"]
mod subtype_tests;

#[cfg(test)]
#[path = "../tests/declare_tests.rs"]
mod declare_tests;

#[cfg(test)]
#[path = "../tests/narrowing_tests.rs"]
mod narrowing_tests;

#[cfg(test)]
#[path = "../tests/exhaustiveness_tests.rs"]
mod exhaustiveness_tests;

#[cfg(test)]
#[path = "../tests/evaluate_tests.rs"]
mod evaluate_tests;

#[cfg(test)]
#[path = "../tests/assertions_tests.rs"]
mod assertions_tests;

#[cfg(test)]
#[path = "../tests/flow_tests.rs"]
mod flow_tests;

#[cfg(test)]
#[path = "../tests/infer_tests.rs"]
mod infer_tests;

#[cfg(test)]
#[path = "../tests/concurrent_tests.rs"]
mod concurrent_tests;
