//! Type narrowing for type guards.
//!
//! A guard is a runtime test (`typeof x === "string"`, `x`, `x === null`,
//! `"swim" in x`, `x instanceof Dog`, `s.kind === "circle"`, `isFish(x)`)
//! that splits a declared type into the part that passes the test and the
//! part that fails it.
//!
//! ```typescript
//! function pad(value: string | number) {
//!   if (typeof value === "string") {
//!     // value: string
//!   } else {
//!     // value: number
//!   }
//! }
//! ```
//!
//! ## TypeGuard Abstraction
//!
//! `TypeGuard` describes the test without reference to syntax; a front end
//! extracts it from an expression and the solver applies it to a type.
//! Every guard is total: a test that can never pass yields `never` in the
//! true branch, and a guard applied to `never` yields `never` in both.
//!
//! Members are narrowed one at a time and the branch types are rebuilt with
//! `union`, so the true and false branches are always subtypes of the
//! declared type.

use crate::db::TypeDatabase;
use crate::errors::AssertionError;
use crate::format::format_type;
use crate::subtype::{are_types_overlapping, is_subtype_of};
use crate::type_queries::{is_unit_type, literal_value, tag_type, type_tag, union_members};
use crate::types::*;
use serde::{Deserialize, Serialize};
use tracing::{Level, span, trace};
use tyn_common::diagnostics::diagnostic_codes;
use tyn_common::{Atom, Diagnostic};

/// AST-agnostic representation of a narrowing condition.
///
/// ```typescript
/// typeof x === "string"     -> TypeGuard::Typeof(TypeTag::String)
/// x                         -> TypeGuard::Truthy
/// x === "a"                 -> TypeGuard::Equality("a")
/// x == null                 -> TypeGuard::NullishEquality
/// "swim" in x               -> TypeGuard::InProperty("swim")
/// x instanceof Dog          -> TypeGuard::Instanceof(Dog)
/// s.kind === "circle"       -> TypeGuard::Discriminant { property: "kind", value: "circle" }
/// isFish(x)                 -> TypeGuard::Predicate { type_id: Some(Fish), asserts: false }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum TypeGuard {
    /// `typeof x === "tag"`
    Typeof(TypeTag),

    /// `if (x)`: splits by truthiness.
    Truthy,

    /// `x === value`, where `value` has the given type.
    ///
    /// When the compared type is a single unit type (a literal, `null` or
    /// `undefined`) the false branch excludes it.
    Equality(TypeId),

    /// `x == null` (matches both `null` and `undefined`).
    NullishEquality,

    /// `"prop" in x`
    InProperty(Atom),

    /// `x instanceof C`, carrying the instance type of `C`.
    Instanceof(TypeId),

    /// `x.prop === literal` on a discriminated union.
    Discriminant {
        property_name: Atom,
        value_type: TypeId,
    },

    /// `x is T` or `asserts x is T`.
    ///
    /// - `type_id: None`: `asserts x`, which behaves like `Truthy`
    /// - `asserts: true`: code after the call only runs when the check passed,
    ///   so there is no false branch
    Predicate {
        type_id: Option<TypeId>,
        asserts: bool,
    },
}

/// The types in both branches of a condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GuardResult {
    pub true_type: TypeId,
    pub false_type: TypeId,
}

impl GuardResult {
    pub fn new(true_type: TypeId, false_type: TypeId) -> Self {
        GuardResult {
            true_type,
            false_type,
        }
    }

    /// Both branches see the same type.
    pub fn unchanged(type_id: TypeId) -> Self {
        GuardResult::new(type_id, type_id)
    }

    pub fn branch(&self, taken: bool) -> TypeId {
        if taken { self.true_type } else { self.false_type }
    }
}

/// What the caller of an assertion function knows about the check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssertionClaim {
    /// The value is known to pass the check.
    Satisfied,
    /// The value is known to fail the check; the call throws.
    Violated,
    /// Nothing is known; the declared signature is trusted.
    Unverified,
}

/// Continuation type after an assertion call.
#[derive(Clone, Debug, PartialEq)]
pub struct AssertionOutcome {
    pub narrowed: TypeId,
    pub warning: Option<Diagnostic>,
}

/// Narrowing context for type guards and control flow analysis.
pub struct NarrowingContext<'a> {
    pub(crate) db: &'a dyn TypeDatabase,
}

impl<'a> NarrowingContext<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        NarrowingContext { db }
    }

    /// Apply a guard, producing both branch types.
    pub fn narrow(&self, source_type: TypeId, guard: &TypeGuard) -> GuardResult {
        if source_type == TypeId::NEVER {
            return GuardResult::unchanged(TypeId::NEVER);
        }
        match guard {
            TypeGuard::Typeof(tag) => self.narrow_by_typeof(source_type, *tag),
            TypeGuard::Truthy => self.narrow_by_truthiness(source_type),
            TypeGuard::Equality(value) => self.narrow_by_equality(source_type, *value),
            TypeGuard::NullishEquality => self.narrow_by_nullish_equality(source_type),
            TypeGuard::InProperty(name) => self.narrow_by_property_presence(source_type, *name),
            TypeGuard::Instanceof(instance) => self.narrow_by_instanceof(source_type, *instance),
            TypeGuard::Discriminant {
                property_name,
                value_type,
            } => self.narrow_by_discriminant(source_type, *property_name, *value_type),
            TypeGuard::Predicate { type_id, asserts } => {
                let result = match type_id {
                    Some(target) => self.narrow_by_predicate(source_type, *target),
                    None => self.narrow_by_truthiness(source_type),
                };
                if *asserts {
                    GuardResult::new(result.true_type, TypeId::NEVER)
                } else {
                    result
                }
            }
        }
    }

    /// Narrow to one branch of a guard.
    pub fn narrow_type(&self, source_type: TypeId, guard: &TypeGuard, sense: bool) -> TypeId {
        self.narrow(source_type, guard).branch(sense)
    }

    /// Split each member into the branches chosen by `route`, returning the
    /// rebuilt unions.
    pub(crate) fn partition<F>(&self, source_type: TypeId, mut route: F) -> GuardResult
    where
        F: FnMut(TypeId, &mut Vec<TypeId>, &mut Vec<TypeId>),
    {
        let mut true_members = Vec::new();
        let mut false_members = Vec::new();
        for member in union_members(self.db, source_type) {
            route(member, &mut true_members, &mut false_members);
        }
        GuardResult::new(self.db.union(true_members), self.db.union(false_members))
    }

    /// `typeof x === "tag"`.
    ///
    /// Members whose runtime tag is known go to exactly one branch. Members
    /// with no single tag (unconstrained type parameters) go to the false
    /// branch as-is and to the true branch intersected with the tag's type.
    pub fn narrow_by_typeof(&self, source_type: TypeId, tag: TypeTag) -> GuardResult {
        let _span = span!(
            Level::TRACE,
            "narrow_by_typeof",
            source_type = source_type.0,
            ?tag
        )
        .entered();

        let tag_ty = tag_type(self.db, tag);
        if source_type.is_any_or_unknown() {
            return GuardResult::new(tag_ty, source_type);
        }

        self.partition(source_type, |member, yes, no| match type_tag(self.db, member) {
            Some(member_tag) if member_tag == tag => yes.push(member),
            Some(_) => no.push(member),
            None => {
                trace!(member = member.0, "member has no single tag");
                yes.push(self.db.intersection2(member, tag_ty));
                no.push(member);
            }
        })
    }

    /// `if (x)`.
    ///
    /// Literal runtime values are not tracked, so `string`, `number` and
    /// `bigint` stay whole in both branches; `boolean` splits into `true` and
    /// `false`.
    pub fn narrow_by_truthiness(&self, source_type: TypeId) -> GuardResult {
        let _span = span!(
            Level::TRACE,
            "narrow_by_truthiness",
            source_type = source_type.0
        )
        .entered();

        if source_type.is_any_or_unknown() {
            return GuardResult::unchanged(source_type);
        }

        self.partition(source_type, |member, yes, no| {
            match member {
                TypeId::NULL | TypeId::UNDEFINED | TypeId::VOID => no.push(member),
                TypeId::BOOLEAN => {
                    yes.push(self.db.literal_boolean(true));
                    no.push(self.db.literal_boolean(false));
                }
                TypeId::STRING | TypeId::NUMBER | TypeId::BIGINT => {
                    yes.push(member);
                    no.push(member);
                }
                _ => match literal_value(self.db, member) {
                    Some(value) if self.is_falsy_literal(&value) => no.push(member),
                    Some(_) => yes.push(member),
                    None => match type_tag(self.db, member) {
                        // Objects, functions and symbols are always truthy.
                        Some(TypeTag::Object | TypeTag::Function | TypeTag::Symbol) => {
                            yes.push(member)
                        }
                        _ => {
                            yes.push(member);
                            no.push(member);
                        }
                    },
                },
            }
        })
    }

    fn is_falsy_literal(&self, value: &LiteralValue) -> bool {
        match value {
            LiteralValue::String(atom) => self.db.resolve_atom_ref(*atom).is_empty(),
            LiteralValue::Number(n) => n.0 == 0.0 || n.0.is_nan(),
            LiteralValue::BigInt(atom) => {
                let digits = self.db.resolve_atom_ref(*atom);
                digits.trim_start_matches('-').chars().all(|c| c == '0')
            }
            LiteralValue::Boolean(b) => !b,
        }
    }

    /// `x === value`, narrowing `x`.
    ///
    /// The true branch keeps, for every member of `x`, the narrower of it and
    /// each overlapping member of the compared type. The false branch only
    /// changes when the compared type is a single unit type.
    pub fn narrow_by_equality(&self, source_type: TypeId, value_type: TypeId) -> GuardResult {
        let _span = span!(
            Level::TRACE,
            "narrow_by_equality",
            source_type = source_type.0,
            value_type = value_type.0
        )
        .entered();

        let true_type = self.intersect_comparable(source_type, value_type);
        let false_type = if is_unit_type(self.db, value_type) && !source_type.is_any_or_unknown() {
            self.exclude_unit(source_type, value_type)
        } else {
            source_type
        };
        GuardResult::new(true_type, false_type)
    }

    /// `x === y` narrowing both operands: `(x's result, y's result)`.
    pub fn narrow_by_strict_equality(&self, left: TypeId, right: TypeId) -> (GuardResult, GuardResult) {
        (
            self.narrow_by_equality(left, right),
            self.narrow_by_equality(right, left),
        )
    }

    fn intersect_comparable(&self, source_type: TypeId, value_type: TypeId) -> TypeId {
        if source_type.is_any_or_unknown() {
            return value_type;
        }
        if value_type.is_any_or_unknown() {
            return source_type;
        }
        let values = union_members(self.db, value_type);
        let mut result = Vec::new();
        for member in union_members(self.db, source_type) {
            for &value in &values {
                if !are_types_overlapping(self.db, member, value) {
                    continue;
                }
                let narrowed = if is_subtype_of(self.db, value, member) {
                    value
                } else if is_subtype_of(self.db, member, value) {
                    member
                } else {
                    self.db.intersection2(member, value)
                };
                trace!(member = member.0, value = value.0, narrowed = narrowed.0, "comparable");
                result.push(narrowed);
            }
        }
        self.db.union(result)
    }

    /// Remove a unit type from a union. `boolean` minus `true` is `false`.
    fn exclude_unit(&self, source_type: TypeId, unit: TypeId) -> TypeId {
        let unit_bool = match literal_value(self.db, unit) {
            Some(LiteralValue::Boolean(b)) => Some(b),
            _ => None,
        };
        let kept = union_members(self.db, source_type)
            .into_iter()
            .filter_map(|member| {
                if member == unit || (member == TypeId::VOID && unit == TypeId::UNDEFINED) {
                    return None;
                }
                match (member, unit_bool) {
                    (TypeId::BOOLEAN, Some(b)) => Some(self.db.literal_boolean(!b)),
                    _ => Some(member),
                }
            })
            .collect();
        self.db.union(kept)
    }

    /// `x == null`: the true branch is the nullish part of `x`.
    pub fn narrow_by_nullish_equality(&self, source_type: TypeId) -> GuardResult {
        let _span = span!(
            Level::TRACE,
            "narrow_by_nullish_equality",
            source_type = source_type.0
        )
        .entered();

        let nullish = self.db.union2(TypeId::NULL, TypeId::UNDEFINED);
        if source_type.is_any_or_unknown() {
            return GuardResult::new(nullish, source_type);
        }
        self.partition(source_type, |member, yes, no| match member {
            TypeId::NULL | TypeId::UNDEFINED => yes.push(member),
            TypeId::VOID => yes.push(TypeId::UNDEFINED),
            _ if type_tag(self.db, member).is_none() => {
                yes.push(nullish);
                no.push(member);
            }
            _ => no.push(member),
        })
    }

    /// `isT(x)` for a predicate `x is T`.
    ///
    /// The true branch keeps members assignable to `T`; when there are none
    /// but `T` itself fits the declared type (a more specific check), it is
    /// `T`. The false branch removes the members assignable to `T`.
    pub fn narrow_by_predicate(&self, source_type: TypeId, target: TypeId) -> GuardResult {
        let _span = span!(
            Level::TRACE,
            "narrow_by_predicate",
            source_type = source_type.0,
            target = target.0
        )
        .entered();

        if source_type.is_any_or_unknown() {
            return GuardResult::new(target, source_type);
        }

        let (matched, rest): (Vec<TypeId>, Vec<TypeId>) = union_members(self.db, source_type)
            .into_iter()
            .partition(|&m| is_subtype_of(self.db, m, target));

        let true_type = if !matched.is_empty() {
            self.db.union(matched)
        } else if is_subtype_of(self.db, target, source_type) {
            target
        } else {
            TypeId::NEVER
        };
        GuardResult::new(true_type, self.db.union(rest))
    }

    /// Continuation after `assertT(x)`, where `assertT` is declared
    /// `asserts x is T` (`asserted: Some(T)`) or `asserts x` (`None`).
    ///
    /// A `Violated` claim means the call throws: that is an error, not a
    /// narrowing. An `Unverified` claim narrows as declared and returns a
    /// warning that the runtime check is being trusted.
    pub fn narrow_by_assertion(
        &self,
        source_type: TypeId,
        asserted: Option<TypeId>,
        claim: AssertionClaim,
    ) -> Result<AssertionOutcome, AssertionError> {
        let _span = span!(
            Level::TRACE,
            "narrow_by_assertion",
            source_type = source_type.0,
            ?claim
        )
        .entered();

        let asserted_text = || match asserted {
            Some(target) => format_type(self.db, target),
            None => "truthy".to_string(),
        };

        match claim {
            AssertionClaim::Violated => {
                return Err(AssertionError::Failed {
                    actual: format_type(self.db, source_type),
                    asserted: asserted_text(),
                });
            }
            AssertionClaim::Satisfied | AssertionClaim::Unverified => {}
        }

        let narrowed = self.narrow_type(
            source_type,
            &TypeGuard::Predicate {
                type_id: asserted,
                asserts: true,
            },
            true,
        );
        let warning = (claim == AssertionClaim::Unverified).then(|| {
            Diagnostic::from_code(
                diagnostic_codes::ASSERTION_UNVERIFIABLE,
                &[format_type(self.db, source_type).as_str(), asserted_text().as_str()],
            )
        });
        Ok(AssertionOutcome { narrowed, warning })
    }
}

/// Apply a guard without constructing a context.
pub fn narrow(db: &dyn TypeDatabase, source_type: TypeId, guard: &TypeGuard) -> GuardResult {
    NarrowingContext::new(db).narrow(source_type, guard)
}

/// Remove `null`, `undefined` and `void` from a type.
pub fn remove_nullish(db: &dyn TypeDatabase, type_id: TypeId) -> TypeId {
    if type_id.is_any_or_unknown() {
        return type_id;
    }
    let kept = union_members(db, type_id)
        .into_iter()
        .filter(|m| !m.is_nullish())
        .collect();
    db.union(kept)
}

pub fn can_be_nullish(db: &dyn TypeDatabase, type_id: TypeId) -> bool {
    type_id.is_any_or_unknown() || union_members(db, type_id).iter().any(|m| m.is_nullish())
}
