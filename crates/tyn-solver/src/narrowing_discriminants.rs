//! Discriminant-based narrowing for discriminated unions.
//!
//! `shape.kind === "circle"` narrows `Circle | Square | Triangle` to
//! `Circle`, and the else branch to `Square | Triangle`.

use crate::narrowing::{GuardResult, NarrowingContext};
use crate::subtype::are_types_overlapping;
use crate::type_queries::{is_unit_type, object_shape_id};
use crate::types::TypeId;
use tracing::{Level, span, trace};
use tyn_common::Atom;

/// How one union member relates to a discriminant test.
enum DiscriminantMatch {
    /// The property's type is exactly the tested literal.
    Exact,
    /// Some value of the property equals the literal.
    Possible,
    /// The property never equals the literal.
    Never,
    /// Not an object with the property; only the false branch can hold it.
    NotApplicable,
}

impl<'a> NarrowingContext<'a> {
    /// Narrow by `x[property_name] === value_type`.
    ///
    /// The true branch keeps the variants whose discriminant admits the
    /// literal. The false branch drops only the variants whose discriminant
    /// is exactly that literal: a variant typed `kind: string` may still hold
    /// another value.
    pub fn narrow_by_discriminant(
        &self,
        union_type: TypeId,
        property_name: Atom,
        value_type: TypeId,
    ) -> GuardResult {
        let _span = span!(
            Level::TRACE,
            "narrow_by_discriminant",
            union_type = union_type.0,
            ?property_name,
            value_type = value_type.0
        )
        .entered();

        if union_type.is_any_or_unknown() {
            return GuardResult::unchanged(union_type);
        }

        self.partition(union_type, |member, yes, no| {
            match self.match_discriminant(member, property_name, value_type) {
                DiscriminantMatch::Exact => yes.push(member),
                DiscriminantMatch::Possible => {
                    yes.push(member);
                    no.push(member);
                }
                DiscriminantMatch::Never | DiscriminantMatch::NotApplicable => no.push(member),
            }
        })
    }

    fn match_discriminant(
        &self,
        member: TypeId,
        property_name: Atom,
        value_type: TypeId,
    ) -> DiscriminantMatch {
        let Some(shape_id) = object_shape_id(self.db, member) else {
            trace!(member = member.0, "not an object type");
            return DiscriminantMatch::NotApplicable;
        };
        let shape = self.db.object_shape(shape_id);
        let Some(prop) = shape.property(property_name) else {
            trace!(member = member.0, "no discriminant property");
            return DiscriminantMatch::NotApplicable;
        };

        // An optional discriminant may also be absent, i.e. `undefined`.
        let property_type = if prop.is_optional() {
            self.db.union2(prop.type_id, TypeId::UNDEFINED)
        } else {
            prop.type_id
        };

        if property_type == value_type && is_unit_type(self.db, value_type) {
            DiscriminantMatch::Exact
        } else if are_types_overlapping(self.db, property_type, value_type) {
            DiscriminantMatch::Possible
        } else {
            DiscriminantMatch::Never
        }
    }
}
