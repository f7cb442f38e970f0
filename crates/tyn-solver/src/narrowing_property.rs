//! Property-based type narrowing.
//!
//! This module contains narrowing methods for:
//! - `in` operator narrowing (property presence check)
//! - `instanceof` narrowing against a class instance type

use crate::narrowing::{GuardResult, NarrowingContext};
use crate::subtype::is_subtype_of;
use crate::type_queries::object_shape_id;
use crate::types::{IntrinsicKind, PropertyInfo, TypeData, TypeId};
use tracing::{Level, span, trace};
use tyn_common::Atom;

/// Whether a member has a property, as far as `in` can tell.
enum Presence {
    Required,
    Optional,
    Absent,
    Unknown,
}

impl<'a> NarrowingContext<'a> {
    /// `"name" in x`.
    ///
    /// Members declaring the property go to the true branch, members lacking
    /// it to the false branch. An optional property may or may not be
    /// present at runtime, so such members go to both.
    pub fn narrow_by_property_presence(&self, source_type: TypeId, property_name: Atom) -> GuardResult {
        let _span = span!(
            Level::TRACE,
            "narrow_by_property_presence",
            source_type = source_type.0,
            ?property_name
        )
        .entered();

        if source_type == TypeId::ANY {
            return GuardResult::unchanged(source_type);
        }
        let with_property = || {
            self.db
                .object(vec![PropertyInfo::new(property_name, TypeId::UNKNOWN)])
        };
        if source_type == TypeId::UNKNOWN {
            return GuardResult::new(with_property(), source_type);
        }

        self.partition(source_type, |member, yes, no| {
            match self.property_presence(member, property_name) {
                Presence::Required => yes.push(member),
                Presence::Optional => {
                    yes.push(member);
                    no.push(member);
                }
                Presence::Absent => no.push(member),
                Presence::Unknown => {
                    trace!(member = member.0, "property presence unknown");
                    yes.push(self.db.intersection2(member, with_property()));
                    no.push(member);
                }
            }
        })
    }

    fn property_presence(&self, member: TypeId, property_name: Atom) -> Presence {
        match self.db.lookup(member) {
            Some(TypeData::Object(shape_id)) => {
                let shape = self.db.object_shape(shape_id);
                match shape.property(property_name) {
                    Some(prop) if prop.is_optional() => Presence::Optional,
                    Some(_) => Presence::Required,
                    None => Presence::Absent,
                }
            }
            Some(TypeData::Intersection(list)) => {
                let members = self.db.type_list(list);
                let mut result = Presence::Absent;
                for &m in members.iter() {
                    match self.property_presence(m, property_name) {
                        Presence::Required => return Presence::Required,
                        Presence::Optional => result = Presence::Optional,
                        Presence::Unknown if matches!(result, Presence::Absent) => {
                            result = Presence::Unknown
                        }
                        _ => {}
                    }
                }
                result
            }
            Some(TypeData::NoInfer(inner)) => self.property_presence(inner, property_name),
            Some(TypeData::TypeParameter(info)) => match info.constraint {
                Some(constraint) => match self.property_presence(constraint, property_name) {
                    // A constrained parameter may have more properties than
                    // its constraint declares.
                    Presence::Absent => Presence::Unknown,
                    other => other,
                },
                None => Presence::Unknown,
            },
            Some(TypeData::Intrinsic(IntrinsicKind::Object)) => Presence::Unknown,
            _ => Presence::Absent,
        }
    }

    /// `x instanceof C`, where `instance_type` is the instance type of `C`.
    ///
    /// Class instances are matched by class name; classes do not inherit
    /// here, so another class never matches. Members that could hold an
    /// instance without saying so (`object`, type parameters, structural
    /// supertypes of the instance) narrow to the instance type in the true
    /// branch and stay in the false branch.
    pub fn narrow_by_instanceof(&self, source_type: TypeId, instance_type: TypeId) -> GuardResult {
        let _span = span!(
            Level::TRACE,
            "narrow_by_instanceof",
            source_type = source_type.0,
            instance_type = instance_type.0
        )
        .entered();

        if source_type.is_any_or_unknown() {
            return GuardResult::new(instance_type, source_type);
        }

        let class_name = object_shape_id(self.db, instance_type)
            .and_then(|id| self.db.object_shape(id).class_name());

        self.partition(source_type, |member, yes, no| {
            if member == instance_type {
                yes.push(member);
                return;
            }
            match self.db.lookup(member) {
                Some(TypeData::Object(shape_id)) => {
                    let shape = self.db.object_shape(shape_id);
                    match shape.class_name() {
                        Some(name) if Some(name) == class_name => yes.push(member),
                        Some(_) => no.push(member),
                        None if is_subtype_of(self.db, instance_type, member) => {
                            yes.push(instance_type);
                            no.push(member);
                        }
                        None => no.push(member),
                    }
                }
                Some(TypeData::Intrinsic(IntrinsicKind::Object))
                | Some(TypeData::TypeParameter(_))
                | Some(TypeData::Intersection(_)) => {
                    yes.push(self.db.intersection2(member, instance_type));
                    no.push(member);
                }
                _ => no.push(member),
            }
        })
    }
}
