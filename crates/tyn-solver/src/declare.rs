//! Checked construction of declared unions.
//!
//! `TypeInterner::union` is lenient: it flattens, deduplicates and absorbs
//! members. A union written by a user is held to stricter rules, enforced
//! here when the declaration is built rather than when it is narrowed:
//!
//! - it has at least one member,
//! - no member is written twice,
//! - no member is itself a union.
//!
//! A discriminated union additionally requires every variant to carry the
//! discriminant property with a literal type, and no two variants to share
//! a literal. Variants are kept in declaration order, which is the order
//! exhaustiveness reports missing cases in.

use crate::db::TypeDatabase;
use crate::errors::{InvalidUnion, TypeDeclarationError};
use crate::format::format_type;
use crate::type_queries::{is_unit_type, object_shape_id, union_list_id};
use crate::types::TypeId;
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{Level, span, trace};
use tyn_common::Atom;

/// One variant of a discriminated union and the literal that selects it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub tag: TypeId,
    pub type_id: TypeId,
}

/// A union whose members are told apart by a literal tag.
///
/// With `property: None` the members are unit types and each member is its
/// own tag (`"red" | "green" | "blue"`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscriminatedUnion {
    pub property: Option<Atom>,
    pub variants: Vec<Variant>,
    pub union_type: TypeId,
}

impl DiscriminatedUnion {
    pub fn tags(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.variants.iter().map(|v| v.tag)
    }

    pub fn variant_for(&self, tag: TypeId) -> Option<&Variant> {
        self.variants.iter().find(|v| v.tag == tag)
    }
}

/// Build a union from members written in source order.
pub fn declare_union(
    db: &dyn TypeDatabase,
    members: &[TypeId],
) -> Result<TypeId, TypeDeclarationError> {
    let _span = span!(Level::TRACE, "declare_union", members = members.len()).entered();

    if members.is_empty() {
        return Err(InvalidUnion::Empty.into());
    }
    let mut seen = FxHashSet::default();
    for &member in members {
        if union_list_id(db, member).is_some() {
            return Err(InvalidUnion::NestedUnion(format_type(db, member)).into());
        }
        if !seen.insert(member) {
            return Err(InvalidUnion::DuplicateMember(format_type(db, member)).into());
        }
    }
    Ok(db.union(members.to_vec()))
}

/// Build a discriminated union keyed on `property`.
pub fn declare_discriminated_union(
    db: &dyn TypeDatabase,
    property: Atom,
    variants: &[TypeId],
) -> Result<DiscriminatedUnion, TypeDeclarationError> {
    let _span = span!(
        Level::TRACE,
        "declare_discriminated_union",
        variants = variants.len()
    )
    .entered();

    let union_type = declare_union(db, variants)?;
    let property_text = || db.resolve_atom(property);

    let mut declared: Vec<Variant> = Vec::with_capacity(variants.len());
    for &variant in variants {
        let tag = discriminant_of(db, variant, property).ok_or_else(|| {
            TypeDeclarationError::MissingDiscriminant {
                variant: format_type(db, variant),
                property: property_text(),
            }
        })?;
        if declared.iter().any(|v| v.tag == tag) {
            return Err(TypeDeclarationError::AmbiguousDiscriminant {
                property: property_text(),
                value: format_type(db, tag),
            });
        }
        trace!(variant = variant.0, tag = tag.0, "discriminated variant");
        declared.push(Variant {
            tag,
            type_id: variant,
        });
    }

    Ok(DiscriminatedUnion {
        property: Some(property),
        variants: declared,
        union_type,
    })
}

/// Build a union of unit types, each member being its own tag.
pub fn declare_literal_union(
    db: &dyn TypeDatabase,
    members: &[TypeId],
) -> Result<DiscriminatedUnion, TypeDeclarationError> {
    let union_type = declare_union(db, members)?;
    let mut variants = Vec::with_capacity(members.len());
    for &member in members {
        if !is_unit_type(db, member) {
            return Err(TypeDeclarationError::MissingDiscriminant {
                variant: format_type(db, member),
                property: "value".to_string(),
            });
        }
        variants.push(Variant {
            tag: member,
            type_id: member,
        });
    }
    Ok(DiscriminatedUnion {
        property: None,
        variants,
        union_type,
    })
}

/// Literal type of `property` on an object variant.
fn discriminant_of(db: &dyn TypeDatabase, variant: TypeId, property: Atom) -> Option<TypeId> {
    let shape = db.object_shape(object_shape_id(db, variant)?);
    let prop = shape.property(property)?;
    (!prop.is_optional() && is_unit_type(db, prop.type_id)).then_some(prop.type_id)
}

/// The first property (in the first variant's declaration order) that
/// discriminates every variant with a distinct literal.
pub fn find_discriminant_property(db: &dyn TypeDatabase, variants: &[TypeId]) -> Option<Atom> {
    let first = *variants.first()?;
    let shape = db.object_shape(object_shape_id(db, first)?);
    shape.properties.iter().map(|p| p.name).find(|&name| {
        let mut seen = FxHashSet::default();
        variants
            .iter()
            .all(|&v| discriminant_of(db, v, name).is_some_and(|tag| seen.insert(tag)))
    })
}
