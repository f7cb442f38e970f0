//! Structural subtyping and overlap.
//!
//! `SubtypeChecker` answers `source <: target` for the representation in
//! `types.rs`. Recursion is bounded by `MAX_SUBTYPE_DEPTH`; a pair that is
//! already being checked is assumed to hold (coinductive), so recursive
//! object types terminate.

use crate::db::TypeDatabase;
use crate::type_queries::strip_no_infer;
use crate::types::*;
use rustc_hash::FxHashSet;
use tracing::trace;
use tyn_common::limits::MAX_SUBTYPE_DEPTH;

pub struct SubtypeChecker<'a> {
    pub(crate) db: &'a dyn TypeDatabase,
    depth: u32,
    in_progress: FxHashSet<(TypeId, TypeId)>,
}

impl<'a> SubtypeChecker<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        SubtypeChecker {
            db,
            depth: 0,
            in_progress: FxHashSet::default(),
        }
    }

    /// Check `source <: target`.
    pub fn check_subtype(&mut self, source: TypeId, target: TypeId) -> bool {
        if source == target {
            return true;
        }
        if source.is_error() || target.is_error() {
            return true;
        }
        if target.is_any_or_unknown() || source == TypeId::NEVER || source == TypeId::ANY {
            return true;
        }
        if target == TypeId::NEVER || source == TypeId::UNKNOWN {
            return false;
        }

        if self.depth >= MAX_SUBTYPE_DEPTH {
            trace!(source = source.0, target = target.0, "subtype depth limit reached");
            return true;
        }
        if !self.in_progress.insert((source, target)) {
            return true;
        }
        self.depth += 1;
        let result = self.check_structural(source, target);
        self.depth -= 1;
        self.in_progress.remove(&(source, target));
        result
    }

    fn check_structural(&mut self, source: TypeId, target: TypeId) -> bool {
        let source = strip_no_infer(self.db, source);
        let target = strip_no_infer(self.db, target);
        if source == target {
            return true;
        }
        let (Some(s_data), Some(t_data)) = (self.db.lookup(source), self.db.lookup(target)) else {
            return false;
        };

        // Unions and intersections first: they decompose before any other rule.
        if let TypeData::Union(list) = s_data {
            let members = self.db.type_list(list);
            return members.iter().all(|&m| self.check_subtype(m, target));
        }
        if let TypeData::Intersection(list) = t_data {
            let members = self.db.type_list(list);
            return members.iter().all(|&m| self.check_subtype(source, m));
        }
        if let TypeData::Union(list) = t_data {
            let members = self.db.type_list(list);
            return members.iter().any(|&m| self.check_subtype(source, m));
        }
        if let TypeData::Intersection(list) = s_data {
            let members = self.db.type_list(list);
            return members.iter().any(|&m| self.check_subtype(m, target));
        }

        match (s_data, t_data) {
            (TypeData::TypeParameter(info), _) => match info.constraint {
                Some(constraint) => self.check_subtype(constraint, target),
                None => false,
            },
            (_, TypeData::TypeParameter(_)) => false,

            (TypeData::Literal(value), TypeData::Intrinsic(kind)) => {
                value.primitive() == kind.to_type_id()
            }
            (TypeData::Literal(_), _) => false,

            (TypeData::Intrinsic(IntrinsicKind::Undefined), TypeData::Intrinsic(IntrinsicKind::Void)) => {
                true
            }
            (TypeData::Intrinsic(IntrinsicKind::Object), TypeData::Object(shape)) => {
                self.has_no_required_properties(shape)
            }
            (TypeData::Intrinsic(_), _) => false,

            (
                TypeData::Object(_)
                | TypeData::Function(_)
                | TypeData::Array(_)
                | TypeData::ReadonlyArray(_)
                | TypeData::Tuple { .. }
                | TypeData::Promise(_),
                TypeData::Intrinsic(IntrinsicKind::Object),
            ) => true,

            (TypeData::Object(s_shape), TypeData::Object(t_shape)) => {
                self.check_object_subtype(s_shape, t_shape)
            }
            (
                TypeData::Function(_)
                | TypeData::Array(_)
                | TypeData::ReadonlyArray(_)
                | TypeData::Tuple { .. }
                | TypeData::Promise(_),
                TypeData::Object(t_shape),
            ) => self.has_no_required_properties(t_shape),

            (TypeData::Function(s_fn), TypeData::Function(t_fn)) => {
                self.check_function_subtype(s_fn, t_fn)
            }

            (TypeData::Array(s), TypeData::Array(t))
            | (TypeData::Array(s), TypeData::ReadonlyArray(t))
            | (TypeData::ReadonlyArray(s), TypeData::ReadonlyArray(t))
            | (TypeData::Promise(s), TypeData::Promise(t)) => self.check_subtype(s, t),

            (
                TypeData::Tuple {
                    elements: s_elems,
                    readonly: s_readonly,
                },
                TypeData::Tuple {
                    elements: t_elems,
                    readonly: t_readonly,
                },
            ) => (!s_readonly || t_readonly) && self.check_tuple_subtype(s_elems, t_elems),
            (TypeData::Tuple { elements, readonly }, TypeData::Array(t)) => {
                !readonly && self.check_subtype(self.tuple_element_union(elements), t)
            }
            (TypeData::Tuple { elements, .. }, TypeData::ReadonlyArray(t)) => {
                self.check_subtype(self.tuple_element_union(elements), t)
            }

            _ => false,
        }
    }

    fn has_no_required_properties(&self, shape: ObjectShapeId) -> bool {
        let shape = self.db.object_shape(shape);
        shape.properties.iter().all(PropertyInfo::is_optional)
    }

    /// Width subtyping: every property `target` requires exists in `source`
    /// with a subtype value; optional target properties may be absent.
    fn check_object_subtype(&mut self, source: ObjectShapeId, target: ObjectShapeId) -> bool {
        if source == target {
            return true;
        }
        let s_shape = self.db.object_shape(source);
        let t_shape = self.db.object_shape(target);
        for t_prop in &t_shape.properties {
            match s_shape.property(t_prop.name) {
                Some(s_prop) => {
                    if s_prop.is_optional() && !t_prop.is_optional() {
                        return false;
                    }
                    if !self.check_subtype(s_prop.type_id, t_prop.type_id) {
                        return false;
                    }
                }
                None => {
                    if !t_prop.is_optional() {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Parameters contravariant, return covariant; the source may declare
    /// fewer parameters than the target.
    fn check_function_subtype(&mut self, source: FunctionShapeId, target: FunctionShapeId) -> bool {
        let s_fn = self.db.function_shape(source);
        let t_fn = self.db.function_shape(target);
        if s_fn.is_constructor != t_fn.is_constructor {
            return false;
        }

        let target_has_rest = t_fn.params.last().is_some_and(|p| p.rest);
        let source_required = s_fn
            .params
            .iter()
            .filter(|p| !p.optional && !p.rest)
            .count();
        if !target_has_rest && source_required > t_fn.params.len() {
            return false;
        }

        let count = s_fn.params.len().max(t_fn.params.len());
        for index in 0..count {
            let Some(t_param) = self.param_type_at(&t_fn, index) else {
                break;
            };
            let Some(s_param) = self.param_type_at(&s_fn, index) else {
                break;
            };
            if !self.check_subtype(t_param, s_param) {
                return false;
            }
        }

        if let (Some(s_this), Some(t_this)) = (s_fn.this_type, t_fn.this_type) {
            if !self.check_subtype(t_this, s_this) {
                return false;
            }
        }

        match (&s_fn.type_predicate, &t_fn.type_predicate) {
            (None, Some(_)) => return false,
            (Some(s_pred), Some(t_pred)) => {
                if s_pred.asserts != t_pred.asserts {
                    return false;
                }
                if let (Some(s_ty), Some(t_ty)) = (s_pred.type_id, t_pred.type_id) {
                    if !self.check_subtype(s_ty, t_ty) {
                        return false;
                    }
                }
            }
            _ => {}
        }

        // Any return value may be discarded by a `void`-returning target.
        t_fn.return_type == TypeId::VOID || self.check_subtype(s_fn.return_type, t_fn.return_type)
    }

    /// Type accepted at parameter position `index`, expanding a trailing rest
    /// parameter. `None` past the end of a non-rest parameter list.
    fn param_type_at(&self, shape: &FunctionShape, index: usize) -> Option<TypeId> {
        let last = shape.params.len().checked_sub(1)?;
        if index < last || (index == last && !shape.params[last].rest) {
            return Some(shape.params[index].type_id);
        }
        let rest = &shape.params[last];
        if !rest.rest {
            return None;
        }
        Some(match self.db.lookup(rest.type_id) {
            Some(TypeData::Array(element) | TypeData::ReadonlyArray(element)) => element,
            Some(TypeData::Tuple { elements, .. }) => {
                let elements = self.db.tuple_list(elements);
                let offset = index - last;
                match elements.get(offset) {
                    Some(elem) => elem.type_id,
                    None => return None,
                }
            }
            _ => TypeId::ANY,
        })
    }

    fn tuple_element_union(&self, elements: TupleListId) -> TypeId {
        let elements = self.db.tuple_list(elements);
        let types = elements
            .iter()
            .map(|elem| {
                if elem.rest {
                    match self.db.lookup(elem.type_id) {
                        Some(TypeData::Array(inner) | TypeData::ReadonlyArray(inner)) => inner,
                        _ => elem.type_id,
                    }
                } else {
                    elem.type_id
                }
            })
            .collect();
        self.db.union(types)
    }

    fn check_tuple_subtype(&mut self, source: TupleListId, target: TupleListId) -> bool {
        let s_elems = self.db.tuple_list(source);
        let t_elems = self.db.tuple_list(target);
        let t_rest = t_elems.iter().position(|e| e.rest);
        let s_rest = s_elems.iter().position(|e| e.rest);

        let fixed_target = t_rest.unwrap_or(t_elems.len());
        for (index, s_elem) in s_elems.iter().enumerate() {
            if s_elem.rest {
                // A source rest element can only flow into a target rest element.
                let Some(t_rest) = t_rest else {
                    return false;
                };
                if index < t_rest || !self.check_subtype(s_elem.type_id, t_elems[t_rest].type_id) {
                    return false;
                }
                continue;
            }
            if index < fixed_target {
                let t_elem = &t_elems[index];
                if s_elem.optional && !t_elem.optional {
                    return false;
                }
                if !self.check_subtype(s_elem.type_id, t_elem.type_id) {
                    return false;
                }
            } else if let Some(t_rest) = t_rest {
                let rest_element = match self.db.lookup(t_elems[t_rest].type_id) {
                    Some(TypeData::Array(inner) | TypeData::ReadonlyArray(inner)) => inner,
                    _ => TypeId::ANY,
                };
                if !self.check_subtype(s_elem.type_id, rest_element) {
                    return false;
                }
            } else {
                return false;
            }
        }

        // Target elements the source does not provide must be optional.
        let provided = s_rest.unwrap_or(s_elems.len());
        t_elems
            .iter()
            .take(fixed_target)
            .skip(provided)
            .all(|e| e.optional || s_rest.is_some())
    }
}

/// `source <: target`.
pub fn is_subtype_of(db: &dyn TypeDatabase, source: TypeId, target: TypeId) -> bool {
    SubtypeChecker::new(db).check_subtype(source, target)
}

/// Whether some value could inhabit both `a` and `b`.
pub fn are_types_overlapping(db: &dyn TypeDatabase, a: TypeId, b: TypeId) -> bool {
    overlapping(db, a, b, 0)
}

/// Past `MAX_SUBTYPE_DEPTH` nested properties, types are assumed to overlap.
fn overlapping(db: &dyn TypeDatabase, a: TypeId, b: TypeId, depth: u32) -> bool {
    if a == TypeId::NEVER || b == TypeId::NEVER {
        return false;
    }
    if a == b || a.is_any_or_unknown() || b.is_any_or_unknown() || a.is_error() || b.is_error() {
        return true;
    }
    if depth >= MAX_SUBTYPE_DEPTH {
        trace!(a = a.0, b = b.0, "overlap depth limit reached");
        return true;
    }
    let next = depth + 1;
    let a = strip_no_infer(db, a);
    let b = strip_no_infer(db, b);
    let (Some(a_data), Some(b_data)) = (db.lookup(a), db.lookup(b)) else {
        return false;
    };

    match (&a_data, &b_data) {
        (TypeData::Union(list), _) => {
            return db
                .type_list(*list)
                .iter()
                .any(|&m| overlapping(db, m, b, next));
        }
        (_, TypeData::Union(list)) => {
            return db
                .type_list(*list)
                .iter()
                .any(|&m| overlapping(db, a, m, next));
        }
        (TypeData::Intersection(list), _) => {
            return db
                .type_list(*list)
                .iter()
                .all(|&m| overlapping(db, m, b, next));
        }
        (_, TypeData::Intersection(list)) => {
            return db
                .type_list(*list)
                .iter()
                .all(|&m| overlapping(db, a, m, next));
        }
        (TypeData::TypeParameter(info), _) => {
            return info
                .constraint
                .is_none_or(|c| overlapping(db, c, b, next));
        }
        (_, TypeData::TypeParameter(info)) => {
            return info
                .constraint
                .is_none_or(|c| overlapping(db, a, c, next));
        }
        _ => {}
    }

    if is_subtype_of(db, a, b) || is_subtype_of(db, b, a) {
        return true;
    }

    match (a_data, b_data) {
        (TypeData::Literal(x), TypeData::Literal(y)) => x == y,
        (TypeData::Literal(value), TypeData::Intrinsic(kind))
        | (TypeData::Intrinsic(kind), TypeData::Literal(value)) => {
            value.primitive() == kind.to_type_id()
        }
        (TypeData::Intrinsic(x), TypeData::Intrinsic(y)) => matches!(
            (x, y),
            (IntrinsicKind::Void, IntrinsicKind::Undefined)
                | (IntrinsicKind::Undefined, IntrinsicKind::Void)
        ),
        (TypeData::Object(x), TypeData::Object(y)) => object_shapes_overlap(db, x, y, next),
        (TypeData::Function(_), TypeData::Function(_)) => true,
        (
            TypeData::Array(_) | TypeData::ReadonlyArray(_) | TypeData::Tuple { .. },
            TypeData::Array(_) | TypeData::ReadonlyArray(_) | TypeData::Tuple { .. },
        ) => true,
        (TypeData::Promise(x), TypeData::Promise(y)) => overlapping(db, x, y, next),
        _ => false,
    }
}

/// Two shapes overlap unless a property required by both has disjoint types.
fn object_shapes_overlap(
    db: &dyn TypeDatabase,
    a: ObjectShapeId,
    b: ObjectShapeId,
    depth: u32,
) -> bool {
    let a_shape = db.object_shape(a);
    let b_shape = db.object_shape(b);
    a_shape.properties.iter().all(|a_prop| {
        match b_shape.property(a_prop.name) {
            Some(b_prop) if !a_prop.is_optional() && !b_prop.is_optional() => {
                overlapping(db, a_prop.type_id, b_prop.type_id, depth)
            }
            _ => true,
        }
    })
}
