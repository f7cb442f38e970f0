//! Small structural queries shared by the solver passes.

use crate::db::TypeDatabase;
use crate::types::*;

pub fn union_list_id(db: &dyn TypeDatabase, type_id: TypeId) -> Option<TypeListId> {
    match db.lookup(type_id) {
        Some(TypeData::Union(list)) => Some(list),
        _ => None,
    }
}

/// Members of a union, `[type_id]` for a non-union, `[]` for `never`.
pub fn union_members(db: &dyn TypeDatabase, type_id: TypeId) -> Vec<TypeId> {
    if type_id == TypeId::NEVER {
        return Vec::new();
    }
    match union_list_id(db, type_id) {
        Some(list) => db.type_list(list).to_vec(),
        None => vec![type_id],
    }
}

pub fn object_shape_id(db: &dyn TypeDatabase, type_id: TypeId) -> Option<ObjectShapeId> {
    match db.lookup(strip_no_infer(db, type_id)) {
        Some(TypeData::Object(shape)) => Some(shape),
        _ => None,
    }
}

pub fn function_shape_id(db: &dyn TypeDatabase, type_id: TypeId) -> Option<FunctionShapeId> {
    match db.lookup(strip_no_infer(db, type_id)) {
        Some(TypeData::Function(shape)) => Some(shape),
        _ => None,
    }
}

pub fn literal_value(db: &dyn TypeDatabase, type_id: TypeId) -> Option<LiteralValue> {
    match db.lookup(type_id) {
        Some(TypeData::Literal(value)) => Some(value),
        _ => None,
    }
}

pub fn is_literal_type(db: &dyn TypeDatabase, type_id: TypeId) -> bool {
    literal_value(db, type_id).is_some()
}

/// A type with exactly one value: a literal, `null`, `undefined` or `void`.
pub fn is_unit_type(db: &dyn TypeDatabase, type_id: TypeId) -> bool {
    type_id.is_nullish() || is_literal_type(db, type_id)
}

/// `NoInfer<T>` is `T` outside inference.
pub fn strip_no_infer(db: &dyn TypeDatabase, type_id: TypeId) -> TypeId {
    let mut current = type_id;
    while let Some(TypeData::NoInfer(inner)) = db.lookup(current) {
        current = inner;
    }
    current
}

/// Widen literal types to their primitives, distributing over unions.
pub fn widen_literals(db: &dyn TypeDatabase, type_id: TypeId) -> TypeId {
    match db.lookup(type_id) {
        Some(TypeData::Literal(value)) => value.primitive(),
        Some(TypeData::Union(list)) => {
            let members = db.type_list(list);
            db.union(members.iter().map(|&m| widen_literals(db, m)).collect())
        }
        _ => type_id,
    }
}

/// The single runtime tag of a (non-union) type, or `None` when values of
/// the type may carry different tags (`unknown`, `any`, unconstrained type
/// parameters, mixed intersections).
pub fn type_tag(db: &dyn TypeDatabase, type_id: TypeId) -> Option<TypeTag> {
    match db.lookup(type_id)? {
        TypeData::Intrinsic(kind) => match kind {
            IntrinsicKind::Never => Some(TypeTag::Never),
            IntrinsicKind::Null => Some(TypeTag::Null),
            IntrinsicKind::Undefined | IntrinsicKind::Void => Some(TypeTag::Undefined),
            IntrinsicKind::Boolean => Some(TypeTag::Boolean),
            IntrinsicKind::Number => Some(TypeTag::Number),
            IntrinsicKind::String => Some(TypeTag::String),
            IntrinsicKind::Bigint => Some(TypeTag::BigInt),
            IntrinsicKind::Symbol => Some(TypeTag::Symbol),
            IntrinsicKind::Object => Some(TypeTag::Object),
            IntrinsicKind::Unknown | IntrinsicKind::Any => None,
        },
        TypeData::Literal(value) => Some(value.tag()),
        TypeData::Object(_)
        | TypeData::Array(_)
        | TypeData::ReadonlyArray(_)
        | TypeData::Tuple { .. }
        | TypeData::Promise(_) => Some(TypeTag::Object),
        TypeData::Function(_) => Some(TypeTag::Function),
        TypeData::TypeParameter(info) => info.constraint.and_then(|c| type_tag(db, c)),
        TypeData::NoInfer(inner) | TypeData::ThisType(inner) => type_tag(db, inner),
        TypeData::Union(list) | TypeData::Intersection(list) => {
            let members = db.type_list(list);
            let mut tags = members.iter().map(|&m| type_tag(db, m));
            let first = tags.next()??;
            tags.all(|t| t == Some(first)).then_some(first)
        }
        TypeData::Lazy(_) | TypeData::Error => None,
    }
}

/// The widest type carrying a given runtime tag.
pub fn tag_type(db: &dyn TypeDatabase, tag: TypeTag) -> TypeId {
    match tag {
        TypeTag::Null => TypeId::NULL,
        TypeTag::Undefined => TypeId::UNDEFINED,
        TypeTag::Boolean => TypeId::BOOLEAN,
        TypeTag::Number => TypeId::NUMBER,
        TypeTag::String => TypeId::STRING,
        TypeTag::BigInt => TypeId::BIGINT,
        TypeTag::Symbol => TypeId::SYMBOL,
        TypeTag::Object => TypeId::OBJECT,
        TypeTag::Function => universal_function(db),
        TypeTag::Never => TypeId::NEVER,
    }
}

/// `(...args: any[]) => unknown`, the type every function is assignable to.
pub fn universal_function(db: &dyn TypeDatabase) -> TypeId {
    let args = db.intern_string("args");
    db.function(FunctionShape::new(
        vec![ParamInfo {
            name: Some(args),
            type_id: db.array(TypeId::ANY),
            optional: false,
            rest: true,
        }],
        TypeId::UNKNOWN,
    ))
}
