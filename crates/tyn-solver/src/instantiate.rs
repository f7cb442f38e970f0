//! Substitution of type parameters.

use crate::db::TypeDatabase;
use crate::types::*;
use rustc_hash::FxHashMap;

/// Mapping from type parameter to its replacement.
#[derive(Clone, Debug, Default)]
pub struct TypeSubstitution {
    map: FxHashMap<TypeId, TypeId>,
}

impl TypeSubstitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(param: TypeId, replacement: TypeId) -> Self {
        let mut subst = Self::new();
        subst.insert(param, replacement);
        subst
    }

    pub fn insert(&mut self, param: TypeId, replacement: TypeId) {
        self.map.insert(param, replacement);
    }

    pub fn get(&self, param: TypeId) -> Option<TypeId> {
        self.map.get(&param).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Replace every substituted type parameter in `type_id`. `NoInfer`
/// markers around a substituted parameter are dropped.
pub fn instantiate_type(db: &dyn TypeDatabase, type_id: TypeId, subst: &TypeSubstitution) -> TypeId {
    if subst.is_empty() || type_id.is_intrinsic() || type_id.is_error() {
        return type_id;
    }
    if let Some(replacement) = subst.get(type_id) {
        return replacement;
    }
    // Declarations are closed over their own type parameters.
    if db.lazy_name(type_id).is_some() {
        return type_id;
    }
    let Some(data) = db.lookup(type_id) else {
        return type_id;
    };
    let inst = |t: TypeId| instantiate_type(db, t, subst);

    match data {
        TypeData::NoInfer(inner) => {
            let inner_inst = inst(inner);
            if inner_inst == inner {
                type_id
            } else {
                inner_inst
            }
        }
        TypeData::Union(list) => {
            let members = db.type_list(list);
            db.union(members.iter().map(|&m| inst(m)).collect())
        }
        TypeData::Intersection(list) => {
            let members = db.type_list(list);
            members
                .iter()
                .map(|&m| inst(m))
                .reduce(|acc, m| db.intersection2(acc, m))
                .unwrap_or(TypeId::UNKNOWN)
        }
        TypeData::Array(element) => db.array(inst(element)),
        TypeData::ReadonlyArray(element) => db.readonly_array(inst(element)),
        TypeData::Promise(inner) => db.promise(inst(inner)),
        TypeData::ThisType(inner) => db.this_type_marker(inst(inner)),
        TypeData::Tuple { elements, readonly } => {
            let elements: Vec<TupleElement> = db
                .tuple_list(elements)
                .iter()
                .map(|e| TupleElement {
                    type_id: inst(e.type_id),
                    ..e.clone()
                })
                .collect();
            if readonly {
                db.readonly_tuple(elements)
            } else {
                db.tuple(elements)
            }
        }
        TypeData::Object(shape_id) => {
            let shape = db.object_shape(shape_id);
            let mut shape = (*shape).clone();
            for prop in &mut shape.properties {
                prop.type_id = inst(prop.type_id);
            }
            db.object_with_shape(shape)
        }
        TypeData::Function(shape_id) => {
            let mut shape = (*db.function_shape(shape_id)).clone();
            for param in &mut shape.params {
                param.type_id = inst(param.type_id);
            }
            shape.this_type = shape.this_type.map(inst);
            shape.return_type = inst(shape.return_type);
            if let Some(pred) = &mut shape.type_predicate {
                pred.type_id = pred.type_id.map(inst);
            }
            db.function(shape)
        }
        TypeData::TypeParameter(_)
        | TypeData::Lazy(_)
        | TypeData::Intrinsic(_)
        | TypeData::Literal(_)
        | TypeData::Error => type_id,
    }
}
