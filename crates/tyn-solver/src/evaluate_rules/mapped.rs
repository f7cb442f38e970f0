//! Homomorphic mapped utilities.
//!
//! Handles the utilities TypeScript defines as mapped types over `keyof T`:
//! - Pick<T, K>, Omit<T, K>
//! - Partial<T>, Required<T>, Readonly<T>
//! - Record<K, V>
//!
//! Results are anonymous object types: `Pick<User, "id">` is no longer a
//! `User`.

use crate::errors::EvaluationError;
use crate::evaluate::UtilityEvaluator;
use crate::format::format_type;
use crate::type_queries::object_shape_id;
use crate::types::*;
use tyn_common::Atom;

impl<'a> UtilityEvaluator<'a> {
    pub(crate) fn evaluate_pick(&self, object: TypeId, keys: TypeId) -> Result<TypeId, EvaluationError> {
        if object == TypeId::ANY {
            let names = self.key_names(keys).ok_or_else(|| self.constraint_violation(keys, "string"))?;
            let props = names.into_iter().map(|n| PropertyInfo::new(n, TypeId::ANY)).collect();
            return Ok(self.db().object(props));
        }
        let Some(shape_id) = self.object_shape_of(object) else {
            return Err(self.constraint_violation(object, "object"));
        };
        let shape = self.db().object_shape(shape_id);
        let keyof = || self.keyof_text(&shape);

        let names = self
            .key_names(keys)
            .ok_or_else(|| self.constraint_violation(keys, &keyof()))?;
        if names.iter().any(|n| shape.property(*n).is_none()) {
            return Err(self.constraint_violation(keys, &keyof()));
        }

        let props = shape
            .properties
            .iter()
            .filter(|p| names.contains(&p.name))
            .cloned()
            .collect();
        Ok(self.db().object(props))
    }

    /// `Omit<T, K>`: `K` need not name existing properties.
    pub(crate) fn evaluate_omit(&self, object: TypeId, keys: TypeId) -> Result<TypeId, EvaluationError> {
        let Some(shape_id) = self.object_shape_of(object) else {
            return Err(self.constraint_violation(object, "object"));
        };
        let shape = self.db().object_shape(shape_id);
        let props = match self.key_names(keys) {
            Some(names) => shape
                .properties
                .iter()
                .filter(|p| !names.contains(&p.name))
                .cloned()
                .collect(),
            // `Omit<T, string>` removes every property.
            None if keys == TypeId::STRING => Vec::new(),
            None => return Err(self.constraint_violation(keys, "string")),
        };
        Ok(self.db().object(props))
    }

    /// `Partial<T>` (`optional = true`) and `Required<T>` (`false`).
    ///
    /// Distributes over unions; primitives are returned unchanged.
    pub(crate) fn evaluate_optionality(&self, type_id: TypeId, optional: bool) -> TypeId {
        match self.db().lookup(type_id) {
            Some(TypeData::Union(list)) => {
                let members = self.db().type_list(list);
                self.db().union(
                    members
                        .iter()
                        .map(|&m| self.evaluate_optionality(m, optional))
                        .collect(),
                )
            }
            Some(TypeData::Object(shape_id)) => {
                let shape = self.db().object_shape(shape_id);
                let props = shape
                    .properties
                    .iter()
                    .map(|p| {
                        let mut prop = p.clone();
                        prop.flags.set(PropertyFlags::OPTIONAL, optional);
                        prop
                    })
                    .collect();
                self.db().object(props)
            }
            Some(TypeData::Tuple { elements, readonly }) => {
                let elements = self.db().tuple_list(elements);
                let mapped: Vec<TupleElement> = elements
                    .iter()
                    .map(|e| {
                        let mut elem = e.clone();
                        if !elem.rest {
                            elem.optional = optional;
                        }
                        elem
                    })
                    .collect();
                if readonly {
                    self.db().readonly_tuple(mapped)
                } else {
                    self.db().tuple(mapped)
                }
            }
            _ => type_id,
        }
    }

    /// `Readonly<T>`: readonly properties, readonly arrays and tuples.
    pub(crate) fn evaluate_readonly(&self, type_id: TypeId) -> TypeId {
        match self.db().lookup(type_id) {
            Some(TypeData::Union(list)) => {
                let members = self.db().type_list(list);
                self.db()
                    .union(members.iter().map(|&m| self.evaluate_readonly(m)).collect())
            }
            Some(TypeData::Object(shape_id)) => {
                let shape = self.db().object_shape(shape_id);
                let props = shape
                    .properties
                    .iter()
                    .map(|p| p.clone().with_flags(PropertyFlags::READONLY))
                    .collect();
                self.db().object(props)
            }
            Some(TypeData::Array(element)) => self.db().readonly_array(element),
            Some(TypeData::Tuple { elements, .. }) => {
                let elements = self.db().tuple_list(elements);
                self.db().readonly_tuple(elements.to_vec())
            }
            _ => type_id,
        }
    }

    /// `Record<K, V>` for literal keys.
    pub(crate) fn evaluate_record(&self, keys: TypeId, value: TypeId) -> Result<TypeId, EvaluationError> {
        let names = self
            .key_names(keys)
            .ok_or_else(|| self.constraint_violation(keys, "string literal union"))?;
        let props = names
            .into_iter()
            .map(|name| PropertyInfo::new(name, value))
            .collect();
        Ok(self.db().object(props))
    }

    /// Property names denoted by a key type: string and number literals,
    /// or a union of them. `never` denotes no keys.
    fn key_names(&self, keys: TypeId) -> Option<Vec<Atom>> {
        if keys == TypeId::NEVER {
            return Some(Vec::new());
        }
        let members = match self.db().lookup(keys)? {
            TypeData::Union(list) => self.db().type_list(list).to_vec(),
            _ => vec![keys],
        };
        members
            .into_iter()
            .map(|member| match self.db().lookup(member)? {
                TypeData::Literal(LiteralValue::String(atom)) => Some(atom),
                TypeData::Literal(LiteralValue::Number(_)) => {
                    Some(self.db().intern_string(&format_type(self.db(), member)))
                }
                _ => None,
            })
            .collect()
    }

    fn object_shape_of(&self, type_id: TypeId) -> Option<ObjectShapeId> {
        object_shape_id(self.db(), type_id)
    }

    /// `keyof T` as written in diagnostics.
    fn keyof_text(&self, shape: &ObjectShape) -> String {
        if shape.properties.is_empty() {
            return "never".to_string();
        }
        shape
            .properties
            .iter()
            .map(|p| format!("\"{}\"", self.db().resolve_atom_ref(p.name)))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}
