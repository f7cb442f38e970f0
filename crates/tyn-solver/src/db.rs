//! Type database abstraction for the solver.
//!
//! Solver components take `&dyn TypeDatabase` rather than the concrete
//! interner so they never reach into storage structures directly.

use crate::intern::TypeInterner;
use crate::types::{
    FunctionShape, FunctionShapeId, ObjectShape, ObjectShapeId, PropertyInfo, TupleElement,
    TupleListId, TypeData, TypeId, TypeListId, TypeParamInfo,
};
use std::sync::Arc;
use tyn_common::Atom;

/// Query and construction interface for the solver.
pub trait TypeDatabase {
    fn intern(&self, key: TypeData) -> TypeId;
    fn lookup(&self, id: TypeId) -> Option<TypeData>;
    fn intern_string(&self, s: &str) -> Atom;
    fn resolve_atom(&self, atom: Atom) -> String;
    fn resolve_atom_ref(&self, atom: Atom) -> Arc<str>;
    fn type_list(&self, id: TypeListId) -> Arc<[TypeId]>;
    fn tuple_list(&self, id: TupleListId) -> Arc<[TupleElement]>;
    fn object_shape(&self, id: ObjectShapeId) -> Arc<ObjectShape>;
    fn function_shape(&self, id: FunctionShapeId) -> Arc<FunctionShape>;

    fn literal_string(&self, value: &str) -> TypeId;
    fn literal_number(&self, value: f64) -> TypeId;
    fn literal_boolean(&self, value: bool) -> TypeId;
    fn literal_bigint(&self, value: &str) -> TypeId;

    fn union(&self, members: Vec<TypeId>) -> TypeId;
    fn union2(&self, left: TypeId, right: TypeId) -> TypeId;
    fn intersection2(&self, left: TypeId, right: TypeId) -> TypeId;
    fn object(&self, properties: Vec<PropertyInfo>) -> TypeId;
    fn object_with_shape(&self, shape: ObjectShape) -> TypeId;
    fn function(&self, shape: FunctionShape) -> TypeId;
    fn array(&self, element: TypeId) -> TypeId;
    fn readonly_array(&self, element: TypeId) -> TypeId;
    fn tuple(&self, elements: Vec<TupleElement>) -> TypeId;
    fn readonly_tuple(&self, elements: Vec<TupleElement>) -> TypeId;
    fn promise(&self, inner: TypeId) -> TypeId;
    fn type_param(&self, info: TypeParamInfo) -> TypeId;
    fn no_infer(&self, inner: TypeId) -> TypeId;
    fn this_type_marker(&self, inner: TypeId) -> TypeId;

    fn lazy(&self, name: Atom) -> TypeId;
    fn bind_lazy(&self, lazy: TypeId, target: TypeId);
    fn resolve_lazy(&self, id: TypeId) -> TypeId;
    fn lazy_name(&self, id: TypeId) -> Option<Atom>;
}

impl TypeDatabase for TypeInterner {
    fn intern(&self, key: TypeData) -> TypeId {
        TypeInterner::intern(self, key)
    }

    fn lookup(&self, id: TypeId) -> Option<TypeData> {
        TypeInterner::lookup(self, id)
    }

    fn intern_string(&self, s: &str) -> Atom {
        TypeInterner::intern_string(self, s)
    }

    fn resolve_atom(&self, atom: Atom) -> String {
        TypeInterner::resolve_atom(self, atom)
    }

    fn resolve_atom_ref(&self, atom: Atom) -> Arc<str> {
        TypeInterner::resolve_atom_ref(self, atom)
    }

    fn type_list(&self, id: TypeListId) -> Arc<[TypeId]> {
        TypeInterner::type_list(self, id)
    }

    fn tuple_list(&self, id: TupleListId) -> Arc<[TupleElement]> {
        TypeInterner::tuple_list(self, id)
    }

    fn object_shape(&self, id: ObjectShapeId) -> Arc<ObjectShape> {
        TypeInterner::object_shape(self, id)
    }

    fn function_shape(&self, id: FunctionShapeId) -> Arc<FunctionShape> {
        TypeInterner::function_shape(self, id)
    }

    fn literal_string(&self, value: &str) -> TypeId {
        TypeInterner::literal_string(self, value)
    }

    fn literal_number(&self, value: f64) -> TypeId {
        TypeInterner::literal_number(self, value)
    }

    fn literal_boolean(&self, value: bool) -> TypeId {
        TypeInterner::literal_boolean(self, value)
    }

    fn literal_bigint(&self, value: &str) -> TypeId {
        TypeInterner::literal_bigint(self, value)
    }

    fn union(&self, members: Vec<TypeId>) -> TypeId {
        TypeInterner::union(self, members)
    }

    fn union2(&self, left: TypeId, right: TypeId) -> TypeId {
        TypeInterner::union2(self, left, right)
    }

    fn intersection2(&self, left: TypeId, right: TypeId) -> TypeId {
        TypeInterner::intersection2(self, left, right)
    }

    fn object(&self, properties: Vec<PropertyInfo>) -> TypeId {
        TypeInterner::object(self, properties)
    }

    fn object_with_shape(&self, shape: ObjectShape) -> TypeId {
        TypeInterner::object_with_shape(self, shape)
    }

    fn function(&self, shape: FunctionShape) -> TypeId {
        TypeInterner::function(self, shape)
    }

    fn array(&self, element: TypeId) -> TypeId {
        TypeInterner::array(self, element)
    }

    fn readonly_array(&self, element: TypeId) -> TypeId {
        TypeInterner::readonly_array(self, element)
    }

    fn tuple(&self, elements: Vec<TupleElement>) -> TypeId {
        TypeInterner::tuple(self, elements)
    }

    fn readonly_tuple(&self, elements: Vec<TupleElement>) -> TypeId {
        TypeInterner::readonly_tuple(self, elements)
    }

    fn promise(&self, inner: TypeId) -> TypeId {
        TypeInterner::promise(self, inner)
    }

    fn type_param(&self, info: TypeParamInfo) -> TypeId {
        TypeInterner::type_param(self, info)
    }

    fn no_infer(&self, inner: TypeId) -> TypeId {
        TypeInterner::no_infer(self, inner)
    }

    fn this_type_marker(&self, inner: TypeId) -> TypeId {
        TypeInterner::this_type_marker(self, inner)
    }

    fn lazy(&self, name: Atom) -> TypeId {
        TypeInterner::lazy(self, name)
    }

    fn bind_lazy(&self, lazy: TypeId, target: TypeId) {
        TypeInterner::bind_lazy(self, lazy, target)
    }

    fn resolve_lazy(&self, id: TypeId) -> TypeId {
        TypeInterner::resolve_lazy(self, id)
    }

    fn lazy_name(&self, id: TypeId) -> Option<Atom> {
        TypeInterner::lazy_name(self, id)
    }
}
