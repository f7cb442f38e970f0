//! Utilities that read function and constructor signatures.
//!
//! - ReturnType<F>, Parameters<F>
//! - ConstructorParameters<C>, InstanceType<C>
//! - ThisParameterType<F>, OmitThisParameter<F>

use crate::errors::EvaluationError;
use crate::evaluate::UtilityEvaluator;
use crate::type_queries::function_shape_id;
use crate::types::*;
use std::sync::Arc;

const FUNCTION_CONSTRAINT: &str = "(...args: any) => any";
const CONSTRUCTOR_CONSTRAINT: &str = "abstract new (...args: any) => any";

impl<'a> UtilityEvaluator<'a> {
    /// The function or constructor shape behind `type_id`, if it has the
    /// requested kind.
    fn signature(&self, type_id: TypeId, constructor: bool) -> Option<Arc<FunctionShape>> {
        let shape = self.db().function_shape(function_shape_id(self.db(), type_id)?);
        (shape.is_constructor == constructor).then_some(shape)
    }

    /// Apply `f` to a signature, passing `any`/`never` through and
    /// distributing over unions.
    fn map_signature<F>(
        &self,
        type_id: TypeId,
        constructor: bool,
        f: &F,
    ) -> Result<TypeId, EvaluationError>
    where
        F: Fn(&FunctionShape) -> TypeId,
    {
        if type_id == TypeId::ANY || type_id == TypeId::NEVER {
            return Ok(type_id);
        }
        if let Some(TypeData::Union(list)) = self.db().lookup(type_id) {
            let members = self.db().type_list(list);
            let mapped = members
                .iter()
                .map(|&m| self.map_signature(m, constructor, f))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(self.db().union(mapped));
        }
        match self.signature(type_id, constructor) {
            Some(shape) => Ok(f(&shape)),
            None => {
                let constraint = if constructor {
                    CONSTRUCTOR_CONSTRAINT
                } else {
                    FUNCTION_CONSTRAINT
                };
                Err(self.constraint_violation(type_id, constraint))
            }
        }
    }

    /// A type predicate returns `boolean` at runtime.
    pub(crate) fn evaluate_return_type(&self, type_id: TypeId) -> Result<TypeId, EvaluationError> {
        self.map_signature(type_id, false, &|shape: &FunctionShape| match &shape.type_predicate {
            Some(pred) if !pred.asserts => TypeId::BOOLEAN,
            Some(_) => TypeId::VOID,
            None => shape.return_type,
        })
    }

    /// Parameters as a named tuple; the explicit `this` parameter is not
    /// part of it.
    pub(crate) fn evaluate_parameters(
        &self,
        type_id: TypeId,
        constructor: bool,
    ) -> Result<TypeId, EvaluationError> {
        self.map_signature(type_id, constructor, &|shape: &FunctionShape| {
            let elements = shape
                .params
                .iter()
                .map(|param| TupleElement {
                    type_id: param.type_id,
                    name: param.name,
                    optional: param.optional,
                    rest: param.rest,
                })
                .collect();
            self.db().tuple(elements)
        })
    }

    pub(crate) fn evaluate_instance_type(&self, type_id: TypeId) -> Result<TypeId, EvaluationError> {
        self.map_signature(type_id, true, &|shape: &FunctionShape| shape.return_type)
    }

    /// The explicit `this` type, or `unknown`.
    pub(crate) fn evaluate_this_parameter_type(
        &self,
        type_id: TypeId,
    ) -> Result<TypeId, EvaluationError> {
        self.map_signature(type_id, false, &|shape: &FunctionShape| {
            shape.this_type.unwrap_or(TypeId::UNKNOWN)
        })
    }

    /// Interning an unchanged shape returns the original id.
    pub(crate) fn evaluate_omit_this_parameter(
        &self,
        type_id: TypeId,
    ) -> Result<TypeId, EvaluationError> {
        self.map_signature(type_id, false, &|shape: &FunctionShape| {
            let mut stripped = shape.clone();
            stripped.this_type = None;
            self.db().function(stripped)
        })
    }
}
