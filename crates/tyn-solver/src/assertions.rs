//! Checks for expression-level type operators.
//!
//! - `expr satisfies T`: validate without widening
//! - `expr as T`: conversion, allowed when the types are comparable
//! - `expr!`: strip `null` and `undefined`
//! - `obj.method()`: the receiver must fit the method's declared `this`

use crate::db::TypeDatabase;
use crate::format::format_type;
use crate::narrowing::remove_nullish;
use crate::subtype::{are_types_overlapping, is_subtype_of};
use crate::type_queries::{function_shape_id, object_shape_id};
use crate::types::TypeId;
use tracing::{Level, span};
use tyn_common::Diagnostic;
use tyn_common::diagnostics::diagnostic_codes;

/// `expr satisfies target`.
///
/// On success the expression keeps its own, more specific type. A missing
/// required property is reported by name; any other mismatch as a whole.
pub fn check_satisfies(
    db: &dyn TypeDatabase,
    expr_type: TypeId,
    target: TypeId,
) -> Result<TypeId, Diagnostic> {
    let _span = span!(
        Level::TRACE,
        "check_satisfies",
        expr_type = expr_type.0,
        target = target.0
    )
    .entered();

    if is_subtype_of(db, expr_type, target) {
        return Ok(expr_type);
    }

    if let (Some(expr_shape), Some(target_shape)) =
        (object_shape_id(db, expr_type), object_shape_id(db, target))
    {
        let expr_shape = db.object_shape(expr_shape);
        let target_shape = db.object_shape(target_shape);
        let missing = target_shape
            .properties
            .iter()
            .find(|p| !p.is_optional() && expr_shape.property(p.name).is_none());
        if let Some(prop) = missing {
            return Err(Diagnostic::from_code(
                diagnostic_codes::PROPERTY_MISSING,
                &[
                    db.resolve_atom_ref(prop.name).as_ref(),
                    format_type(db, expr_type).as_str(),
                    format_type(db, target).as_str(),
                ],
            ));
        }
    }

    Err(Diagnostic::from_code(
        diagnostic_codes::TYPE_DOES_NOT_SATISFY_EXPECTED,
        &[
            format_type(db, expr_type).as_str(),
            format_type(db, target).as_str(),
        ],
    ))
}

/// `expr as target`: the result has the target type.
pub fn check_type_assertion(
    db: &dyn TypeDatabase,
    expr_type: TypeId,
    target: TypeId,
) -> Result<TypeId, Diagnostic> {
    let comparable = is_subtype_of(db, expr_type, target)
        || is_subtype_of(db, target, expr_type)
        || are_types_overlapping(db, expr_type, target);
    if comparable {
        Ok(target)
    } else {
        Err(Diagnostic::from_code(
            diagnostic_codes::CONVERSION_MAY_BE_A_MISTAKE,
            &[
                format_type(db, expr_type).as_str(),
                format_type(db, target).as_str(),
            ],
        ))
    }
}

/// `expr!`
pub fn non_null_assertion(db: &dyn TypeDatabase, expr_type: TypeId) -> TypeId {
    remove_nullish(db, expr_type)
}

/// Calling `function` with `receiver` as `this`.
///
/// A detached call (`const f = obj.method; f()`) has an `undefined`
/// receiver, reported as `void`.
pub fn check_this_context(
    db: &dyn TypeDatabase,
    function: TypeId,
    receiver: TypeId,
) -> Result<(), Diagnostic> {
    let Some(shape_id) = function_shape_id(db, function) else {
        return Ok(());
    };
    let Some(this_type) = db.function_shape(shape_id).this_type else {
        return Ok(());
    };

    let detached = receiver == TypeId::UNDEFINED || receiver == TypeId::VOID;
    if !detached && is_subtype_of(db, receiver, this_type) {
        return Ok(());
    }
    let receiver_text = if detached {
        "void".to_string()
    } else {
        format_type(db, receiver)
    };
    Err(Diagnostic::from_code(
        diagnostic_codes::THIS_CONTEXT_NOT_ASSIGNABLE,
        &[receiver_text.as_str(), format_type(db, this_type).as_str()],
    ))
}
