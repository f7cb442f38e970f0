//! String intrinsic type evaluation.
//!
//! Handles TypeScript's string manipulation intrinsics:
//! - Uppercase<T>
//! - Lowercase<T>
//! - Capitalize<T>
//! - Uncapitalize<T>

use crate::errors::EvaluationError;
use crate::evaluate::{StringIntrinsicKind, UtilityEvaluator};
use crate::types::*;

impl<'a> UtilityEvaluator<'a> {
    /// Transform string literal types, distributing over unions. `string`
    /// passes through unchanged.
    pub(crate) fn evaluate_string_intrinsic(
        &self,
        kind: StringIntrinsicKind,
        type_arg: TypeId,
    ) -> Result<TypeId, EvaluationError> {
        match self.db().lookup(type_arg) {
            Some(TypeData::Union(list)) => {
                let members = self.db().type_list(list);
                let transformed = members
                    .iter()
                    .map(|&member| self.evaluate_string_intrinsic(kind, member))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(self.db().union(transformed))
            }
            Some(TypeData::Literal(LiteralValue::String(atom))) => {
                let s = self.db().resolve_atom_ref(atom);
                let transformed = match kind {
                    StringIntrinsicKind::Uppercase => s.to_uppercase(),
                    StringIntrinsicKind::Lowercase => s.to_lowercase(),
                    StringIntrinsicKind::Capitalize => map_first_char(&s, |c| c.to_uppercase().collect()),
                    StringIntrinsicKind::Uncapitalize => {
                        map_first_char(&s, |c| c.to_lowercase().collect())
                    }
                };
                Ok(self.db().literal_string(&transformed))
            }
            Some(TypeData::Intrinsic(IntrinsicKind::String | IntrinsicKind::Any | IntrinsicKind::Never)) => {
                Ok(type_arg)
            }
            _ => Err(self.constraint_violation(type_arg, "string")),
        }
    }
}

fn map_first_char(s: &str, f: impl Fn(char) -> String) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => f(first) + chars.as_str(),
        None => String::new(),
    }
}
