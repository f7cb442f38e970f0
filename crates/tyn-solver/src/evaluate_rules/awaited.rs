//! `Awaited<T>`: the type a value has after `await`.

use crate::evaluate::UtilityEvaluator;
use crate::types::{TypeData, TypeId};
use tracing::trace;
use tyn_common::limits::MAX_AWAITED_DEPTH;

impl<'a> UtilityEvaluator<'a> {
    /// Unwrap nested promises, distributing over unions.
    pub(crate) fn evaluate_awaited(&self, type_id: TypeId) -> TypeId {
        self.awaited_inner(type_id, 0)
    }

    fn awaited_inner(&self, type_id: TypeId, depth: u32) -> TypeId {
        if depth >= MAX_AWAITED_DEPTH {
            trace!(type_id = type_id.0, "awaited depth limit reached");
            return type_id;
        }
        match self.db().lookup(type_id) {
            Some(TypeData::Promise(inner)) => self.awaited_inner(inner, depth + 1),
            Some(TypeData::Union(list)) => {
                let members = self.db().type_list(list);
                self.db().union(
                    members
                        .iter()
                        .map(|&m| self.awaited_inner(m, depth + 1))
                        .collect(),
                )
            }
            _ => type_id,
        }
    }
}
