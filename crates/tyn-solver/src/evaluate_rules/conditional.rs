//! Utilities defined as distributive conditional types.
//!
//! ```typescript
//! type Exclude<T, U> = T extends U ? never : T;
//! type Extract<T, U> = T extends U ? T : never;
//! type NonNullable<T> = T & {};
//! ```

use crate::evaluate::UtilityEvaluator;
use crate::subtype::is_subtype_of;
use crate::type_queries::union_members;
use crate::types::TypeId;

impl<'a> UtilityEvaluator<'a> {
    pub(crate) fn evaluate_exclude(&self, source: TypeId, excluded: TypeId) -> TypeId {
        self.filter_members(source, |member| !is_subtype_of(self.db(), member, excluded))
    }

    pub(crate) fn evaluate_extract(&self, source: TypeId, extracted: TypeId) -> TypeId {
        self.filter_members(source, |member| is_subtype_of(self.db(), member, extracted))
    }

    pub(crate) fn evaluate_non_nullable(&self, source: TypeId) -> TypeId {
        self.filter_members(source, |member| {
            member != TypeId::NULL && member != TypeId::UNDEFINED
        })
    }

    /// `any` distributes to itself rather than to its (nonexistent) members.
    fn filter_members<F>(&self, source: TypeId, keep: F) -> TypeId
    where
        F: Fn(TypeId) -> bool,
    {
        if source == TypeId::ANY {
            return source;
        }
        let kept = union_members(self.db(), source)
            .into_iter()
            .filter(|&m| keep(m))
            .collect();
        self.db().union(kept)
    }
}
