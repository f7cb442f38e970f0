//! Sequential narrowing along one control-flow path.
//!
//! ```typescript
//! function f(x: string | number | null) {
//!   if (x === null) return;      // early_return(x === null)
//!   assertIsString(x);           // assert(asserts x is string)
//!   x;                           // string
//! }
//! ```

use crate::db::TypeDatabase;
use crate::errors::AssertionError;
use crate::narrowing::{AssertionClaim, AssertionOutcome, NarrowingContext, TypeGuard};
use crate::types::TypeId;
use tracing::debug;

/// Tracks the declared and current type of a single reference.
pub struct FlowNarrower<'a> {
    ctx: NarrowingContext<'a>,
    declared: TypeId,
    current: TypeId,
}

impl<'a> FlowNarrower<'a> {
    pub fn new(db: &'a dyn TypeDatabase, declared: TypeId) -> Self {
        FlowNarrower {
            ctx: NarrowingContext::new(db),
            declared,
            current: declared,
        }
    }

    pub fn declared(&self) -> TypeId {
        self.declared
    }

    pub fn current(&self) -> TypeId {
        self.current
    }

    /// The type inside `if (guard)` (`taken`) or its `else`, without
    /// moving the flow.
    pub fn enter_branch(&self, guard: &TypeGuard, taken: bool) -> TypeId {
        self.ctx.narrow_type(self.current, guard, taken)
    }

    /// Continue in one branch of `guard`.
    pub fn assume(&mut self, guard: &TypeGuard, taken: bool) -> TypeId {
        self.current = self.enter_branch(guard, taken);
        debug!(current = self.current.0, taken, "assume");
        self.current
    }

    /// Code after `if (guard) return;` sees the false branch.
    pub fn early_return(&mut self, guard: &TypeGuard) -> TypeId {
        self.assume(guard, false)
    }

    /// Continue after an assertion call. A predicate guard asserts its type
    /// (or truthiness); any other guard asserts its true branch.
    pub fn assert(
        &mut self,
        guard: &TypeGuard,
        claim: AssertionClaim,
    ) -> Result<AssertionOutcome, AssertionError> {
        let asserted = match guard {
            TypeGuard::Predicate { type_id, .. } => *type_id,
            TypeGuard::Truthy => None,
            other => Some(self.enter_branch(other, true)),
        };
        let outcome = self.ctx.narrow_by_assertion(self.current, asserted, claim)?;
        self.current = outcome.narrowed;
        debug!(current = self.current.0, ?claim, "assert");
        Ok(outcome)
    }

    /// Forget all narrowing (e.g. after an assignment of the declared type).
    pub fn reset(&mut self) {
        self.current = self.declared;
    }
}
