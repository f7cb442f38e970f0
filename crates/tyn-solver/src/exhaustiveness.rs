//! Exhaustiveness of `switch` statements over discriminated unions.
//!
//! ```typescript
//! function area(shape: Shape): number {
//!   switch (shape.kind) {
//!     case "circle": return ...;
//!     case "square": return ...;
//!     default:
//!       const _exhaustiveCheck: never = shape; // error: Triangle is not never
//!   }
//! }
//! ```

use crate::db::TypeDatabase;
use crate::declare::DiscriminatedUnion;
use crate::format::format_type;
use crate::types::TypeId;
use serde::Serialize;
use tracing::{Level, debug, span};
use tyn_common::Diagnostic;
use tyn_common::diagnostics::diagnostic_codes;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExhaustivenessResult {
    pub exhaustive: bool,
    /// Unhandled tags, in declaration order.
    pub missing: Vec<TypeId>,
    /// What a `default:` branch still sees; `never` when exhaustive.
    pub residual: TypeId,
    /// Handled tags that select no variant.
    pub unknown_cases: Vec<TypeId>,
}

/// Compare the handled `case` tags against the union's variants.
pub fn check_exhaustiveness(
    db: &dyn TypeDatabase,
    union: &DiscriminatedUnion,
    handled: &[TypeId],
) -> ExhaustivenessResult {
    let _span = span!(
        Level::TRACE,
        "check_exhaustiveness",
        union_type = union.union_type.0,
        handled = handled.len()
    )
    .entered();

    let mut missing = Vec::new();
    let mut residual_members = Vec::new();
    for variant in &union.variants {
        if !handled.contains(&variant.tag) {
            missing.push(variant.tag);
            residual_members.push(variant.type_id);
        }
    }

    let mut unknown_cases: Vec<TypeId> = Vec::new();
    for &tag in handled {
        if union.variant_for(tag).is_none() && !unknown_cases.contains(&tag) {
            unknown_cases.push(tag);
        }
    }

    let residual = db.union(residual_members);
    debug!(
        missing = missing.len(),
        unknown = unknown_cases.len(),
        residual = residual.0,
        "exhaustiveness checked"
    );
    ExhaustivenessResult {
        exhaustive: missing.is_empty(),
        missing,
        residual,
        unknown_cases,
    }
}

/// The `const _exhaustiveCheck: never = x` idiom: an error unless the
/// residual is `never`.
pub fn check_never_assignment(db: &dyn TypeDatabase, residual: TypeId) -> Option<Diagnostic> {
    if residual == TypeId::NEVER {
        return None;
    }
    Some(Diagnostic::from_code(
        diagnostic_codes::TYPE_NOT_ASSIGNABLE,
        &[format_type(db, residual).as_str(), "never"],
    ))
}
