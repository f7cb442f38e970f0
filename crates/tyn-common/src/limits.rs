//! Centralized limits and thresholds for the narrowing engine.
//!
//! Each limit bounds a recursive algorithm so that pathological or cyclic
//! declarations degrade to a conservative answer instead of overflowing
//! the stack.

/// Maximum nesting depth for structural subtype checks.
///
/// Past this depth the checker assumes the relation holds, the same
/// coinductive answer it gives for a detected cycle.
///
/// ```typescript
/// type Deep = { next: { next: { next: /* ... 100 levels ... */ } } };
/// ```
pub const MAX_SUBTYPE_DEPTH: u32 = 100;

/// Maximum number of `Promise` layers `Awaited<T>` unwraps.
///
/// ```typescript
/// type N = Awaited<Promise<Promise<Promise<number>>>>; // number
/// ```
pub const MAX_AWAITED_DEPTH: u32 = 50;

/// Maximum depth of alias-to-alias resolution during lowering.
///
/// ```typescript
/// type A = B; type B = C; /* ... */
/// ```
pub const MAX_ALIAS_RESOLUTION_DEPTH: u32 = 50;

/// Maximum number of tokens the parser consumes while recovering from a
/// syntax error before giving up on the current declaration.
pub const MAX_RECOVERY_TOKENS: u32 = 10_000;

/// Maximum nesting depth of a parsed type.
///
/// Counts nested types (parentheses, type arguments, members, array
/// suffixes). Past the limit the parser reports the nesting and skips the
/// rest of the nested type, so lowering and formatting never see a deeper
/// tree. Low enough that a debug build handles the deepest accepted type on
/// a 2 MiB thread stack.
///
/// ```typescript
/// type Deep = ((((((((((((/* ... 256 levels ... */ string))))))))))));
/// type Grid = number[][][][][][][][][][][][][][][][] /* ... */;
/// ```
pub const MAX_PARSER_RECURSION_DEPTH: u32 = 256;
