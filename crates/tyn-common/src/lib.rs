//! Common types and utilities for the tyn narrowing engine.
//!
//! This crate provides foundational types used across all tyn crates:
//! - String interning (`Atom`, `ShardedInterner`)
//! - Source spans (`Span`)
//! - Diagnostic codes, message templates and the `Diagnostic` record
//! - Engine limits and thresholds

// String interning for property names and string literals
pub mod interner;
pub use interner::{Atom, ShardedInterner};

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Centralized limits and thresholds
pub mod limits;

// Diagnostic records and the message table
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, format_message};

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod interner_tests;
#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod diagnostics_tests;
