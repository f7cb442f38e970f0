//! Evaluation rules for the utility type families.

pub mod awaited;
pub mod conditional;
pub mod mapped;
pub mod signature;
pub mod string_intrinsic;
