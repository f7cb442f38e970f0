//! The interner is shared across threads; ids must agree everywhere.

use super::*;
use crate::test_fixtures::*;
use rayon::prelude::*;

#[test]
fn test_concurrent_literal_interning_agrees() {
    let interner = TypeInterner::new();
    let ids: Vec<TypeId> = (0..2000)
        .into_par_iter()
        .map(|i| interner.literal_number((i % 50) as f64))
        .collect();
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(*id, interner.literal_number((i % 50) as f64));
    }
}

#[test]
fn test_concurrent_unions_are_canonical() {
    let interner = TypeInterner::new();
    let names: Vec<String> = (0..32).map(|i| format!("v{i}")).collect();
    let unions: Vec<TypeId> = (0..256)
        .into_par_iter()
        .map(|i| {
            let mut members: Vec<TypeId> =
                names.iter().map(|n| interner.literal_string(n)).collect();
            members.rotate_left(i % names.len());
            interner.union(members)
        })
        .collect();
    assert!(unions.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_concurrent_narrowing() {
    let interner = TypeInterner::new();
    let s = shapes(&interner);
    let kind = interner.intern_string("kind");
    let tags: Vec<TypeId> = s.union.tags().collect();
    let results: Vec<GuardResult> = tags
        .par_iter()
        .map(|&tag| {
            narrow(
                &interner,
                s.union.union_type,
                &TypeGuard::Discriminant {
                    property_name: kind,
                    value_type: tag,
                },
            )
        })
        .collect();
    assert_eq!(results[0].true_type, s.circle);
    assert_eq!(results[1].true_type, s.square);
    assert_eq!(results[2].true_type, s.triangle);
}
