//! Tests for type guard narrowing.
//!
//! Each guard is applied to a declared type and both branches are checked:
//! - typeof, truthiness, equality and nullish checks
//! - `in`, `instanceof` and discriminant property checks
//! - user-defined predicates and assertion functions

use super::*;
use crate::test_fixtures::*;

fn typeof_guard(tag: &str) -> TypeGuard {
    TypeGuard::Typeof(TypeTag::from_typeof(tag).expect("known typeof tag"))
}

// =============================================================================
// typeof
// =============================================================================

#[test]
fn test_typeof_splits_primitives() {
    let interner = TypeInterner::new();
    let declared = interner.union2(TypeId::STRING, TypeId::NUMBER);
    let result = narrow(&interner, declared, &typeof_guard("string"));
    assert_eq!(result, GuardResult::new(TypeId::STRING, TypeId::NUMBER));
}

#[test]
fn test_typeof_keeps_literals() {
    let interner = TypeInterner::new();
    let a = interner.literal_string("a");
    let one = interner.literal_number(1.0);
    let declared = interner.union(vec![a, one, TypeId::NULL]);
    let result = narrow(&interner, declared, &typeof_guard("number"));
    assert_eq!(result.true_type, one);
    assert_eq!(result.false_type, interner.union2(a, TypeId::NULL));
}

#[test]
fn test_typeof_object_and_function() {
    let interner = TypeInterner::new();
    let user = interface(&interner, "User", vec![prop(&interner, "id", TypeId::NUMBER)]);
    let callback = func(&interner, vec![], TypeId::VOID);
    let declared = interner.union(vec![user, callback, TypeId::NULL]);

    let objects = narrow(&interner, declared, &typeof_guard("object"));
    assert_eq!(objects.true_type, user);
    assert_eq!(objects.false_type, interner.union2(callback, TypeId::NULL));

    let functions = narrow(&interner, declared, &typeof_guard("function"));
    assert_eq!(functions.true_type, callback);
    assert_eq!(functions.false_type, interner.union2(user, TypeId::NULL));
}

#[test]
fn test_typeof_on_unknown_yields_tag_type() {
    let interner = TypeInterner::new();
    let result = narrow(&interner, TypeId::UNKNOWN, &typeof_guard("string"));
    assert_eq!(result, GuardResult::new(TypeId::STRING, TypeId::UNKNOWN));
}

#[test]
fn test_typeof_no_matching_member_is_never() {
    let interner = TypeInterner::new();
    let declared = interner.union2(TypeId::STRING, TypeId::NUMBER);
    let result = narrow(&interner, declared, &typeof_guard("boolean"));
    assert_eq!(result, GuardResult::new(TypeId::NEVER, declared));
}

#[test]
fn test_typeof_unconstrained_type_parameter() {
    let interner = TypeInterner::new();
    let t = interner.type_param(TypeParamInfo {
        name: interner.intern_string("T"),
        constraint: None,
    });
    let result = narrow(&interner, t, &typeof_guard("string"));
    assert_ne!(result.true_type, TypeId::NEVER);
    assert!(is_subtype_of(&interner, result.true_type, TypeId::STRING));
    assert_eq!(result.false_type, t);
}

// =============================================================================
// Truthiness
// =============================================================================

#[test]
fn test_truthiness_removes_nullish() {
    let interner = TypeInterner::new();
    let declared = interner.union(vec![TypeId::STRING, TypeId::NULL, TypeId::UNDEFINED]);
    let result = narrow(&interner, declared, &TypeGuard::Truthy);
    assert_eq!(result.true_type, TypeId::STRING);
    assert_eq!(result.false_type, declared);
}

#[test]
fn test_truthiness_splits_boolean() {
    let interner = TypeInterner::new();
    let result = narrow(&interner, TypeId::BOOLEAN, &TypeGuard::Truthy);
    assert_eq!(result.true_type, interner.literal_boolean(true));
    assert_eq!(result.false_type, interner.literal_boolean(false));
}

#[test]
fn test_truthiness_of_literals() {
    let interner = TypeInterner::new();
    let empty = interner.literal_string("");
    let a = interner.literal_string("a");
    let zero = interner.literal_number(0.0);
    let one = interner.literal_number(1.0);
    let zero_n = interner.literal_bigint("0");
    let declared = interner.union(vec![empty, a, zero, one, zero_n]);

    let result = narrow(&interner, declared, &TypeGuard::Truthy);
    assert_eq!(result.true_type, interner.union2(a, one));
    assert_eq!(result.false_type, interner.union(vec![empty, zero, zero_n]));
}

#[test]
fn test_objects_are_always_truthy() {
    let interner = TypeInterner::new();
    let user = interface(&interner, "User", vec![prop(&interner, "id", TypeId::NUMBER)]);
    let declared = interner.union2(user, TypeId::UNDEFINED);
    let result = narrow(&interner, declared, &TypeGuard::Truthy);
    assert_eq!(result, GuardResult::new(user, TypeId::UNDEFINED));
}

#[test]
fn test_truthiness_of_unknown_is_unchanged() {
    let interner = TypeInterner::new();
    let result = narrow(&interner, TypeId::UNKNOWN, &TypeGuard::Truthy);
    assert_eq!(result, GuardResult::unchanged(TypeId::UNKNOWN));
}

// =============================================================================
// Equality
// =============================================================================

#[test]
fn test_equality_with_literal() {
    let interner = TypeInterner::new();
    let a = interner.literal_string("a");
    let b = interner.literal_string("b");
    let c = interner.literal_string("c");
    let declared = interner.union(vec![a, b, c]);
    let result = narrow(&interner, declared, &TypeGuard::Equality(a));
    assert_eq!(result, GuardResult::new(a, interner.union2(b, c)));
}

#[test]
fn test_equality_narrows_primitive_to_literal() {
    let interner = TypeInterner::new();
    let a = interner.literal_string("a");
    let declared = interner.union2(TypeId::STRING, TypeId::NUMBER);
    let result = narrow(&interner, declared, &TypeGuard::Equality(a));
    assert_eq!(result.true_type, a);
    // `string` still holds values other than "a".
    assert_eq!(result.false_type, declared);
}

#[test]
fn test_equality_with_boolean_literal() {
    let interner = TypeInterner::new();
    let t = interner.literal_boolean(true);
    let f = interner.literal_boolean(false);
    let result = narrow(&interner, TypeId::BOOLEAN, &TypeGuard::Equality(t));
    assert_eq!(result, GuardResult::new(t, f));
}

#[test]
fn test_equality_with_null_and_undefined() {
    let interner = TypeInterner::new();
    let declared = interner.union2(TypeId::NUMBER, TypeId::NULL);
    let result = narrow(&interner, declared, &TypeGuard::Equality(TypeId::NULL));
    assert_eq!(result, GuardResult::new(TypeId::NULL, TypeId::NUMBER));

    let with_void = interner.union2(TypeId::STRING, TypeId::VOID);
    let result = narrow(&interner, with_void, &TypeGuard::Equality(TypeId::UNDEFINED));
    assert_eq!(result, GuardResult::new(TypeId::UNDEFINED, TypeId::STRING));
}

#[test]
fn test_equality_with_wide_type_keeps_false_branch() {
    let interner = TypeInterner::new();
    let a = interner.literal_string("a");
    let b = interner.literal_string("b");
    let declared = interner.union2(a, b);
    let result = narrow(&interner, declared, &TypeGuard::Equality(TypeId::STRING));
    assert_eq!(result, GuardResult::unchanged(declared));
}

#[test]
fn test_equality_with_unrelated_type_is_never() {
    let interner = TypeInterner::new();
    let result = narrow(
        &interner,
        TypeId::STRING,
        &TypeGuard::Equality(interner.literal_number(1.0)),
    );
    assert_eq!(result, GuardResult::new(TypeId::NEVER, TypeId::STRING));
}

#[test]
fn test_strict_equality_narrows_both_operands() {
    let interner = TypeInterner::new();
    let a = interner.literal_string("a");
    let b = interner.literal_string("b");
    let left = interner.union2(a, b);
    let right = interner.union2(TypeId::STRING, TypeId::NULL);

    let ctx = NarrowingContext::new(&interner);
    let (left_result, right_result) = ctx.narrow_by_strict_equality(left, right);
    assert_eq!(left_result.true_type, left);
    assert_eq!(right_result.true_type, left);
    assert_eq!(right_result.false_type, right);
}

// =============================================================================
// Nullish equality
// =============================================================================

#[test]
fn test_nullish_equality() {
    let interner = TypeInterner::new();
    let declared = interner.union(vec![TypeId::STRING, TypeId::NULL, TypeId::UNDEFINED]);
    let result = narrow(&interner, declared, &TypeGuard::NullishEquality);
    assert_eq!(
        result,
        GuardResult::new(
            interner.union2(TypeId::NULL, TypeId::UNDEFINED),
            TypeId::STRING
        )
    );
}

#[test]
fn test_nullish_equality_maps_void_to_undefined() {
    let interner = TypeInterner::new();
    let declared = interner.union2(TypeId::NUMBER, TypeId::VOID);
    let result = narrow(&interner, declared, &TypeGuard::NullishEquality);
    assert_eq!(result, GuardResult::new(TypeId::UNDEFINED, TypeId::NUMBER));
}

#[test]
fn test_remove_nullish() {
    let interner = TypeInterner::new();
    let declared = interner.union(vec![TypeId::STRING, TypeId::NULL, TypeId::VOID]);
    assert_eq!(remove_nullish(&interner, declared), TypeId::STRING);
    assert_eq!(remove_nullish(&interner, TypeId::NULL), TypeId::NEVER);
    assert_eq!(remove_nullish(&interner, TypeId::UNKNOWN), TypeId::UNKNOWN);
    assert!(can_be_nullish(&interner, declared));
    assert!(!can_be_nullish(&interner, TypeId::STRING));
}

// =============================================================================
// in
// =============================================================================

#[test]
fn test_in_operator_splits_by_property() {
    let interner = TypeInterner::new();
    let a = interface(&interner, "A", vec![prop(&interner, "x", TypeId::NUMBER)]);
    let b = interface(&interner, "B", vec![prop(&interner, "y", TypeId::STRING)]);
    let declared = interner.union2(a, b);
    let x = interner.intern_string("x");
    let result = narrow(&interner, declared, &TypeGuard::InProperty(x));
    assert_eq!(result, GuardResult::new(a, b));
}

#[test]
fn test_in_operator_optional_property_goes_both_ways() {
    let interner = TypeInterner::new();
    let fish = interface(&interner, "Fish", vec![prop(&interner, "swim", TypeId::NUMBER)]);
    let duck = interface(
        &interner,
        "Duck",
        vec![optional_prop(&interner, "swim", TypeId::NUMBER)],
    );
    let bird = interface(&interner, "Bird", vec![prop(&interner, "fly", TypeId::NUMBER)]);
    let declared = interner.union(vec![fish, duck, bird]);
    let swim = interner.intern_string("swim");
    let result = narrow(&interner, declared, &TypeGuard::InProperty(swim));
    assert_eq!(result.true_type, interner.union2(fish, duck));
    assert_eq!(result.false_type, interner.union2(duck, bird));
}

#[test]
fn test_in_operator_on_unknown() {
    let interner = TypeInterner::new();
    let x = interner.intern_string("x");
    let result = narrow(&interner, TypeId::UNKNOWN, &TypeGuard::InProperty(x));
    let expected = interner.object(vec![prop(&interner, "x", TypeId::UNKNOWN)]);
    assert_eq!(result, GuardResult::new(expected, TypeId::UNKNOWN));
}

#[test]
fn test_in_operator_ignores_primitives() {
    let interner = TypeInterner::new();
    let a = interface(&interner, "A", vec![prop(&interner, "x", TypeId::NUMBER)]);
    let declared = interner.union2(a, TypeId::STRING);
    let x = interner.intern_string("x");
    let result = narrow(&interner, declared, &TypeGuard::InProperty(x));
    assert_eq!(result, GuardResult::new(a, TypeId::STRING));
}

// =============================================================================
// instanceof
// =============================================================================

#[test]
fn test_instanceof_matches_class_by_name() {
    let interner = TypeInterner::new();
    let dog = class_instance(&interner, "Dog", vec![prop(&interner, "name", TypeId::STRING)]);
    let cat = class_instance(&interner, "Cat", vec![prop(&interner, "name", TypeId::STRING)]);
    let declared = interner.union(vec![dog, cat, TypeId::STRING]);
    let result = narrow(&interner, declared, &TypeGuard::Instanceof(dog));
    assert_eq!(result.true_type, dog);
    assert_eq!(result.false_type, interner.union2(cat, TypeId::STRING));
}

#[test]
fn test_instanceof_narrows_structural_supertype() {
    let interner = TypeInterner::new();
    let animal = interface(&interner, "Animal", vec![prop(&interner, "name", TypeId::STRING)]);
    let dog = class_instance(
        &interner,
        "Dog",
        vec![
            prop(&interner, "name", TypeId::STRING),
            prop(&interner, "bark", func(&interner, vec![], TypeId::VOID)),
        ],
    );
    let declared = interner.union2(animal, TypeId::NUMBER);
    let result = narrow(&interner, declared, &TypeGuard::Instanceof(dog));
    assert_eq!(result.true_type, dog);
    assert_eq!(result.false_type, declared);
}

#[test]
fn test_instanceof_on_unknown() {
    let interner = TypeInterner::new();
    let dog = class_instance(&interner, "Dog", vec![]);
    let result = narrow(&interner, TypeId::UNKNOWN, &TypeGuard::Instanceof(dog));
    assert_eq!(result, GuardResult::new(dog, TypeId::UNKNOWN));
}

// =============================================================================
// Discriminants
// =============================================================================

#[test]
fn test_discriminant_selects_variant() {
    let interner = TypeInterner::new();
    let s = shapes(&interner);
    let guard = TypeGuard::Discriminant {
        property_name: interner.intern_string("kind"),
        value_type: interner.literal_string("circle"),
    };
    let result = narrow(&interner, s.union.union_type, &guard);
    assert_eq!(result.true_type, s.circle);
    assert_eq!(result.false_type, interner.union2(s.square, s.triangle));
}

#[test]
fn test_discriminant_with_unknown_tag() {
    let interner = TypeInterner::new();
    let s = shapes(&interner);
    let guard = TypeGuard::Discriminant {
        property_name: interner.intern_string("kind"),
        value_type: interner.literal_string("hexagon"),
    };
    let result = narrow(&interner, s.union.union_type, &guard);
    assert_eq!(result, GuardResult::new(TypeId::NEVER, s.union.union_type));
}

#[test]
fn test_discriminant_wide_property_stays_in_both() {
    let interner = TypeInterner::new();
    let circle = tagged(&interner, "Circle", "circle", "radius");
    let other = interface(&interner, "Other", vec![prop(&interner, "kind", TypeId::STRING)]);
    let declared = interner.union2(circle, other);
    let guard = TypeGuard::Discriminant {
        property_name: interner.intern_string("kind"),
        value_type: interner.literal_string("circle"),
    };
    let result = narrow(&interner, declared, &guard);
    assert_eq!(result.true_type, declared);
    assert_eq!(result.false_type, other);
}

#[test]
fn test_optional_discriminant_matches_undefined() {
    let interner = TypeInterner::new();
    let loaded = interface(
        &interner,
        "Loaded",
        vec![prop(&interner, "state", interner.literal_string("loaded"))],
    );
    let idle = interface(
        &interner,
        "Idle",
        vec![optional_prop(&interner, "state", interner.literal_string("idle"))],
    );
    let declared = interner.union2(loaded, idle);
    let guard = TypeGuard::Discriminant {
        property_name: interner.intern_string("state"),
        value_type: TypeId::UNDEFINED,
    };
    let result = narrow(&interner, declared, &guard);
    assert_eq!(result.true_type, idle);
    assert_eq!(result.false_type, declared);
}

// =============================================================================
// Predicates and assertions
// =============================================================================

#[test]
fn test_predicate_narrows_to_matching_members() {
    let interner = TypeInterner::new();
    let fish = interface(&interner, "Fish", vec![prop(&interner, "swim", TypeId::NUMBER)]);
    let bird = interface(&interner, "Bird", vec![prop(&interner, "fly", TypeId::NUMBER)]);
    let declared = interner.union2(fish, bird);
    let guard = TypeGuard::Predicate {
        type_id: Some(fish),
        asserts: false,
    };
    assert_eq!(narrow(&interner, declared, &guard), GuardResult::new(fish, bird));
}

#[test]
fn test_predicate_narrower_than_declared() {
    let interner = TypeInterner::new();
    let a = interner.literal_string("a");
    let declared = interner.union2(TypeId::STRING, TypeId::NUMBER);
    let guard = TypeGuard::Predicate {
        type_id: Some(a),
        asserts: false,
    };
    let result = narrow(&interner, declared, &guard);
    assert_eq!(result, GuardResult::new(a, declared));
}

#[test]
fn test_predicate_on_unknown() {
    let interner = TypeInterner::new();
    let guard = TypeGuard::Predicate {
        type_id: Some(TypeId::STRING),
        asserts: false,
    };
    let result = narrow(&interner, TypeId::UNKNOWN, &guard);
    assert_eq!(result, GuardResult::new(TypeId::STRING, TypeId::UNKNOWN));
}

#[test]
fn test_asserts_predicate_has_no_false_branch() {
    let interner = TypeInterner::new();
    let declared = interner.union2(TypeId::STRING, TypeId::NUMBER);
    let guard = TypeGuard::Predicate {
        type_id: Some(TypeId::STRING),
        asserts: true,
    };
    assert_eq!(
        narrow(&interner, declared, &guard),
        GuardResult::new(TypeId::STRING, TypeId::NEVER)
    );

    let truthy = TypeGuard::Predicate {
        type_id: None,
        asserts: true,
    };
    let nullable = interner.union2(TypeId::STRING, TypeId::NULL);
    assert_eq!(
        narrow(&interner, nullable, &truthy),
        GuardResult::new(TypeId::STRING, TypeId::NEVER)
    );
}

#[test]
fn test_assertion_claims() {
    let interner = TypeInterner::new();
    let declared = interner.union2(TypeId::STRING, TypeId::NUMBER);
    let ctx = NarrowingContext::new(&interner);

    let satisfied = ctx
        .narrow_by_assertion(declared, Some(TypeId::STRING), AssertionClaim::Satisfied)
        .unwrap();
    assert_eq!(satisfied.narrowed, TypeId::STRING);
    assert!(satisfied.warning.is_none());

    let unverified = ctx
        .narrow_by_assertion(declared, Some(TypeId::STRING), AssertionClaim::Unverified)
        .unwrap();
    assert_eq!(unverified.narrowed, TypeId::STRING);
    let warning = unverified.warning.expect("unverified assertion warns");
    assert_eq!(warning.code, 90006);
    assert!(!warning.is_error());

    let violated = ctx
        .narrow_by_assertion(declared, Some(TypeId::STRING), AssertionClaim::Violated)
        .unwrap_err();
    assert_eq!(
        violated,
        AssertionError::Failed {
            actual: "number | string".to_string(),
            asserted: "string".to_string(),
        }
    );
    assert_eq!(violated.to_diagnostic().code, 2322);
}

// =============================================================================
// Invariants
// =============================================================================

#[test]
fn test_never_narrows_to_never() {
    let interner = TypeInterner::new();
    let guards = [
        typeof_guard("string"),
        TypeGuard::Truthy,
        TypeGuard::NullishEquality,
        TypeGuard::Equality(TypeId::NULL),
        TypeGuard::InProperty(interner.intern_string("x")),
    ];
    for guard in &guards {
        assert_eq!(
            narrow(&interner, TypeId::NEVER, guard),
            GuardResult::unchanged(TypeId::NEVER)
        );
    }
}

#[test]
fn test_branches_stay_within_declared_type() {
    let interner = TypeInterner::new();
    let s = shapes(&interner);
    let callback = func(&interner, vec![], TypeId::VOID);
    let declared = interner.union(vec![
        s.union.union_type,
        TypeId::STRING,
        TypeId::NUMBER,
        TypeId::BOOLEAN,
        TypeId::NULL,
        TypeId::UNDEFINED,
        callback,
    ]);
    let dog = class_instance(&interner, "Dog", vec![]);

    let mut guards: Vec<TypeGuard> = [
        "string", "number", "boolean", "bigint", "symbol", "undefined", "object", "function",
    ]
    .iter()
    .map(|tag| typeof_guard(tag))
    .collect();
    guards.extend([
        TypeGuard::Truthy,
        TypeGuard::NullishEquality,
        TypeGuard::Equality(interner.literal_string("a")),
        TypeGuard::Equality(TypeId::NULL),
        TypeGuard::Equality(interner.literal_boolean(false)),
        TypeGuard::InProperty(interner.intern_string("radius")),
        TypeGuard::Instanceof(dog),
        TypeGuard::Discriminant {
            property_name: interner.intern_string("kind"),
            value_type: interner.literal_string("square"),
        },
        TypeGuard::Predicate {
            type_id: Some(s.circle),
            asserts: false,
        },
    ]);

    for guard in &guards {
        let result = narrow(&interner, declared, guard);
        assert_branches_within(&interner, declared, result);
    }
}

#[test]
fn test_narrow_type_selects_branch() {
    let interner = TypeInterner::new();
    let declared = interner.union2(TypeId::STRING, TypeId::NULL);
    let ctx = NarrowingContext::new(&interner);
    assert_eq!(
        ctx.narrow_type(declared, &TypeGuard::Truthy, true),
        TypeId::STRING
    );
    assert_eq!(
        ctx.narrow_type(declared, &TypeGuard::Truthy, false),
        declared
    );
}
