//! Tests for utility type evaluation.

use super::*;
use crate::test_fixtures::*;

fn user(interner: &TypeInterner) -> TypeId {
    interface(
        interner,
        "User",
        vec![
            prop(interner, "id", TypeId::NUMBER),
            prop(interner, "name", TypeId::STRING),
            prop(interner, "email", TypeId::STRING),
        ],
    )
}

fn eval(interner: &TypeInterner, kind: UtilityKind, args: &[TypeId]) -> TypeId {
    evaluate_utility(interner, kind, args).expect("utility evaluates")
}

#[test]
fn test_utility_names_round_trip() {
    for &kind in UtilityKind::ALL {
        assert_eq!(UtilityKind::from_name(kind.name()), Some(kind));
    }
    assert_eq!(UtilityKind::from_name("Pick"), Some(UtilityKind::Pick));
    assert_eq!(UtilityKind::from_name("Frobnicate"), None);
}

#[test]
fn test_wrong_argument_count() {
    let interner = TypeInterner::new();
    let err = evaluate_utility(&interner, UtilityKind::Pick, &[user(&interner)]).unwrap_err();
    assert_eq!(
        err,
        EvaluationError::WrongTypeArgumentCount {
            name: "Pick".to_string(),
            expected: 2,
            found: 1,
        }
    );
    let diag = err.to_diagnostic();
    assert_eq!(diag.code, 2314);
    assert!(diag.message_text.contains("'Pick'"));
}

// =============================================================================
// Mapped utilities
// =============================================================================

#[test]
fn test_pick_keeps_selected_properties() {
    let interner = TypeInterner::new();
    let user = user(&interner);
    let keys = interner.union2(interner.literal_string("id"), interner.literal_string("name"));
    let picked = eval(&interner, UtilityKind::Pick, &[user, keys]);
    let expected = interner.object(vec![
        prop(&interner, "id", TypeId::NUMBER),
        prop(&interner, "name", TypeId::STRING),
    ]);
    assert_eq!(picked, expected);
    assert_eq!(format_type(&interner, picked), "{ id: number; name: string; }");
}

#[test]
fn test_pick_unknown_key_violates_constraint() {
    let interner = TypeInterner::new();
    let user = user(&interner);
    let err = evaluate_utility(
        &interner,
        UtilityKind::Pick,
        &[user, interner.literal_string("age")],
    )
    .unwrap_err();
    assert_eq!(
        err,
        EvaluationError::ConstraintViolation {
            type_text: "\"age\"".to_string(),
            constraint: "\"id\" | \"name\" | \"email\"".to_string(),
        }
    );
    assert_eq!(err.code(), 2344);
}

#[test]
fn test_pick_from_any() {
    let interner = TypeInterner::new();
    let picked = eval(
        &interner,
        UtilityKind::Pick,
        &[TypeId::ANY, interner.literal_string("x")],
    );
    assert_eq!(picked, interner.object(vec![prop(&interner, "x", TypeId::ANY)]));
}

#[test]
fn test_omit_removes_properties() {
    let interner = TypeInterner::new();
    let user = user(&interner);
    let omitted = eval(
        &interner,
        UtilityKind::Omit,
        &[user, interner.literal_string("email")],
    );
    let expected = interner.object(vec![
        prop(&interner, "id", TypeId::NUMBER),
        prop(&interner, "name", TypeId::STRING),
    ]);
    assert_eq!(omitted, expected);

    // Keys that do not exist are ignored.
    let same = eval(
        &interner,
        UtilityKind::Omit,
        &[user, interner.literal_string("age")],
    );
    assert_eq!(format_type(&interner, same), "{ id: number; name: string; email: string; }");

    let empty = eval(&interner, UtilityKind::Omit, &[user, TypeId::STRING]);
    assert_eq!(empty, interner.object(vec![]));
}

#[test]
fn test_partial_and_required() {
    let interner = TypeInterner::new();
    let user = user(&interner);
    let partial = eval(&interner, UtilityKind::Partial, &[user]);
    assert_eq!(
        format_type(&interner, partial),
        "{ id?: number; name?: string; email?: string; }"
    );
    assert!(is_subtype_of(&interner, user, partial));
    assert!(!is_subtype_of(&interner, partial, user));

    let required = eval(&interner, UtilityKind::Required, &[partial]);
    assert!(is_subtype_of(&interner, required, user));
    // The result is structural: it no longer carries the interface name.
    let expected = interner.object(vec![
        prop(&interner, "id", TypeId::NUMBER),
        prop(&interner, "name", TypeId::STRING),
        prop(&interner, "email", TypeId::STRING),
    ]);
    assert_eq!(required, expected);
    assert_ne!(required, user);
}

#[test]
fn test_partial_leaves_primitives_and_distributes() {
    let interner = TypeInterner::new();
    assert_eq!(eval(&interner, UtilityKind::Partial, &[TypeId::STRING]), TypeId::STRING);

    let a = interner.object(vec![prop(&interner, "a", TypeId::NUMBER)]);
    let declared = interner.union2(a, TypeId::NULL);
    let partial = eval(&interner, UtilityKind::Partial, &[declared]);
    let expected = interner.union2(
        interner.object(vec![optional_prop(&interner, "a", TypeId::NUMBER)]),
        TypeId::NULL,
    );
    assert_eq!(partial, expected);
}

#[test]
fn test_readonly() {
    let interner = TypeInterner::new();
    let point = interner.object(vec![prop(&interner, "x", TypeId::NUMBER)]);
    let frozen = eval(&interner, UtilityKind::Readonly, &[point]);
    assert_eq!(format_type(&interner, frozen), "{ readonly x: number; }");

    let strings = interner.array(TypeId::STRING);
    assert_eq!(
        eval(&interner, UtilityKind::Readonly, &[strings]),
        interner.readonly_array(TypeId::STRING)
    );
}

#[test]
fn test_record_with_literal_keys() {
    let interner = TypeInterner::new();
    let a = interner.literal_string("a");
    let b = interner.literal_string("b");
    let record = eval(
        &interner,
        UtilityKind::Record,
        &[interner.union2(a, b), TypeId::BOOLEAN],
    );
    assert_eq!(format_type(&interner, record), "{ a: boolean; b: boolean; }");

    let err = evaluate_utility(&interner, UtilityKind::Record, &[TypeId::STRING, TypeId::NUMBER])
        .unwrap_err();
    assert!(matches!(err, EvaluationError::ConstraintViolation { .. }));
}

// =============================================================================
// Conditional utilities
// =============================================================================

#[test]
fn test_exclude_and_extract() {
    let interner = TypeInterner::new();
    let red = interner.literal_string("red");
    let green = interner.literal_string("green");
    let blue = interner.literal_string("blue");
    let color = interner.union(vec![red, green, blue]);

    assert_eq!(
        eval(&interner, UtilityKind::Exclude, &[color, red]),
        interner.union2(green, blue)
    );
    assert_eq!(eval(&interner, UtilityKind::Extract, &[color, red]), red);
    assert_eq!(
        eval(&interner, UtilityKind::Exclude, &[color, TypeId::STRING]),
        TypeId::NEVER
    );

    let mixed = interner.union(vec![TypeId::STRING, TypeId::NUMBER, TypeId::BOOLEAN]);
    assert_eq!(
        eval(
            &interner,
            UtilityKind::Extract,
            &[mixed, interner.union2(TypeId::STRING, TypeId::BOOLEAN)]
        ),
        interner.union2(TypeId::STRING, TypeId::BOOLEAN)
    );
    assert_eq!(eval(&interner, UtilityKind::Exclude, &[TypeId::ANY, red]), TypeId::ANY);
}

#[test]
fn test_non_nullable() {
    let interner = TypeInterner::new();
    let declared = interner.union(vec![TypeId::STRING, TypeId::NULL, TypeId::UNDEFINED]);
    assert_eq!(eval(&interner, UtilityKind::NonNullable, &[declared]), TypeId::STRING);
    assert_eq!(
        eval(&interner, UtilityKind::NonNullable, &[TypeId::NULL]),
        TypeId::NEVER
    );
}

// =============================================================================
// Awaited and string intrinsics
// =============================================================================

#[test]
fn test_awaited_unwraps_nested_promises() {
    let interner = TypeInterner::new();
    let nested = interner.promise(interner.promise(TypeId::NUMBER));
    assert_eq!(eval(&interner, UtilityKind::Awaited, &[nested]), TypeId::NUMBER);

    let mixed = interner.union2(interner.promise(TypeId::STRING), TypeId::BOOLEAN);
    assert_eq!(
        eval(&interner, UtilityKind::Awaited, &[mixed]),
        interner.union2(TypeId::STRING, TypeId::BOOLEAN)
    );
    assert_eq!(eval(&interner, UtilityKind::Awaited, &[TypeId::NUMBER]), TypeId::NUMBER);
}

#[test]
fn test_awaited_of_deep_nesting_terminates() {
    let interner = TypeInterner::new();
    let mut deep = TypeId::STRING;
    for _ in 0..80 {
        deep = interner.promise(deep);
    }
    let result = eval(&interner, UtilityKind::Awaited, &[deep]);
    assert_ne!(result, deep);
}

#[test]
fn test_string_intrinsics() {
    let interner = TypeInterner::new();
    let hello = interner.literal_string("hello world");
    assert_eq!(
        eval(&interner, UtilityKind::Uppercase, &[hello]),
        interner.literal_string("HELLO WORLD")
    );
    assert_eq!(
        eval(&interner, UtilityKind::Capitalize, &[hello]),
        interner.literal_string("Hello world")
    );
    let shout = interner.literal_string("HELLO");
    assert_eq!(
        eval(&interner, UtilityKind::Lowercase, &[shout]),
        interner.literal_string("hello")
    );
    assert_eq!(
        eval(&interner, UtilityKind::Uncapitalize, &[shout]),
        interner.literal_string("hELLO")
    );
    let empty = interner.literal_string("");
    assert_eq!(eval(&interner, UtilityKind::Capitalize, &[empty]), empty);
    assert_eq!(
        eval(&interner, UtilityKind::Uppercase, &[TypeId::STRING]),
        TypeId::STRING
    );

    let both = interner.union2(interner.literal_string("a"), interner.literal_string("b"));
    assert_eq!(
        eval(&interner, UtilityKind::Uppercase, &[both]),
        interner.union2(interner.literal_string("A"), interner.literal_string("B"))
    );

    let err = evaluate_utility(&interner, UtilityKind::Uppercase, &[TypeId::NUMBER]).unwrap_err();
    assert_eq!(
        err,
        EvaluationError::ConstraintViolation {
            type_text: "number".to_string(),
            constraint: "string".to_string(),
        }
    );
}

// =============================================================================
// Signature utilities
// =============================================================================

#[test]
fn test_return_type() {
    let interner = TypeInterner::new();
    let f = func(&interner, vec![], TypeId::STRING);
    assert_eq!(eval(&interner, UtilityKind::ReturnType, &[f]), TypeId::STRING);

    let mut guard = FunctionShape::new(vec![param(&interner, "x", TypeId::UNKNOWN)], TypeId::BOOLEAN);
    guard.type_predicate = Some(TypePredicate {
        asserts: false,
        parameter: interner.intern_string("x"),
        type_id: Some(TypeId::STRING),
    });
    let guard = interner.function(guard);
    assert_eq!(eval(&interner, UtilityKind::ReturnType, &[guard]), TypeId::BOOLEAN);

    let err = evaluate_utility(&interner, UtilityKind::ReturnType, &[TypeId::STRING]).unwrap_err();
    assert_eq!(
        err,
        EvaluationError::ConstraintViolation {
            type_text: "string".to_string(),
            constraint: "(...args: any) => any".to_string(),
        }
    );
    assert_eq!(eval(&interner, UtilityKind::ReturnType, &[TypeId::ANY]), TypeId::ANY);
}

#[test]
fn test_parameters_is_named_tuple() {
    let interner = TypeInterner::new();
    let mut y = param(&interner, "y", TypeId::NUMBER);
    y.optional = true;
    let f = func(&interner, vec![param(&interner, "x", TypeId::STRING), y], TypeId::VOID);
    let params = eval(&interner, UtilityKind::Parameters, &[f]);
    assert_eq!(format_type(&interner, params), "[x: string, y?: number]");

    let no_params = func(&interner, vec![], TypeId::VOID);
    assert_eq!(
        eval(&interner, UtilityKind::Parameters, &[no_params]),
        interner.tuple(vec![])
    );
}

#[test]
fn test_constructor_utilities() {
    let interner = TypeInterner::new();
    let dog = class_instance(&interner, "Dog", vec![prop(&interner, "name", TypeId::STRING)]);
    let ctor = constructor(&interner, vec![param(&interner, "name", TypeId::STRING)], dog);

    assert_eq!(eval(&interner, UtilityKind::InstanceType, &[ctor]), dog);
    let params = eval(&interner, UtilityKind::ConstructorParameters, &[ctor]);
    assert_eq!(format_type(&interner, params), "[name: string]");

    // A plain function is not constructible and a constructor is not callable.
    let f = func(&interner, vec![], dog);
    let err = evaluate_utility(&interner, UtilityKind::InstanceType, &[f]).unwrap_err();
    assert_eq!(
        err,
        EvaluationError::ConstraintViolation {
            type_text: "() => Dog".to_string(),
            constraint: "abstract new (...args: any) => any".to_string(),
        }
    );
    assert!(evaluate_utility(&interner, UtilityKind::ReturnType, &[ctor]).is_err());
}

#[test]
fn test_this_parameter_utilities() {
    let interner = TypeInterner::new();
    let window = interface(&interner, "Window", vec![prop(&interner, "title", TypeId::STRING)]);
    let mut shape = FunctionShape::new(vec![param(&interner, "x", TypeId::NUMBER)], TypeId::VOID);
    shape.this_type = Some(window);
    let method = interner.function(shape);

    assert_eq!(eval(&interner, UtilityKind::ThisParameterType, &[method]), window);
    let detached = eval(&interner, UtilityKind::OmitThisParameter, &[method]);
    assert_eq!(
        detached,
        func(&interner, vec![param(&interner, "x", TypeId::NUMBER)], TypeId::VOID)
    );

    let plain = func(&interner, vec![], TypeId::VOID);
    assert_eq!(
        eval(&interner, UtilityKind::ThisParameterType, &[plain]),
        TypeId::UNKNOWN
    );
    assert_eq!(eval(&interner, UtilityKind::OmitThisParameter, &[plain]), plain);
}

#[test]
fn test_signature_utilities_distribute() {
    let interner = TypeInterner::new();
    let f = func(&interner, vec![], TypeId::STRING);
    let g = func(&interner, vec![], TypeId::NUMBER);
    let either = interner.union2(f, g);
    assert_eq!(
        eval(&interner, UtilityKind::ReturnType, &[either]),
        interner.union2(TypeId::STRING, TypeId::NUMBER)
    );
}

// =============================================================================
// Markers and constructors
// =============================================================================

#[test]
fn test_no_infer_marks_type_parameters_only() {
    let interner = TypeInterner::new();
    assert_eq!(eval(&interner, UtilityKind::NoInfer, &[TypeId::STRING]), TypeId::STRING);

    let t = interner.type_param(TypeParamInfo {
        name: interner.intern_string("T"),
        constraint: None,
    });
    let marked = eval(&interner, UtilityKind::NoInfer, &[t]);
    assert_eq!(marked, interner.no_infer(t));
    assert_eq!(format_type(&interner, marked), "NoInfer<T>");
}

#[test]
fn test_builtin_generic_constructors() {
    let interner = TypeInterner::new();
    assert_eq!(
        eval(&interner, UtilityKind::Promise, &[TypeId::NUMBER]),
        interner.promise(TypeId::NUMBER)
    );
    assert_eq!(
        eval(&interner, UtilityKind::Array, &[TypeId::NUMBER]),
        interner.array(TypeId::NUMBER)
    );
    assert_eq!(
        eval(&interner, UtilityKind::ReadonlyArray, &[TypeId::NUMBER]),
        interner.readonly_array(TypeId::NUMBER)
    );
}
