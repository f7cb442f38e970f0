//! Tests for lowering type annotations against a set of declarations.
use super::*;
use tyn_common::Diagnostic;
use tyn_solver::type_queries::object_shape_id;
use tyn_solver::{TypeData, TypeId, TypeInterner, format_type};

const USER: &str = "interface User { id: number; name: string; email?: string }";

fn with_lowering<R>(source: &str, f: impl FnOnce(&TypeInterner, &TypeLowering<'_>) -> R) -> R {
    let interner = TypeInterner::new();
    let program = Program::from_sources([("test.ts", source)]);
    assert!(
        program.declaration_diagnostics().is_empty(),
        "unexpected diagnostics: {:?}",
        program.declaration_diagnostics()
    );
    let lowering = program.lowering(&interner);
    f(&interner, &lowering)
}

/// Lower `annotation` and return its text and the diagnostics it produced.
fn eval(source: &str, annotation: &str) -> (String, Vec<Diagnostic>) {
    with_lowering(source, |interner, lowering| {
        let type_id = lowering.lower_annotation(annotation);
        (format_type(interner, type_id), lowering.take_diagnostics())
    })
}

fn eval_ok(source: &str, annotation: &str) -> String {
    let (text, diagnostics) = eval(source, annotation);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    text
}

/// Lower an annotation expected to fail with exactly one diagnostic.
fn eval_err(source: &str, annotation: &str) -> Diagnostic {
    let (text, mut diagnostics) = eval(source, annotation);
    assert_eq!(text, "error");
    assert_eq!(diagnostics.len(), 1, "diagnostics: {diagnostics:?}");
    diagnostics.remove(0)
}

// =============================================================================
// Primitives and references
// =============================================================================

#[test]
fn test_keywords_and_literals() {
    with_lowering("", |interner, lowering| {
        assert_eq!(lowering.lower_annotation("string"), TypeId::STRING);
        assert_eq!(lowering.lower_annotation("void"), TypeId::VOID);
        assert_eq!(lowering.lower_annotation("object"), TypeId::OBJECT);
        assert_eq!(lowering.lower_annotation("\"circle\""), interner.literal_string("circle"));
        assert_eq!(lowering.lower_annotation("-1"), interner.literal_number(-1.0));
        assert_eq!(lowering.lower_annotation("10n"), interner.literal_bigint("10"));
        assert_eq!(lowering.lower_annotation("true"), interner.literal_boolean(true));
        assert!(lowering.diagnostics().is_empty());
    });
}

#[test]
fn test_interface_reference_prints_its_name() {
    assert_eq!(eval_ok(USER, "User"), "User");
    assert_eq!(eval_ok(USER, "User[]"), "User[]");
}

#[test]
fn test_unknown_name() {
    let diag = eval_err("", "Missing");
    assert_eq!(diag.code, 2304);
    assert_eq!(diag.message_text, "Cannot find name 'Missing'.");
    assert_eq!(diag.file, ANNOTATION_FILE);
    assert_eq!((diag.start, diag.length), (0, 7));
}

#[test]
fn test_syntax_error_lowers_to_error() {
    let (text, diagnostics) = eval("", "{ a: }");
    assert_eq!(text, "error");
    assert!(diagnostics.iter().any(|d| d.code == 1110));
}

#[test]
fn test_this_outside_class_or_interface() {
    let diag = eval_err("", "this");
    assert_eq!(diag.code, 2526);
}

// =============================================================================
// Utility types
// =============================================================================

#[test]
fn test_pick_through_lowering() {
    assert_eq!(
        eval_ok(USER, "Pick<User, \"id\" | \"name\">"),
        "{ id: number; name: string; }"
    );
}

#[test]
fn test_utility_errors_are_reported_at_the_reference() {
    let annotation = "Pick<User, \"age\">";
    let diag = eval_err(USER, annotation);
    assert_eq!(diag.code, 2344);
    assert_eq!(diag.start, 0);
    assert_eq!(diag.length as usize, annotation.len());

    let diag = eval_err(USER, "Pick<User>");
    assert_eq!(diag.code, 2314);
}

#[test]
fn test_utility_argument_errors_do_not_cascade() {
    let diag = eval_err(USER, "Partial<Missing>");
    assert_eq!(diag.code, 2304);
}

#[test]
fn test_nested_utilities() {
    assert_eq!(
        eval_ok("", "Awaited<Promise<Promise<number>>>"),
        "number"
    );
    assert_eq!(
        eval_ok("", "Uppercase<\"hello world\">"),
        "\"HELLO WORLD\""
    );
    assert_eq!(
        eval_ok("type Color = \"red\" | \"green\" | \"blue\";", "Exclude<Color, \"red\">"),
        "\"green\" | \"blue\""
    );
    assert_eq!(
        eval_ok("", "NonNullable<string | number | null | undefined>"),
        "number | string"
    );
}

#[test]
fn test_user_declaration_shadows_utility_name() {
    let source = "interface Partial { mine: boolean }";
    assert_eq!(eval_ok(source, "Partial"), "Partial");
}

// =============================================================================
// Unions
// =============================================================================

#[test]
fn test_nullish_members_print_last() {
    assert_eq!(eval_ok("", "undefined | null | string"), "string | null | undefined");
    assert_eq!(
        eval_ok("", "null | \"a\" | undefined | number"),
        "number | \"a\" | null | undefined"
    );
}

#[test]
fn test_duplicate_union_member() {
    let (text, diagnostics) = eval("", "\"a\" | \"a\"");
    assert_eq!(text, "\"a\"");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, 90002);
    assert_eq!(
        diagnostics[0].message_text,
        "Duplicate member '\"a\"' in union type declaration."
    );
}

#[test]
fn test_parenthesized_union_member_is_nested() {
    let (_, diagnostics) = eval("", "(\"a\" | \"b\") | \"c\"");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, 90003);
}

#[test]
fn test_union_alias_members_are_flattened() {
    let source = "type AB = \"a\" | \"b\";\ntype ABC = AB | \"c\";";
    with_lowering(source, |interner, lowering| {
        let abc = lowering.lower_annotation("ABC");
        assert!(lowering.diagnostics().is_empty());
        assert_eq!(
            lowering.written_members(abc),
            vec![
                interner.literal_string("a"),
                interner.literal_string("b"),
                interner.literal_string("c"),
            ]
        );
    });
}

#[test]
fn test_written_order_survives_canonical_order() {
    with_lowering("", |interner, lowering| {
        // Intern in the opposite order first.
        let c = interner.literal_string("c");
        let b = interner.literal_string("b");
        let a = interner.literal_string("a");
        let union = lowering.lower_annotation("\"a\" | \"b\" | \"c\"");
        assert_eq!(format_type(interner, union), "\"c\" | \"b\" | \"a\"");
        assert_eq!(lowering.written_members(union), vec![a, b, c]);
    });
}

// =============================================================================
// Intersections
// =============================================================================

#[test]
fn test_object_intersection_merges() {
    assert_eq!(
        eval_ok("", "{ a: string } & { b: number }"),
        "{ a: string; b: number; }"
    );
}

#[test]
fn test_this_type_sets_method_receivers() {
    assert_eq!(
        eval_ok(USER, "{ greet(): string } & ThisType<User>"),
        "{ greet: (this: User) => string; }"
    );
}

#[test]
fn test_this_type_with_primitive_is_unsupported() {
    let diag = eval_err(USER, "string & ThisType<User>");
    assert_eq!(diag.code, 90007);
    assert_eq!(
        diag.message_text,
        "Intersection of 'string' and 'ThisType<User>' is not supported."
    );
}

#[test]
fn test_disjoint_primitives_intersect_to_never() {
    assert_eq!(eval_ok("", "string & number"), "never");
}

// =============================================================================
// Arrays, tuples, indexed access
// =============================================================================

#[test]
fn test_readonly_operator() {
    assert_eq!(eval_ok("", "readonly string[]"), "readonly string[]");
    with_lowering("", |interner, lowering| {
        let tuple = lowering.lower_annotation("readonly [string, number]");
        assert!(matches!(
            interner.lookup(tuple),
            Some(TypeData::Tuple { readonly: true, .. })
        ));
    });

    let (text, diagnostics) = eval("", "readonly string");
    assert_eq!(text, "string");
    assert_eq!(diagnostics[0].code, 1354);
}

#[test]
fn test_indexed_access_on_properties() {
    with_lowering(USER, |interner, lowering| {
        assert_eq!(lowering.lower_annotation("User[\"id\"]"), TypeId::NUMBER);
        assert_eq!(
            lowering.lower_annotation("User[\"id\" | \"name\"]"),
            interner.union2(TypeId::NUMBER, TypeId::STRING)
        );
        assert_eq!(
            lowering.lower_annotation("User[\"email\"]"),
            interner.union2(TypeId::STRING, TypeId::UNDEFINED)
        );
        assert!(lowering.diagnostics().is_empty());
    });

    let diag = eval_err(USER, "User[\"age\"]");
    assert_eq!(diag.code, 2339);
    assert_eq!(diag.message_text, "Property 'age' does not exist on type 'User'.");

    let diag = eval_err(USER, "User[boolean]");
    assert_eq!(diag.code, 2538);
}

#[test]
fn test_indexed_access_on_arrays_and_tuples() {
    let source = "type Pair = [string, number];";
    with_lowering(source, |interner, lowering| {
        assert_eq!(lowering.lower_annotation("string[][number]"), TypeId::STRING);
        assert_eq!(lowering.lower_annotation("Pair[0]"), TypeId::STRING);
        assert_eq!(lowering.lower_annotation("Pair[1]"), TypeId::NUMBER);
        assert_eq!(
            lowering.lower_annotation("Pair[number]"),
            interner.union2(TypeId::STRING, TypeId::NUMBER)
        );
        assert!(lowering.diagnostics().is_empty());
    });
    let diag = eval_err(source, "Pair[2]");
    assert_eq!(diag.code, 2339);
}

#[test]
fn test_indexed_access_distributes_over_object_unions() {
    let source = "interface A { kind: \"a\" }\ninterface B { kind: \"b\" }";
    assert_eq!(eval_ok(source, "(A | B)[\"kind\"]"), "\"a\" | \"b\"");
}

// =============================================================================
// Signatures
// =============================================================================

#[test]
fn test_function_types() {
    assert_eq!(
        eval_ok("", "(x: string, y?: number) => void"),
        "(x: string, y?: number) => void"
    );
    assert_eq!(
        eval_ok("", "(...rest: string[]) => number"),
        "(...rest: string[]) => number"
    );
    assert_eq!(
        eval_ok("", "new (name: string) => object"),
        "new (name: string) => object"
    );
}

#[test]
fn test_generic_signature_binds_type_parameters() {
    assert_eq!(
        eval_ok("", "<T extends string>(x: T) => T[]"),
        "<T extends string>(x: T) => T[]"
    );
    // Scopes end with the signature.
    let (_, diagnostics) = eval("", "(f: <T>(x: T) => T) => T");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, 2304);
}

#[test]
fn test_type_parameter_is_not_generic() {
    let (_, diagnostics) = eval("", "<T>(x: T<string>) => void");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, 2315);
    assert_eq!(diagnostics[0].message_text, "Type 'T' is not generic.");
}

#[test]
fn test_predicates_and_this_parameters() {
    assert_eq!(
        eval_ok("", "(x: unknown) => x is string"),
        "(x: unknown) => x is string"
    );
    assert_eq!(
        eval_ok("", "(x: unknown) => asserts x"),
        "(x: unknown) => asserts x"
    );
    with_lowering(USER, |interner, lowering| {
        let method = lowering.lower_annotation("(this: User, label: string) => void");
        let Some(TypeData::Function(shape_id)) = interner.lookup(method) else {
            panic!("expected function");
        };
        let shape = interner.function_shape(shape_id);
        assert_eq!(shape.params.len(), 1);
        assert_eq!(shape.this_type, lowering.resolve_type_name("User"));
    });
}

#[test]
fn test_object_literal_members() {
    with_lowering("", |interner, lowering| {
        let object =
            lowering.lower_annotation("{ readonly id: number; tag?: string; run(): void }");
        let shape_id = object_shape_id(interner, object).expect("object");
        let shape = interner.object_shape(shape_id);
        let id = shape.property(interner.intern_string("id")).expect("id");
        assert!(id.is_readonly() && !id.is_optional());
        let tag = shape.property(interner.intern_string("tag")).expect("tag");
        assert!(tag.is_optional());
        let run = shape.property(interner.intern_string("run")).expect("run");
        assert!(run.is_method());
    });
}

#[test]
fn test_deeply_nested_declaration_is_reported_not_lowered() {
    let interner = TypeInterner::new();
    let source = format!(
        "type Deep = {}number{};\ntype Grid = number{};",
        "(".repeat(20_000),
        ")".repeat(20_000),
        "[]".repeat(50_000)
    );
    let program = Program::from_sources([("deep.ts", source.as_str())]);
    let codes: Vec<u32> = program
        .declaration_diagnostics()
        .iter()
        .map(|d| d.code)
        .collect();
    assert_eq!(codes, vec![90008, 90008]);

    let lowering = program.lowering(&interner);
    assert_eq!(lowering.lower_annotation("Deep"), TypeId::ERROR);
    assert_eq!(lowering.lower_annotation("Grid"), TypeId::ERROR);
    assert!(lowering.take_diagnostics().iter().all(|d| d.code == 90008));
}

#[test]
fn test_chain_of_nested_aliases_stops_at_the_nesting_limit() {
    let interner = TypeInterner::new();
    let source: String = (0..10)
        .map(|i| {
            let next = if i == 9 { "number".to_string() } else { format!("A{}", i + 1) };
            format!("type A{i} = {}{next}{};\n", "(".repeat(100), ")".repeat(100))
        })
        .collect();
    let program = Program::from_sources([("chain.ts", source.as_str())]);
    assert!(program.declaration_diagnostics().is_empty());

    let lowering = program.lowering(&interner);
    assert_eq!(lowering.lower_annotation("A0"), TypeId::ERROR);
    let diagnostics = lowering.take_diagnostics();
    assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
    assert_eq!(diagnostics[0].code, 90008);
    assert_eq!(diagnostics[0].file, "chain.ts");
    // A shorter chain from the middle fits.
    assert_eq!(lowering.lower_annotation("A8"), TypeId::NUMBER);
}

#[test]
fn test_nesting_below_the_limit_lowers() {
    with_lowering("", |interner, lowering| {
        let text = format!("{}number{}", "(".repeat(200), ")".repeat(200));
        assert_eq!(lowering.lower_annotation(&text), TypeId::NUMBER);
        let grid = lowering.lower_annotation(&format!("number{}", "[]".repeat(200)));
        assert!(matches!(interner.lookup(grid), Some(TypeData::Array(_))));
        assert!(lowering.diagnostics().is_empty());
    });
}
