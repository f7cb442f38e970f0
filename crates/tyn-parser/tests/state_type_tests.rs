//! Tests for type annotation parsing.
use crate::ast::*;
use crate::parser::parse_type_annotation;

fn parse_ok(text: &str) -> TypeNode {
    let result = parse_type_annotation(text);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics for {text:?}: {:?}",
        result.diagnostics
    );
    result.value
}

fn reference_name(node: &TypeNode) -> &str {
    match &node.kind {
        TypeNodeKind::Reference { name, .. } => &name.text,
        other => panic!("expected reference, got {other:?}"),
    }
}

#[test]
fn parse_union_of_keywords_and_literals() {
    let node = parse_ok("string | 42 | \"circle\" | null");
    let TypeNodeKind::Union(members) = &node.kind else {
        panic!("expected union, got {:?}", node.kind);
    };
    assert_eq!(members.len(), 4);
    assert_eq!(members[0].kind, TypeNodeKind::Keyword(KeywordType::String));
    assert_eq!(
        members[1].kind,
        TypeNodeKind::Literal(LiteralNode::Number(42.0))
    );
    assert_eq!(
        members[2].kind,
        TypeNodeKind::Literal(LiteralNode::String("circle".to_string()))
    );
    assert_eq!(members[3].kind, TypeNodeKind::Keyword(KeywordType::Null));
}

#[test]
fn parse_leading_bar_union() {
    let node = parse_ok("| 'a' | 'b'");
    let TypeNodeKind::Union(members) = &node.kind else {
        panic!("expected union");
    };
    assert_eq!(members.len(), 2);
}

#[test]
fn parse_intersection_binds_tighter_than_union() {
    let node = parse_ok("A & B | C");
    let TypeNodeKind::Union(members) = &node.kind else {
        panic!("expected union");
    };
    assert!(matches!(members[0].kind, TypeNodeKind::Intersection(ref parts) if parts.len() == 2));
    assert_eq!(reference_name(&members[1]), "C");
}

#[test]
fn parse_negative_number_and_bigint_literals() {
    let node = parse_ok("-1 | 10n");
    let TypeNodeKind::Union(members) = &node.kind else {
        panic!("expected union");
    };
    assert_eq!(
        members[0].kind,
        TypeNodeKind::Literal(LiteralNode::Number(-1.0))
    );
    assert_eq!(
        members[1].kind,
        TypeNodeKind::Literal(LiteralNode::BigInt("10".to_string()))
    );
}

#[test]
fn parse_array_and_readonly_array() {
    let node = parse_ok("readonly string[][]");
    let TypeNodeKind::ReadonlyOperator(inner) = &node.kind else {
        panic!("expected readonly operator, got {:?}", node.kind);
    };
    let TypeNodeKind::Array(element) = &inner.kind else {
        panic!("expected array");
    };
    assert!(matches!(element.kind, TypeNodeKind::Array(_)));
}

#[test]
fn parse_reference_with_type_arguments() {
    let node = parse_ok("Pick<User, \"id\" | \"name\">");
    let TypeNodeKind::Reference { name, type_args } = &node.kind else {
        panic!("expected reference");
    };
    assert_eq!(name.text, "Pick");
    assert_eq!(type_args.len(), 2);
    assert!(matches!(type_args[1].kind, TypeNodeKind::Union(_)));
}

#[test]
fn parse_nested_type_arguments() {
    let node = parse_ok("Awaited<Promise<Promise<number>>>");
    let TypeNodeKind::Reference { type_args, .. } = &node.kind else {
        panic!("expected reference");
    };
    assert_eq!(reference_name(&type_args[0]), "Promise");
}

#[test]
fn parse_typeof_query() {
    let node = parse_ok("ReturnType<typeof createUser>");
    let TypeNodeKind::Reference { type_args, .. } = &node.kind else {
        panic!("expected reference");
    };
    let TypeNodeKind::TypeQuery(name) = &type_args[0].kind else {
        panic!("expected typeof query");
    };
    assert_eq!(name.text, "createUser");
}

#[test]
fn parse_parenthesized_type_is_not_a_function() {
    let node = parse_ok("(string | number)[]");
    let TypeNodeKind::Array(element) = &node.kind else {
        panic!("expected array");
    };
    assert!(matches!(element.kind, TypeNodeKind::Parenthesized(_)));
}

#[test]
fn parse_function_type_with_this_and_optional_params() {
    let node = parse_ok("(this: Window, name: string, age?: number) => void");
    let TypeNodeKind::Function(signature) = &node.kind else {
        panic!("expected function type");
    };
    assert!(!signature.is_constructor);
    assert_eq!(signature.params.len(), 3);
    assert!(signature.params[0].is_this());
    assert!(signature.params[2].optional);
    assert_eq!(
        signature.return_type.kind,
        TypeNodeKind::Keyword(KeywordType::Void)
    );
}

#[test]
fn parse_empty_and_rest_parameter_function_types() {
    let node = parse_ok("() => string");
    assert!(matches!(node.kind, TypeNodeKind::Function(_)));

    let node = parse_ok("(...args: number[]) => void");
    let TypeNodeKind::Function(signature) = &node.kind else {
        panic!("expected function type");
    };
    assert!(signature.params[0].rest);
}

#[test]
fn parse_untyped_single_parameter_function_type() {
    let node = parse_ok("(x) => x is string");
    let TypeNodeKind::Function(signature) = &node.kind else {
        panic!("expected function type");
    };
    assert!(signature.params[0].type_node.is_none());
    assert!(matches!(
        signature.return_type.kind,
        TypeNodeKind::Predicate { asserts: false, .. }
    ));
}

#[test]
fn parse_constructor_type() {
    let node = parse_ok("new (name: string) => Person");
    let TypeNodeKind::Function(signature) = &node.kind else {
        panic!("expected constructor type");
    };
    assert!(signature.is_constructor);
    assert_eq!(reference_name(&signature.return_type), "Person");
}

#[test]
fn parse_generic_function_type() {
    let node = parse_ok("<T extends string>(values: T[], initial?: NoInfer<T>) => T");
    let TypeNodeKind::Function(signature) = &node.kind else {
        panic!("expected function type");
    };
    assert_eq!(signature.type_params.len(), 1);
    assert_eq!(signature.type_params[0].name.text, "T");
    assert!(signature.type_params[0].constraint.is_some());
}

#[test]
fn parse_object_type_members() {
    let node = parse_ok("{ readonly id: number; name?: string, greet(msg: string): void }");
    let TypeNodeKind::Object(members) = &node.kind else {
        panic!("expected object type");
    };
    assert_eq!(members.len(), 3);
    match &members[0] {
        MemberNode::Property {
            name,
            readonly,
            optional,
            ..
        } => {
            assert_eq!(name.text, "id");
            assert!(*readonly);
            assert!(!*optional);
        }
        other => panic!("expected property, got {other:?}"),
    }
    assert!(matches!(&members[1], MemberNode::Property { optional: true, .. }));
    assert!(matches!(&members[2], MemberNode::Method { .. }));
}

#[test]
fn parse_keyword_named_properties() {
    let node = parse_ok("{ type: \"a\"; readonly: boolean; \"quoted key\": number }");
    let TypeNodeKind::Object(members) = &node.kind else {
        panic!("expected object type");
    };
    let names: Vec<&str> = members.iter().map(|m| m.name().text.as_str()).collect();
    assert_eq!(names, vec!["type", "readonly", "quoted key"]);
    assert!(matches!(&members[1], MemberNode::Property { readonly: false, .. }));
}

#[test]
fn parse_named_tuple_elements() {
    let node = parse_ok("[name: string, age?: number, ...rest: boolean[]]");
    let TypeNodeKind::Tuple(elements) = &node.kind else {
        panic!("expected tuple");
    };
    assert_eq!(elements.len(), 3);
    assert_eq!(
        elements[0].name.as_ref().map(|n| n.text.as_str()),
        Some("name")
    );
    assert!(elements[1].optional);
    assert!(elements[2].rest);
}

#[test]
fn parse_anonymous_tuple_elements() {
    let node = parse_ok("[string, number?]");
    let TypeNodeKind::Tuple(elements) = &node.kind else {
        panic!("expected tuple");
    };
    assert!(elements[0].name.is_none());
    assert!(elements[1].optional);
}

#[test]
fn parse_indexed_access() {
    let node = parse_ok("User[\"id\"]");
    assert!(matches!(node.kind, TypeNodeKind::IndexedAccess { .. }));
}

#[test]
fn parse_missing_type_reports_type_expected() {
    let result = parse_type_annotation("string | ");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code, 1110);
}

#[test]
fn parse_trailing_tokens_report_semicolon_expected() {
    let result = parse_type_annotation("string number");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code, 1005);
    assert_eq!(result.diagnostics[0].start, 7);
}

#[test]
fn parse_unclosed_type_arguments_report_expected() {
    let result = parse_type_annotation("Array<string");
    assert!(result.has_errors());
    assert!(
        result
            .diagnostics
            .iter()
            .any(|d| d.code == 1005 && d.message_text.contains('>'))
    );
}

fn nested_parens(depth: usize) -> String {
    format!("{}string{}", "(".repeat(depth), ")".repeat(depth))
}

#[test]
fn parse_moderately_nested_parens() {
    let mut node = parse_ok(&nested_parens(100));
    let mut levels = 0;
    while let TypeNodeKind::Parenthesized(inner) = node.kind {
        node = *inner;
        levels += 1;
    }
    assert_eq!(levels, 100);
    assert!(matches!(node.kind, TypeNodeKind::Keyword(KeywordType::String)));
}

#[test]
fn parse_deeply_nested_parens_reports_nesting_once() {
    let result = parse_type_annotation(&nested_parens(2000));
    assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
    assert_eq!(result.diagnostics[0].code, 90008);
}

#[test]
fn parse_long_array_suffix_chain_reports_nesting() {
    let text = format!("number{}", "[]".repeat(50_000));
    let result = parse_type_annotation(&text);
    assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
    assert_eq!(result.diagnostics[0].code, 90008);
    assert!(matches!(result.value.kind, TypeNodeKind::Error));
}

#[test]
fn parse_long_readonly_chain_reports_nesting() {
    let text = format!("{}string[]", "readonly ".repeat(5_000));
    let result = parse_type_annotation(&text);
    assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
    assert_eq!(result.diagnostics[0].code, 90008);
}
