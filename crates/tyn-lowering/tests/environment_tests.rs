use crate::environment::*;
use tyn_parser::parse_source_file;

fn environment(sources: &[(&str, &str)]) -> DeclarationEnvironment {
    let mut env = DeclarationEnvironment::new();
    for (file_name, text) in sources {
        let parsed = parse_source_file(file_name, text);
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        env.add_source_file(&parsed.value);
    }
    env
}

#[test]
fn test_names_keep_declaration_order() {
    let env = environment(&[
        ("shapes.ts", "type Shape = Circle | Square;\ninterface Circle { r: number }\ninterface Square { s: number }"),
        ("api.ts", "declare function area(shape: Shape): number;\ndeclare const unit: Square;"),
    ]);
    let types: Vec<&str> = env.type_names().collect();
    assert_eq!(types, vec!["Shape", "Circle", "Square"]);
    let values: Vec<&str> = env.value_names().collect();
    assert_eq!(values, vec!["area", "unit"]);
    assert!(env.diagnostics().is_empty());
}

#[test]
fn test_declarations_remember_their_file() {
    let env = environment(&[("a.ts", "type A = string;"), ("b.ts", "type B = number;")]);
    assert_eq!(env.type_decl("A").map(|d| d.file.as_str()), Some("a.ts"));
    assert_eq!(env.type_decl("B").map(|d| d.file.as_str()), Some("b.ts"));
    assert!(env.type_decl("C").is_none());
}

#[test]
fn test_class_declares_type_and_value() {
    let env = environment(&[("dog.ts", "class Dog { name: string; }")]);
    assert!(matches!(
        env.type_decl("Dog").map(|d| &d.decl),
        Some(TypeDeclaration::Class(_))
    ));
    assert!(matches!(
        env.value_decl("Dog").map(|d| &d.decl),
        Some(ValueDeclaration::Class(name)) if name.text == "Dog"
    ));
}

#[test]
fn test_types_and_values_are_separate_namespaces() {
    let env = environment(&[(
        "mixed.ts",
        "interface Config { debug: boolean }\ndeclare const Config: Config;",
    )]);
    assert!(env.type_decl("Config").is_some());
    assert!(env.value_decl("Config").is_some());
    assert!(env.diagnostics().is_empty());
}

#[test]
fn test_duplicate_type_reports_second_declaration() {
    let source = "interface A { x: number }\ninterface A { y: string }";
    let env = environment(&[("dup.ts", source)]);
    let diags = env.diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, 2300);
    assert_eq!(diags[0].message_text, "Duplicate identifier 'A'.");
    assert_eq!(diags[0].file, "dup.ts");
    assert_eq!(diags[0].start as usize, source.rfind('A').unwrap());
    assert_eq!(diags[0].length, 1);

    // The first declaration wins.
    let Some(TypeDeclaration::Interface(first)) = env.type_decl("A").map(|d| &d.decl) else {
        panic!("expected interface");
    };
    assert_eq!(first.members[0].name().text, "x");
}

#[test]
fn test_duplicate_across_files() {
    let env = environment(&[
        ("a.ts", "declare function f(): void;"),
        ("b.ts", "declare const f: number;"),
    ]);
    let diags = env.diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].file, "b.ts");
    assert!(matches!(
        env.value_decl("f").map(|d| &d.decl),
        Some(ValueDeclaration::Function(_))
    ));
}
