use super::*;
use tyn_solver::TypeInterner;

#[test]
fn test_clean_program_has_no_diagnostics() {
    let interner = TypeInterner::new();
    let program = Program::from_sources([
        ("shapes.ts", "interface Circle { kind: \"circle\"; radius: number }\ntype Shape = Circle;"),
        ("api.ts", "declare function area(shape: Shape): number;"),
    ]);
    assert_eq!(program.source_files().len(), 2);
    assert!(program.check(&interner).is_empty());
}

#[test]
fn test_check_orders_syntax_then_declaration_then_lowering_errors() {
    let interner = TypeInterner::new();
    let program = Program::from_sources([
        ("a.ts", "type A = Missing;\ninterface A { x: number }"),
        ("b.ts", "type B = ;"),
    ]);
    let codes: Vec<u32> = program.check(&interner).iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![1110, 2300, 2304]);
}

#[test]
fn test_declarations_after_a_syntax_error_are_still_registered() {
    let interner = TypeInterner::new();
    let program = Program::from_sources([(
        "broken.ts",
        "let x = 1;\ninterface Ok { value: string }",
    )]);
    assert!(program.environment().type_decl("Ok").is_some());
    let diagnostics = program.check(&interner);
    assert!(diagnostics.iter().all(|d| d.code == 1128));
}

#[test]
fn test_lowering_shares_the_program_environment() {
    let interner = TypeInterner::new();
    let mut program = Program::new();
    program.add_source("user.ts", "interface User { id: number }");
    program.add_source("alias.ts", "type Id = User[\"id\"];");
    let lowering = program.lowering(&interner);
    assert_eq!(lowering.lower_annotation("Id"), tyn_solver::TypeId::NUMBER);
    assert!(!lowering.has_errors());
    assert!(!lowering.limit_exceeded());
}
