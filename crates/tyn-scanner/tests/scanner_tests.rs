use super::*;

fn tokens(text: &str) -> Vec<SyntaxKind> {
    let mut scanner = ScannerState::new(text);
    let mut out = Vec::new();
    loop {
        let token = scanner.scan();
        if token == SyntaxKind::EndOfFileToken {
            break;
        }
        out.push(token);
    }
    out
}

#[test]
fn test_scan_union_annotation() {
    assert_eq!(
        tokens("string | number | null"),
        vec![
            SyntaxKind::StringKeyword,
            SyntaxKind::BarToken,
            SyntaxKind::NumberKeyword,
            SyntaxKind::BarToken,
            SyntaxKind::NullKeyword,
        ]
    );
}

#[test]
fn test_scan_arrow_and_rest() {
    assert_eq!(
        tokens("(...args: string[]) => void"),
        vec![
            SyntaxKind::OpenParenToken,
            SyntaxKind::DotDotDotToken,
            SyntaxKind::Identifier,
            SyntaxKind::ColonToken,
            SyntaxKind::StringKeyword,
            SyntaxKind::OpenBracketToken,
            SyntaxKind::CloseBracketToken,
            SyntaxKind::CloseParenToken,
            SyntaxKind::EqualsGreaterThanToken,
            SyntaxKind::VoidKeyword,
        ]
    );
}

#[test]
fn test_string_literal_value_is_cooked() {
    let mut scanner = ScannerState::new(r#"'circle' "it\'s""#);
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.get_token_value_ref(), "circle");
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.get_token_value_ref(), "it's");
}

#[test]
fn test_numeric_and_bigint_literals() {
    let mut scanner = ScannerState::new("3.5 42n");
    assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
    assert_eq!(scanner.get_token_value_ref(), "3.5");
    assert_eq!(scanner.scan(), SyntaxKind::BigIntLiteral);
    assert_eq!(scanner.get_token_value_ref(), "42");
}

#[test]
fn test_comments_are_skipped_and_line_breaks_tracked() {
    let mut scanner = ScannerState::new("/** doc */ type\n// trailing\nShape");
    assert_eq!(scanner.scan(), SyntaxKind::TypeKeyword);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert!(scanner.has_preceding_line_break());
    assert_eq!(scanner.get_token_value_ref(), "Shape");
}

#[test]
fn test_save_and_restore_state() {
    let mut scanner = ScannerState::new("value is 'a'");
    scanner.scan();
    let snapshot = scanner.save_state();
    assert_eq!(scanner.scan(), SyntaxKind::IsKeyword);
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    scanner.restore_state(snapshot);
    assert_eq!(scanner.get_token(), SyntaxKind::Identifier);
    assert_eq!(scanner.get_token_value_ref(), "value");
    assert_eq!(scanner.scan(), SyntaxKind::IsKeyword);
}

#[test]
fn test_unterminated_string_reports_diagnostic() {
    let mut scanner = ScannerState::new("'open");
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    let diagnostics = scanner.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, 1002);
}

#[test]
fn test_invalid_character_is_unknown_token() {
    let mut scanner = ScannerState::new("#");
    assert_eq!(scanner.scan(), SyntaxKind::Unknown);
    assert_eq!(scanner.take_diagnostics()[0].code, 1127);
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
}

#[test]
fn test_body_operators_and_templates_scan_without_diagnostics() {
    let mut scanner = ScannerState::new("!x * 2 + `a ${b}` / 1");
    let mut kinds = Vec::new();
    loop {
        let token = scanner.scan();
        if token == SyntaxKind::EndOfFileToken {
            break;
        }
        kinds.push(token);
    }
    assert!(scanner.take_diagnostics().is_empty());
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::OperatorToken,
            SyntaxKind::Identifier,
            SyntaxKind::OperatorToken,
            SyntaxKind::NumericLiteral,
            SyntaxKind::OperatorToken,
            SyntaxKind::TemplateLiteral,
            SyntaxKind::OperatorToken,
            SyntaxKind::NumericLiteral,
        ]
    );
}
