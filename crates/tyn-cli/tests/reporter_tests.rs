use rustc_hash::FxHashMap;
use tyn_common::Diagnostic;

use crate::driver::{Outcome, Report};
use crate::reporter::Reporter;

const MAIN: &str = "type A = string;\ndeclare const x: Missing;\n";

fn reporter() -> Reporter {
    let mut sources = FxHashMap::default();
    sources.insert("main.ts".to_string(), MAIN.to_string());
    Reporter::new(false, sources)
}

fn missing_name() -> Diagnostic {
    let start = MAIN.find("Missing").expect("name in source") as u32;
    Diagnostic::from_code(2304, &["Missing"]).at("main.ts", start, 7)
}

#[test]
fn diagnostic_with_snippet() {
    let text = reporter().format_diagnostic(&missing_name());
    let expected = [
        "main.ts:2:18 - error TS2304: Cannot find name 'Missing'.",
        "    2   declare const x: Missing;",
        "                         ~~~~~~~",
    ]
    .join("\n");
    assert_eq!(text, expected);
}

#[test]
fn diagnostic_without_source() {
    let diag = Diagnostic::from_code(2322, &["Triangle", "never"]);
    assert_eq!(
        reporter().format_diagnostic(&diag),
        "<type> - error TS2322: Type 'Triangle' is not assignable to type 'never'."
    );

    let diag = Diagnostic::from_code(2304, &["Foo"]).at("<annotation>", 0, 3);
    assert_eq!(
        reporter().format_diagnostic(&diag),
        "<annotation> - error TS2304: Cannot find name 'Foo'."
    );
}

#[test]
fn renders_narrow_outcome() {
    let report = Report {
        outcome: Some(Outcome::Narrow {
            declared: "string | number".into(),
            guard: "typeof x === \"string\"".into(),
            true_type: "string".into(),
            false_type: "number".into(),
        }),
        diagnostics: Vec::new(),
    };
    assert_eq!(
        reporter().render(&report),
        "declared: string | number\nguard: typeof x === \"string\"\ntrue: string\nfalse: number"
    );
}

#[test]
fn renders_exhaustive_outcome_with_error_count() {
    let report = Report {
        outcome: Some(Outcome::Exhaustive {
            union_type: "Shape".into(),
            property: Some("kind".into()),
            exhaustive: false,
            missing: vec!["\"triangle\"".into()],
            residual: "Triangle".into(),
            unknown_cases: Vec::new(),
        }),
        diagnostics: vec![Diagnostic::from_code(2322, &["Triangle", "never"])],
    };
    let text = reporter().render(&report);
    assert!(text.starts_with("union: Shape\ndiscriminant: kind\nexhaustive: no\nmissing: \"triangle\"\nresidual: Triangle\n"));
    assert!(text.ends_with("\n\nFound 1 error."), "{text}");
}

#[test]
fn warnings_do_not_count_as_errors() {
    let report = Report {
        outcome: None,
        diagnostics: vec![Diagnostic::from_code(90006, &["string | number", "string"])],
    };
    let text = reporter().render(&report);
    assert!(text.starts_with("<type> - warning TS90006"), "{text}");
    assert!(!text.contains("Found"));
}

#[test]
fn json_report() {
    let report = Report {
        outcome: Some(Outcome::Check {
            files: 1,
            declarations: 2,
        }),
        diagnostics: vec![missing_name()],
    };
    let json: serde_json::Value =
        serde_json::from_str(&Reporter::render_json(&report).expect("serializes")).expect("valid json");
    assert_eq!(json["command"], "check");
    assert_eq!(json["declarations"], 2);
    assert_eq!(json["diagnostics"][0]["code"], 2304);
    assert_eq!(json["diagnostics"][0]["file"], "main.ts");
}

#[test]
fn colored_output_keeps_the_text() {
    colored::control::set_override(true);
    let mut sources = FxHashMap::default();
    sources.insert("main.ts".to_string(), MAIN.to_string());
    let text = Reporter::new(true, sources).format_diagnostic(&missing_name());
    colored::control::unset_override();
    assert!(text.contains("\u{1b}["));
    assert!(text.contains("Cannot find name 'Missing'."));
}
