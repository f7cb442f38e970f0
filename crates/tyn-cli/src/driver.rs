//! Runs one command over a freshly loaded program and collects a report.

use anyhow::{Context, Result, bail};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, span};
use tyn_common::Diagnostic;
use tyn_common::diagnostics::diagnostic_codes;
use tyn_lowering::{Program, TypeLowering};
use tyn_solver::{
    FlowNarrower, TypeDatabase, TypeFormatter, TypeId, TypeInterner, check_exhaustiveness,
    check_never_assignment, format_type, narrow,
};

use crate::args::{Claim, Command};
use crate::guard_spec::{GuardSpec, literal_annotation};

/// The result of one command, as printed by the reporter.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Outcome {
    #[serde(rename_all = "camelCase")]
    Eval { type_text: String, expanded: String },
    #[serde(rename_all = "camelCase")]
    Narrow {
        declared: String,
        guard: String,
        true_type: String,
        false_type: String,
    },
    #[serde(rename_all = "camelCase")]
    Exhaustive {
        union_type: String,
        property: Option<String>,
        exhaustive: bool,
        missing: Vec<String>,
        residual: String,
        unknown_cases: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Check { files: usize, declarations: usize },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Report {
    #[serde(flatten)]
    pub outcome: Option<Outcome>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Declaration files read from disk, keyed by display name.
#[derive(Debug, Default)]
pub struct LoadedSources {
    pub program: Program,
    pub sources: FxHashMap<String, String>,
}

pub fn load_sources(files: &[PathBuf]) -> Result<LoadedSources> {
    let mut loaded = LoadedSources::default();
    for path in files {
        let name = display_name(path);
        if loaded.sources.contains_key(&name) {
            debug!(file = %name, "skipping file loaded twice");
            continue;
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read declaration file: {}", path.display()))?;
        loaded.program.add_source(&name, &text);
        loaded.sources.insert(name, text);
    }
    Ok(loaded)
}

fn display_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Run `command` with `prelude` files loaded before its own.
pub fn run(command: &Command, prelude: &[PathBuf]) -> Result<(Report, LoadedSources)> {
    let files: Vec<PathBuf> = prelude.iter().chain(command.files()).cloned().collect();
    if files.is_empty() && matches!(command, Command::Check { .. }) {
        bail!("no input files");
    }
    let _span = span!(Level::DEBUG, "run", files = files.len()).entered();

    let loaded = load_sources(&files)?;
    let interner = TypeInterner::new();
    let report = execute(command, &loaded.program, &interner)?;
    Ok((report, loaded))
}

/// Run `command` over an already loaded program.
pub fn execute(command: &Command, program: &Program, db: &dyn TypeDatabase) -> Result<Report> {
    if let Command::Check { .. } = command {
        let diagnostics = program.check(db);
        let declarations =
            program.environment().type_names().count() + program.environment().value_names().count();
        return Ok(Report {
            outcome: Some(Outcome::Check {
                files: program.source_files().len(),
                declarations,
            }),
            diagnostics,
        });
    }

    let lowering = program.lowering(db);
    let mut command_diagnostics = Vec::new();
    let outcome = match command {
        Command::Eval { type_text, .. } => Some(eval(&lowering, type_text)),
        Command::Narrow {
            type_text,
            guard,
            claim,
            ..
        } => {
            let spec: GuardSpec = guard
                .parse()
                .with_context(|| format!("invalid guard: {guard}"))?;
            Some(narrow_command(
                &lowering,
                type_text,
                &spec,
                *claim,
                &mut command_diagnostics,
            )?)
        }
        Command::Exhaustive {
            type_text,
            property,
            handled,
            ..
        } => exhaustive(
            &lowering,
            type_text,
            property.as_deref(),
            handled,
            &mut command_diagnostics,
        ),
        Command::Check { .. } => None,
    };

    let mut diagnostics = program.declaration_diagnostics();
    diagnostics.extend(lowering.take_diagnostics());
    diagnostics.extend(command_diagnostics);
    Ok(Report {
        outcome,
        diagnostics,
    })
}

fn eval(lowering: &TypeLowering<'_>, type_text: &str) -> Outcome {
    let db = lowering.db();
    let type_id = lowering.lower_annotation(type_text);
    Outcome::Eval {
        type_text: format_type(db, type_id),
        expanded: TypeFormatter::new(db).expand_named(true).format(type_id),
    }
}

fn narrow_command(
    lowering: &TypeLowering<'_>,
    type_text: &str,
    spec: &GuardSpec,
    claim: Claim,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Outcome> {
    let db = lowering.db();
    let declared = lowering.lower_annotation(type_text);
    let guard = spec.resolve(lowering)?;

    let (true_type, false_type) = if spec.is_assertion() {
        let mut flow = FlowNarrower::new(db, declared);
        match flow.assert(&guard, claim.into()) {
            Ok(outcome) => {
                diagnostics.extend(outcome.warning);
                (outcome.narrowed, TypeId::NEVER)
            }
            Err(err) => {
                diagnostics.push(err.to_diagnostic());
                (TypeId::NEVER, TypeId::NEVER)
            }
        }
    } else {
        let result = narrow(db, declared, &guard);
        (result.true_type, result.false_type)
    };

    Ok(Outcome::Narrow {
        declared: format_type(db, declared),
        guard: spec.to_string(),
        true_type: format_type(db, true_type),
        false_type: format_type(db, false_type),
    })
}

fn exhaustive(
    lowering: &TypeLowering<'_>,
    type_text: &str,
    property: Option<&str>,
    handled: &[String],
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Outcome> {
    let db = lowering.db();
    let union_type = lowering.lower_annotation(type_text);
    if union_type == TypeId::ERROR {
        return None;
    }
    let union = match lowering.discriminated_union(union_type, property) {
        Ok(union) => union,
        Err(err) => {
            diagnostics.push(err.to_diagnostic());
            return None;
        }
    };

    let handled: Vec<TypeId> = handled
        .iter()
        .map(|tag| lowering.lower_annotation(&literal_annotation(tag)))
        .collect();
    let result = check_exhaustiveness(db, &union, &handled);

    if !result.unknown_cases.is_empty() {
        let tags = format_type(db, db.union(union.tags().collect()));
        for &unknown in &result.unknown_cases {
            diagnostics.push(Diagnostic::from_code(
                diagnostic_codes::NOT_COMPARABLE,
                &[format_type(db, unknown).as_str(), tags.as_str()],
            ));
        }
    }
    diagnostics.extend(check_never_assignment(db, result.residual));

    let text = |ids: &[TypeId]| -> Vec<String> {
        ids.iter().map(|&id| format_type(db, id)).collect()
    };
    Some(Outcome::Exhaustive {
        union_type: format_type(db, union_type),
        property: union.property.map(|atom| db.resolve_atom(atom)),
        exhaustive: result.exhaustive,
        missing: text(&result.missing),
        residual: format_type(db, result.residual),
        unknown_cases: text(&result.unknown_cases),
    })
}
