use anyhow::{Context, Result};
use colored::Colorize;
use rustc_hash::FxHashMap;
use tyn_common::{Diagnostic, DiagnosticCategory};

use crate::driver::{Outcome, Report};

pub struct Reporter {
    color: bool,
    sources: FxHashMap<String, String>,
}

impl Reporter {
    pub fn new(color: bool, sources: FxHashMap<String, String>) -> Self {
        Reporter { color, sources }
    }

    pub fn render_json(report: &Report) -> Result<String> {
        serde_json::to_string_pretty(report).context("failed to serialize report")
    }

    pub fn render(&self, report: &Report) -> String {
        let mut out = String::new();
        if let Some(outcome) = &report.outcome {
            out.push_str(&self.format_outcome(outcome));
        }
        for diagnostic in &report.diagnostics {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        let errors = report.diagnostics.iter().filter(|d| d.is_error()).count();
        if errors > 0 {
            let noun = if errors == 1 { "error" } else { "errors" };
            out.push_str(&format!("\n\nFound {errors} {noun}."));
        }
        out
    }

    fn format_outcome(&self, outcome: &Outcome) -> String {
        let mut lines = Vec::new();
        match outcome {
            Outcome::Eval {
                type_text,
                expanded,
            } => {
                lines.push(self.field("type", type_text));
                if expanded != type_text {
                    lines.push(self.field("expanded", expanded));
                }
            }
            Outcome::Narrow {
                declared,
                guard,
                true_type,
                false_type,
            } => {
                lines.push(self.field("declared", declared));
                lines.push(self.field("guard", guard));
                lines.push(self.field("true", true_type));
                lines.push(self.field("false", false_type));
            }
            Outcome::Exhaustive {
                union_type,
                property,
                exhaustive,
                missing,
                residual,
                unknown_cases,
            } => {
                lines.push(self.field("union", union_type));
                if let Some(property) = property {
                    lines.push(self.field("discriminant", property));
                }
                let verdict = if *exhaustive { "yes" } else { "no" };
                lines.push(self.field("exhaustive", verdict));
                if !missing.is_empty() {
                    lines.push(self.field("missing", &missing.join(", ")));
                }
                lines.push(self.field("residual", residual));
                if !unknown_cases.is_empty() {
                    lines.push(self.field("unknown cases", &unknown_cases.join(", ")));
                }
            }
            Outcome::Check {
                files,
                declarations,
            } => {
                lines.push(format!("Checked {declarations} declarations in {files} files."));
            }
        }
        lines.join("\n")
    }

    fn field(&self, label: &str, value: &str) -> String {
        let label = format!("{label}:");
        if self.color {
            format!("{} {}", label.bold(), value)
        } else {
            format!("{label} {value}")
        }
    }

    /// `file:line:col - error TS2304: message`, followed by the source line
    /// when the file is known.
    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut output = match self.position_for(&diagnostic.file, diagnostic.start) {
            Some((line, column)) => format!("{}:{}:{}", diagnostic.file, line, column),
            None if !diagnostic.file.is_empty() => diagnostic.file.clone(),
            None => "<type>".to_string(),
        };

        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        if diagnostic.code != 0 {
            output.push(' ');
            output.push_str(&self.format_code(diagnostic.code));
        }
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        if let Some(snippet) =
            self.format_snippet(&diagnostic.file, diagnostic.start, diagnostic.length)
        {
            output.push_str(&snippet);
        }
        output
    }

    fn format_snippet(&self, file: &str, start: u32, length: u32) -> Option<String> {
        if length == 0 {
            return None;
        }
        let (line_num, column) = self.position_for(file, start)?;
        let line_text = self.sources.get(file)?.lines().nth((line_num - 1) as usize)?;

        let mut underline = String::new();
        let first = column - 1;
        for (i, ch) in line_text.chars().enumerate() {
            let i = i as u32;
            let width = if ch == '\t' { 4 } else { 1 };
            if i < first {
                underline.push_str(&" ".repeat(width));
            } else if i < first + length {
                underline.push_str(&"~".repeat(width));
            } else {
                break;
            }
        }
        if !underline.contains('~') {
            underline.push('~');
        }
        let underline = if self.color {
            underline.red().to_string()
        } else {
            underline
        };
        Some(format!("\n  {line_num:>3}   {line_text}\n        {underline}"))
    }

    /// One-based line and column of a byte offset.
    fn position_for(&self, file: &str, offset: u32) -> Option<(u32, u32)> {
        let source = self.sources.get(file)?;
        let offset = (offset as usize).min(source.len());
        let before = source.get(..offset)?;
        let line = before.matches('\n').count() as u32 + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() as u32 + 1;
        Some((line, column))
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = category.as_str();
        if !self.color {
            return label.to_string();
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion => label.blue().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        let label = format!("TS{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}
