//! `tyn.json`: declaration files loaded before every command, and report
//! defaults.
//!
//! ```json
//! { "prelude": ["lib/shapes.ts"], "format": "json", "color": false }
//! ```

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::args::{CliArgs, OutputFormat};

pub const CONFIG_FILE_NAME: &str = "tyn.json";

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TynConfig {
    /// Declaration files, relative to the config file.
    #[serde(default)]
    pub prelude: Vec<PathBuf>,
    #[serde(default)]
    pub format: Option<OutputFormat>,
    #[serde(default)]
    pub color: Option<bool>,
}

pub fn parse_config(source: &str) -> Result<TynConfig> {
    let config = serde_json::from_str(source).context("failed to parse tyn.json")?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<TynConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let mut config =
        parse_config(&source).with_context(|| format!("failed to parse config: {}", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    for prelude in &mut config.prelude {
        if prelude.is_relative() {
            *prelude = base.join(&*prelude);
        }
    }
    Ok(config)
}

/// The explicit `--config`, or `tyn.json` in `cwd` when it exists.
pub fn find_config(args: &CliArgs, cwd: &Path) -> Result<Option<PathBuf>> {
    if let Some(path) = &args.config {
        let path = if path.is_relative() {
            cwd.join(path)
        } else {
            path.clone()
        };
        if !path.is_file() {
            bail!("config file not found: {}", path.display());
        }
        return Ok(Some(path));
    }
    let candidate = cwd.join(CONFIG_FILE_NAME);
    Ok(candidate.is_file().then_some(candidate))
}

/// Settings after applying command-line flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub prelude: Vec<PathBuf>,
    pub format: OutputFormat,
    pub color: bool,
}

/// `terminal` is whether stdout is a terminal; color defaults to it.
pub fn resolve_options(args: &CliArgs, config: Option<&TynConfig>, terminal: bool) -> ResolvedOptions {
    let prelude = config.map(|c| c.prelude.clone()).unwrap_or_default();
    let format = args
        .format
        .or_else(|| config.and_then(|c| c.format))
        .unwrap_or(OutputFormat::Text);
    let color = if args.no_color {
        false
    } else {
        config.and_then(|c| c.color).unwrap_or(terminal)
    };
    ResolvedOptions {
        prelude,
        format,
        color: color && format == OutputFormat::Text,
    }
}
