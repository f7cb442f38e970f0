use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use tyn_cli::args::{CliArgs, OutputFormat};
use tyn_cli::config::{find_config, load_config, resolve_options};
use tyn_cli::driver;
use tyn_cli::reporter::Reporter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_DIAGNOSTICS_REPORTED: i32 = 1;

fn main() -> Result<()> {
    // Only installs a subscriber when TYN_LOG or RUST_LOG is set.
    tyn_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;

    let config = find_config(&args, &cwd)?
        .map(|path| load_config(&path))
        .transpose()?;
    let options = resolve_options(&args, config.as_ref(), std::io::stdout().is_terminal());

    let (report, loaded) = driver::run(&args.command, &options.prelude)?;
    let output = match options.format {
        OutputFormat::Json => Reporter::render_json(&report)?,
        OutputFormat::Text => Reporter::new(options.color, loaded.sources).render(&report),
    };
    if !output.is_empty() {
        println!("{output}");
    }

    let status = if report.has_errors() {
        EXIT_DIAGNOSTICS_REPORTED
    } else {
        EXIT_SUCCESS
    };
    std::process::exit(status);
}
