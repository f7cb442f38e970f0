use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

/// CLI arguments for the tyn binary.
#[derive(Parser, Debug)]
#[command(
    name = "tyn",
    version,
    about = "Type narrowing and utility type evaluation over declaration files"
)]
pub struct CliArgs {
    /// Path to a tyn.json config file. Defaults to ./tyn.json when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, ignore_case = true, global = true)]
    pub format: Option<OutputFormat>,

    /// Disable colored text output.
    #[arg(long = "no-color", alias = "noColor", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Evaluate a type annotation against the given declarations.
    Eval {
        /// Declaration files to load.
        files: Vec<PathBuf>,

        /// The annotation to evaluate, e.g. `Pick<User, "id">`.
        #[arg(short = 't', long = "type")]
        type_text: String,
    },

    /// Narrow a declared type by one guard and print both branches.
    Narrow {
        files: Vec<PathBuf>,

        #[arg(short = 't', long = "type")]
        type_text: String,

        /// Guard, e.g. `typeof:string`, `in:swim`, `discriminant:kind=circle`.
        #[arg(short = 'g', long)]
        guard: String,

        /// What is known about an `asserts` guard at the call site.
        #[arg(long, value_enum, default_value_t = Claim::Unverified)]
        claim: Claim,
    },

    /// Check whether a set of handled tags covers a discriminated union.
    Exhaustive {
        files: Vec<PathBuf>,

        #[arg(short = 't', long = "type")]
        type_text: String,

        /// Discriminant property. Inferred from the variants when omitted.
        #[arg(short = 'p', long)]
        property: Option<String>,

        /// Handled tags, comma separated. Bare words are string literals.
        #[arg(long, value_delimiter = ',')]
        handled: Vec<String>,
    },

    /// Parse and lower every declaration, reporting diagnostics.
    Check { files: Vec<PathBuf> },
}

impl Command {
    pub fn files(&self) -> &[PathBuf] {
        match self {
            Command::Eval { files, .. }
            | Command::Narrow { files, .. }
            | Command::Exhaustive { files, .. }
            | Command::Check { files } => files,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Claim {
    Satisfied,
    Violated,
    Unverified,
}

impl From<Claim> for tyn_solver::AssertionClaim {
    fn from(claim: Claim) -> Self {
        match claim {
            Claim::Satisfied => tyn_solver::AssertionClaim::Satisfied,
            Claim::Violated => tyn_solver::AssertionClaim::Violated,
            Claim::Unverified => tyn_solver::AssertionClaim::Unverified,
        }
    }
}
