//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// dbqc - Row count, comparison, and foreign key checks for databases
#[derive(Parser, Debug)]
#[command(name = "qc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suite file (default: qc.yml or qc.yaml in the current directory)
    #[arg(short, long, global = true)]
    pub suite: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the suite's checks
    Run(RunArgs),

    /// Load and validate the suite without connecting to any database
    Validate,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Override the primary database path
    #[arg(long)]
    pub primary: Option<String>,

    /// Override the secondary database path
    #[arg(long)]
    pub secondary: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Stop on first failure
    #[arg(long)]
    pub fail_fast: bool,
}

/// Run output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines
    Text,
    /// Test Anything Protocol
    Tap,
    /// Single JSON document
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
