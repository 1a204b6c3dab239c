//! Validate command implementation

use anyhow::Result;

use crate::cli::GlobalArgs;
use crate::commands::common::load_suite;

/// Execute the validate command
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let suite = load_suite(global)?;
    let config = &suite.config;

    for (index, check) in config.checks.iter().enumerate() {
        println!("  {} [{}]", check.label(index), check.kind());
    }

    if config.needs_secondary() && config.databases.secondary.is_none() {
        println!(
            "\nWarning: comparative checks need a secondary database; set databases.secondary or pass --secondary to qc run"
        );
    }

    println!(
        "\nSuite '{}' is valid ({} checks)",
        config.name,
        config.checks.len()
    );
    Ok(())
}
