//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use qc_core::SuiteConfig;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// A loaded suite and the directory its relative database paths resolve against
pub(crate) struct LoadedSuite {
    pub config: SuiteConfig,
    pub root: PathBuf,
}

/// Load the suite named by `--suite`, or qc.yml from the current directory
pub(crate) fn load_suite(global: &GlobalArgs) -> Result<LoadedSuite> {
    let loaded = match &global.suite {
        Some(path) => {
            let path = Path::new(path);
            let config = SuiteConfig::load(path)
                .with_context(|| format!("Failed to load suite {}", path.display()))?;
            let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
            LoadedSuite { config, root }
        }
        None => {
            let dir = Path::new(".");
            let config = SuiteConfig::load_from_dir(dir).context("Failed to load suite")?;
            LoadedSuite {
                config,
                root: dir.to_path_buf(),
            }
        }
    };

    if global.verbose {
        eprintln!(
            "[verbose] Loaded suite '{}' with {} checks",
            loaded.config.name,
            loaded.config.checks.len()
        );
    }
    Ok(loaded)
}
