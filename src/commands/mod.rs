//! Command handlers
//!
//! Each handler resolves paths and configuration from the global flags,
//! runs one use case and prints the result.

pub mod nodes;
pub mod rollout;

use std::path::PathBuf;

use anyhow::{Context, Result};

use swarmform::config::{self, Config, CONFIG_FILE_NAME};
use swarmform::infrastructure::NODES_FILE_NAME;

use crate::cli::Cli;

/// Paths and configuration shared by every command
pub struct Workspace {
    pub workdir: PathBuf,
    pub nodes_path: PathBuf,
    pub config: Config,
}

impl Workspace {
    /// Resolve paths and load the descriptor
    ///
    /// Precedence: CLI flags, then `SWARMFORM_*` variables, then the
    /// descriptor file, then defaults.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let workdir = cli.workdir.clone();
        let (config_path, explicit) = match &cli.config {
            Some(path) => (path.clone(), true),
            None => (workdir.join(CONFIG_FILE_NAME), false),
        };

        let (mut config, warnings) = config::load_or_default(&config_path, explicit)
            .with_context(|| format!("loading {}", config_path.display()))?;
        for warning in &warnings {
            match warning.line {
                Some(line) => tracing::warn!(
                    "unknown key '{}' in {}:{}",
                    warning.key,
                    warning.file.display(),
                    line
                ),
                None => tracing::warn!(
                    "unknown key '{}' in {}",
                    warning.key,
                    warning.file.display()
                ),
            }
        }

        if let Some(sources) = &cli.sources {
            config.orchestrator.sources_dir = sources.clone();
        }
        config.validate()?;

        let nodes_path = cli
            .nodes
            .clone()
            .unwrap_or_else(|| workdir.join(NODES_FILE_NAME));

        Ok(Self {
            workdir,
            nodes_path,
            config,
        })
    }
}
