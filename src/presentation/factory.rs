//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::{RolloutOptions, RolloutUseCase, StagingSettings};
use crate::config::Config;
use crate::domain::value_objects::{RemotePath, ServiceFlag};
use crate::infrastructure::{PlaceholderRenderer, ScpTransfer, SshShell, YamlTopologyRepository};

/// Type alias for the concrete RolloutUseCase with all dependencies
pub type ConcreteRolloutUseCase =
    RolloutUseCase<SshShell, ScpTransfer, PlaceholderRenderer, YamlTopologyRepository>;

/// Create a rollout use case talking to nodes through ssh and scp
pub fn create_rollout_use_case(config: &Config) -> ConcreteRolloutUseCase {
    let shell = Arc::new(SshShell::new(config.ssh.clone()));
    let transfer = ScpTransfer::new(config.ssh.clone());

    RolloutUseCase::new(
        shell,
        transfer,
        PlaceholderRenderer::new(),
        YamlTopologyRepository::new(),
    )
}

/// Rollout options from the loaded configuration
///
/// A relative `sources_dir` is resolved against `workdir`.
pub fn rollout_options(
    config: &Config,
    kind: ServiceFlag,
    workdir: &Path,
    nodes_path: PathBuf,
    dry_run: bool,
) -> RolloutOptions {
    let orchestrator = &config.orchestrator;
    RolloutOptions {
        kind,
        nodes_path,
        staging: StagingSettings {
            sources_dir: workdir.join(&orchestrator.sources_dir),
            remote_root: RemotePath::new(orchestrator.remote_root.clone()),
            owner: orchestrator.file_owner.clone(),
            mode: orchestrator.file_mode.clone(),
        },
        probe_interval: orchestrator.probe_interval(),
        htpasswd_cost: orchestrator.htpasswd_cost,
        dry_run,
    }
}
