use anyhow::Result;

use swarmform::domain::value_objects::ServiceFlag;
use swarmform::presentation::output::render_rollout;
use swarmform::presentation::{create_rollout_use_case, rollout_options, TerminalSecrets};

use super::Workspace;

pub fn cmd_rollout(workspace: &Workspace, kind: ServiceFlag, dry_run: bool) -> Result<()> {
    let config = &workspace.config;
    let options = rollout_options(
        config,
        kind,
        &workspace.workdir,
        workspace.nodes_path.clone(),
        dry_run,
    );

    tracing::info!(
        rollout = %kind,
        nodes = %options.nodes_path.display(),
        sources = %options.staging.sources_dir.display(),
        dry_run,
        "starting rollout"
    );

    let use_case = create_rollout_use_case(config);
    let result = use_case.execute(&options, &config.cluster, &TerminalSecrets::new())?;

    println!("{}", render_rollout(&result));
    Ok(())
}
