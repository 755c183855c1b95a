use anyhow::Result;

use swarmform::domain::entities::topology;
use swarmform::domain::ports::TopologyRepository;
use swarmform::infrastructure::YamlTopologyRepository;
use swarmform::presentation::output::render_nodes;

use super::Workspace;

pub fn cmd_nodes(workspace: &Workspace) -> Result<()> {
    let nodes = YamlTopologyRepository::new().load(&workspace.nodes_path)?;
    topology::validate(&nodes)?;

    println!("{}", render_nodes(&nodes));
    Ok(())
}
