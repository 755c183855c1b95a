//! Output Rendering
//!
//! Plain-text views of the topology and of rollout results. Logs go to
//! stderr through tracing; these go to stdout.

use crate::application::RolloutResult;
use crate::domain::entities::{bootstrap_expect, topology, Node};

/// Table of nodes with role and deployed stacks
pub fn render_nodes(nodes: &[Node]) -> String {
    let name_width = nodes
        .iter()
        .map(|n| n.name.len())
        .chain(std::iter::once("NAME".len()))
        .max()
        .unwrap_or(4);
    let host_width = nodes
        .iter()
        .map(|n| n.host.len())
        .chain(std::iter::once("HOST".len()))
        .max()
        .unwrap_or(4);

    let mut lines = vec![format!(
        "{:<nw$}  {:<hw$}  {:<7}  STACKS",
        "NAME",
        "HOST",
        "ROLE",
        nw = name_width,
        hw = host_width
    )];
    for node in nodes {
        let stacks = if node.service_flags.is_empty() {
            "-".to_string()
        } else {
            node.service_flags
                .iter()
                .map(|f| f.to_string())
                .collect::<Vec<_>>()
                .join(",")
        };
        lines.push(format!(
            "{:<nw$}  {:<hw$}  {:<7}  {}",
            node.name,
            node.host,
            node.role.to_string(),
            stacks,
            nw = name_width,
            hw = host_width
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "{} nodes, {} quorum members, consul bootstrap-expect {}",
        nodes.len(),
        topology::quorum_members(nodes),
        bootstrap_expect(nodes)
    ));
    lines.join("\n")
}

/// Summary printed after a rollout
pub fn render_rollout(result: &RolloutResult) -> String {
    if result.dry_run {
        return format!(
            "{}\n\nDry run: nothing was deployed (leader: {}).",
            result.plan.describe(),
            result.leader
        );
    }

    let mut lines = Vec::new();
    for stage in &result.stages {
        let mut detail = Vec::new();
        if stage.files_staged > 0 {
            detail.push(format!("{} files", stage.files_staged));
        }
        if stage.nodes_run > 1 {
            detail.push(format!("{} nodes", stage.nodes_run));
        }
        if stage.readiness.is_some() {
            detail.push("ready".to_string());
        }
        if detail.is_empty() {
            lines.push(format!("✓ {}", stage.name));
        } else {
            lines.push(format!("✓ {} ({})", stage.name, detail.join(", ")));
        }
    }
    lines.push(format!(
        "{} deployed from {}; {} files staged.",
        result.plan.kind,
        result.leader,
        result.files_staged()
    ));
    lines.join("\n")
}
