//! Topology rules
//!
//! Pure functions over the node list: leader lookup, structural
//! validation and quorum sizing for the configuration store.

use std::collections::HashSet;

use crate::domain::entities::Node;
use crate::error::{SwarmformError, SwarmformResult};

/// Bootstrap-expect used once the cluster has enough voting members
pub const FULL_QUORUM: u8 = 3;

/// Bootstrap-expect used on small clusters
pub const SINGLE_NODE_QUORUM: u8 = 1;

/// Return the single leader of `nodes`
pub fn leader_of(nodes: &[Node]) -> SwarmformResult<&Node> {
    let mut leaders = nodes.iter().filter(|n| n.is_leader());
    match (leaders.next(), leaders.next()) {
        (Some(leader), None) => Ok(leader),
        (None, _) => Err(SwarmformError::InvariantViolation(
            "no node has role 'leader'".to_string(),
        )),
        (Some(first), Some(second)) => Err(SwarmformError::InvariantViolation(format!(
            "more than one leader ('{}', '{}'{})",
            first.name,
            second.name,
            if leaders.next().is_some() { ", ..." } else { "" }
        ))),
    }
}

/// Check the structural rules every loaded topology must satisfy
pub fn validate(nodes: &[Node]) -> SwarmformResult<()> {
    if nodes.is_empty() {
        return Err(SwarmformError::InvariantViolation(
            "topology has no nodes".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for node in nodes {
        if !seen.insert(node.name.as_str()) {
            return Err(SwarmformError::InvariantViolation(format!(
                "duplicate node name '{}'",
                node.name
            )));
        }
    }

    leader_of(nodes).map(|_| ())
}

/// Number of nodes that vote in quorum-sensitive services
pub fn quorum_members(nodes: &[Node]) -> usize {
    nodes.iter().filter(|n| n.role.is_quorum_member()).count()
}

/// Configuration-store bootstrap-expect for this topology
///
/// Small clusters get a single-server store so that one manager is enough
/// to serve; three or more voting members get a three-server quorum.
pub fn bootstrap_expect(nodes: &[Node]) -> u8 {
    if quorum_members(nodes) >= usize::from(FULL_QUORUM) {
        FULL_QUORUM
    } else {
        SINGLE_NODE_QUORUM
    }
}
