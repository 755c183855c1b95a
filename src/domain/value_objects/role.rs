//! Role value object - a node's place in the swarm
//!
//! - `Leader`: the single control node every rollout is driven from
//! - `Manager`: a swarm manager, counts towards quorum
//! - `Worker`: runs tasks only

use serde::{Deserialize, Serialize};

/// Swarm role of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Leader,
    Manager,
    Worker,
}

impl Role {
    /// Returns true for roles that vote in quorum-sensitive services
    pub fn is_quorum_member(&self) -> bool {
        matches!(self, Role::Leader | Role::Manager)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Leader => write!(f, "leader"),
            Role::Manager => write!(f, "manager"),
            Role::Worker => write!(f, "worker"),
        }
    }
}
