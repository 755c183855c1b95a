//! Node entity - one machine of the swarm

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Role, ServiceFlag};

/// A cluster node as stored in `nodes.yml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique node name
    pub name: String,
    /// Connection address used by ssh/scp
    pub host: String,
    /// Swarm role, fixed when the node joined
    pub role: Role,
    /// Stacks deployed from this node
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub service_flags: BTreeSet<ServiceFlag>,
}

impl Node {
    pub fn new(name: impl Into<String>, host: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            role,
            service_flags: BTreeSet::new(),
        }
    }

    pub fn with_flag(mut self, flag: ServiceFlag) -> Self {
        self.service_flags.insert(flag);
        self
    }

    pub fn has_flag(&self, flag: ServiceFlag) -> bool {
        self.service_flags.contains(&flag)
    }

    pub fn is_leader(&self) -> bool {
        self.role == Role::Leader
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_yaml_omits_empty_flags() {
        let node = Node::new("alpha", "10.0.0.1", Role::Worker);
        let yaml = serde_yaml_ng::to_string(&node).unwrap();
        assert!(!yaml.contains("service_flags"));
    }

    #[test]
    fn node_yaml_reads_flags() {
        let yaml = "name: alpha\nhost: 10.0.0.1\nrole: leader\nservice_flags: [proxy]\n";
        let node: Node = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(node.is_leader());
        assert!(node.has_flag(ServiceFlag::Proxy));
        assert!(!node.has_flag(ServiceFlag::Logging));
    }
}
