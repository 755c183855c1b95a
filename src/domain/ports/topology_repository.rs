//! TopologyRepository port - persistence of the node list
//!
//! The orchestrator loads the topology once at the start of a run and
//! writes it back once after a successful rollout.

use std::path::Path;

use crate::domain::entities::Node;
use crate::error::SwarmformResult;

/// Load and persist the cluster topology
pub trait TopologyRepository {
    /// Load the ordered node list
    ///
    /// Fails with `NotFound` when the file is absent and `Parse` when it
    /// is malformed.
    fn load(&self, path: &Path) -> SwarmformResult<Vec<Node>>;

    /// Replace the stored topology
    ///
    /// Implementations must never leave a partially written file behind.
    fn persist(&self, nodes: &[Node], path: &Path) -> SwarmformResult<()>;
}

impl<T: TopologyRepository + ?Sized> TopologyRepository for &T {
    fn load(&self, path: &Path) -> SwarmformResult<Vec<Node>> {
        (**self).load(path)
    }

    fn persist(&self, nodes: &[Node], path: &Path) -> SwarmformResult<()> {
        (**self).persist(nodes, path)
    }
}
