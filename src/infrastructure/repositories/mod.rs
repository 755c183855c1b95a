//! Repository implementations

mod topology;

pub use topology::{YamlTopologyRepository, NODES_FILE_NAME};
