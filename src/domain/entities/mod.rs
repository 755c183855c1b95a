//! Domain Entities
//!
//! - `Node` - a cluster machine with its role and deployed stacks
//! - `topology` - rules over the node list (leader, quorum)

mod node;
pub mod topology;

pub use node::Node;
pub use topology::{bootstrap_expect, leader_of};
