//! Swarmform - Docker swarm service rollouts over ssh
//!
//! Swarmform stages templated configuration onto the leader of a swarm,
//! deploys the proxy, monitoring and logging stacks, fans node-level
//! commands out to every machine and waits for services to report ready
//! before moving on.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{RolloutOptions, RolloutResult, RolloutUseCase};
pub use config::Config;
pub use domain::entities::Node;
pub use domain::value_objects::{Role, ServiceFlag};
pub use error::{SwarmformError, SwarmformResult};
