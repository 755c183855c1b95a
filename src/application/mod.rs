//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, ports)
//! - Does NOT talk to ssh, scp or the filesystem layout directly
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `RolloutUseCase` - Runs a named rollout (load, check, plan, execute, persist)
//!
//! ## Services
//!
//! - `ConfigStager` - Mirrors local configuration trees onto a node
//! - `run_on_all` - Runs one remote operation on every node concurrently
//! - `ReadinessProber` - Polls a service until it reports ready

pub mod fan_out;
pub mod readiness;
pub mod rollout;
pub mod staging;

pub use fan_out::{run_on_all, FanOutResult};
pub use readiness::{ReadinessOutcome, ReadinessProbe, ReadinessProber};
pub use rollout::{
    prerequisite, DeploymentStage, RolloutContext, RolloutOptions, RolloutPlan, RolloutResult,
    RolloutUseCase, StageReport,
};
pub use staging::{ConfigStager, StagedFile, StagingSettings};
