//! Rollouts
//!
//! A rollout is a named, ordered list of deployment stages (`proxy`,
//! `monitoring`, `logging`). Plans are built up front from the topology,
//! descriptor and collected secrets, then executed by the orchestrator.

mod context;
mod orchestrator;
mod plans;
mod stage;
mod template_data;
mod use_case;


pub use context::RolloutContext;
pub use orchestrator::{Orchestrator, StageReport};
pub use plans::{plan_for, PlanInputs, CURRENT_NODE_ID};
pub use stage::{DeploymentStage, RolloutPlan, StageCommand, StageTarget};
pub use template_data::{
    htpasswd_entry, LoggingTemplateData, MonitoringTemplateData, ProxyTemplateData,
};
pub use use_case::{prerequisite, RolloutOptions, RolloutResult, RolloutUseCase};
