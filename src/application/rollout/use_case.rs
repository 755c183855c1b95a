//! Rollout Use Case
//!
//! Orchestrates one named rollout:
//! 1. Load and validate the topology
//! 2. Check preconditions (no remote calls yet)
//! 3. Collect secrets
//! 4. Build and validate the plan
//! 5. Execute it (skipped on dry run)
//! 6. Flag the leader and persist the topology

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::application::staging::StagingSettings;
use crate::config::ClusterDescriptor;
use crate::domain::entities::{leader_of, topology};
use crate::domain::ports::{
    FileTransfer, RemoteShell, SecretSource, TemplateRenderer, TopologyRepository,
};
use crate::domain::value_objects::{Secret, ServiceFlag};
use crate::error::{SwarmformError, SwarmformResult};

use super::context::RolloutContext;
use super::orchestrator::{Orchestrator, StageReport};
use super::plans::{plan_for, PlanInputs};
use super::stage::RolloutPlan;

/// Options for one rollout run
#[derive(Debug, Clone)]
pub struct RolloutOptions {
    pub kind: ServiceFlag,
    pub nodes_path: PathBuf,
    pub staging: StagingSettings,
    pub probe_interval: Duration,
    pub htpasswd_cost: u32,
    /// Plan and validate only
    pub dry_run: bool,
}

/// Result of a rollout run
#[derive(Debug, Clone)]
pub struct RolloutResult {
    pub plan: RolloutPlan,
    /// Empty on dry run
    pub stages: Vec<StageReport>,
    pub leader: String,
    pub dry_run: bool,
}

impl RolloutResult {
    pub fn files_staged(&self) -> usize {
        self.stages.iter().map(|s| s.files_staged).sum()
    }
}

/// The stack a rollout needs on the leader before it can run
pub fn prerequisite(kind: ServiceFlag) -> Option<ServiceFlag> {
    match kind {
        ServiceFlag::Proxy => None,
        ServiceFlag::Monitoring | ServiceFlag::Logging => Some(ServiceFlag::Proxy),
    }
}

/// Rollout use case - parameterized by its ports
pub struct RolloutUseCase<S, FT, TR, R>
where
    S: RemoteShell + 'static,
    FT: FileTransfer,
    TR: TemplateRenderer,
    R: TopologyRepository,
{
    shell: Arc<S>,
    transfer: FT,
    renderer: TR,
    topology: R,
}

impl<S, FT, TR, R> RolloutUseCase<S, FT, TR, R>
where
    S: RemoteShell + 'static,
    FT: FileTransfer,
    TR: TemplateRenderer,
    R: TopologyRepository,
{
    pub fn new(shell: Arc<S>, transfer: FT, renderer: TR, topology: R) -> Self {
        Self {
            shell,
            transfer,
            renderer,
            topology,
        }
    }

    pub fn execute(
        &self,
        options: &RolloutOptions,
        cluster: &ClusterDescriptor,
        secrets: &dyn SecretSource,
    ) -> SwarmformResult<RolloutResult> {
        let mut nodes = self.topology.load(&options.nodes_path)?;
        topology::validate(&nodes)?;
        let leader = leader_of(&nodes)?.clone();

        if let Some(required) = prerequisite(options.kind) {
            if !leader.has_flag(required) {
                return Err(SwarmformError::Precondition(format!(
                    "{} rollout needs {} deployed first (leader '{}' has no {} flag)",
                    options.kind, required, leader.name, required
                )));
            }
        }
        if options.kind == ServiceFlag::Proxy
            && cluster.acme_enabled
            && (cluster.domain.trim().is_empty() || cluster.email.trim().is_empty())
        {
            return Err(SwarmformError::Precondition(
                "traefik with ACME needs cluster.domain and cluster.email".to_string(),
            ));
        }

        let mut ctx = RolloutContext::new(cluster);
        collect_secrets(options.kind, cluster, secrets, &mut ctx)?;

        let plan = plan_for(
            options.kind,
            &PlanInputs {
                cluster,
                nodes: &nodes,
                remote_root: &options.staging.remote_root,
                context: &ctx,
                htpasswd_cost: options.htpasswd_cost,
            },
        )?;

        if options.dry_run {
            tracing::info!(rollout = %options.kind, "dry run, nothing deployed");
            return Ok(RolloutResult {
                plan,
                stages: Vec::new(),
                leader: leader.name,
                dry_run: true,
            });
        }

        let orchestrator = Orchestrator::new(
            Arc::clone(&self.shell),
            &self.transfer,
            &self.renderer,
            &options.staging,
            options.probe_interval,
        );
        let stages = orchestrator.run(&plan, &nodes, &mut ctx)?;

        for node in nodes.iter_mut().filter(|n| n.is_leader()) {
            node.service_flags.insert(options.kind);
        }
        self.topology.persist(&nodes, &options.nodes_path)?;
        tracing::info!(
            rollout = %options.kind,
            leader = %leader.name,
            path = %options.nodes_path.display(),
            "topology updated"
        );

        Ok(RolloutResult {
            plan,
            stages,
            leader: leader.name,
            dry_run: false,
        })
    }
}

/// Ask for every secret `kind` needs that the descriptor does not carry
fn collect_secrets(
    kind: ServiceFlag,
    cluster: &ClusterDescriptor,
    source: &dyn SecretSource,
    ctx: &mut RolloutContext,
) -> SwarmformResult<()> {
    let configured = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());

    match kind {
        ServiceFlag::Proxy => {}
        ServiceFlag::Monitoring => {
            ctx.set_secret(Secret::GrafanaPassword, source.provide(Secret::GrafanaPassword)?);
            let webhook = match configured(&cluster.monitoring.webhook_url) {
                Some(url) => url,
                None => source.provide(Secret::WebhookUrl)?,
            };
            ctx.set_secret(Secret::WebhookUrl, webhook);
        }
        ServiceFlag::Logging => {
            let user = match configured(&cluster.logging.kibana_user) {
                Some(user) => user,
                None => source.provide(Secret::KibanaUser)?,
            };
            ctx.set_secret(Secret::KibanaUser, user);
            ctx.set_secret(Secret::KibanaPassword, source.provide(Secret::KibanaPassword)?);
        }
    }
    Ok(())
}
