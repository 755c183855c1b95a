//! Deployment Orchestrator
//!
//! Executes a rollout plan stage by stage. Stages never overlap; only the
//! command of an all-nodes stage runs concurrently. The first failing
//! stage aborts the rollout.

use std::sync::Arc;
use std::time::Duration;

use crate::application::fan_out::run_on_all;
use crate::application::readiness::{ReadinessOutcome, ReadinessProber};
use crate::application::staging::{ConfigStager, StagingSettings};
use crate::domain::entities::{leader_of, Node};
use crate::domain::ports::{FileTransfer, RemoteShell, TemplateRenderer};
use crate::error::{SwarmformError, SwarmformResult};

use super::context::RolloutContext;
use super::stage::{DeploymentStage, RolloutPlan, StageTarget};

/// What one executed stage did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub name: String,
    pub files_staged: usize,
    pub nodes_run: usize,
    pub readiness: Option<ReadinessOutcome>,
}

pub struct Orchestrator<'a, S> {
    shell: Arc<S>,
    transfer: &'a dyn FileTransfer,
    renderer: &'a dyn TemplateRenderer,
    staging: &'a StagingSettings,
    probe_interval: Duration,
}

impl<'a, S> Orchestrator<'a, S>
where
    S: RemoteShell + 'static,
{
    pub fn new(
        shell: Arc<S>,
        transfer: &'a dyn FileTransfer,
        renderer: &'a dyn TemplateRenderer,
        staging: &'a StagingSettings,
        probe_interval: Duration,
    ) -> Self {
        Self {
            shell,
            transfer,
            renderer,
            staging,
            probe_interval,
        }
    }

    /// Run every stage of `plan` in order
    pub fn run(
        &self,
        plan: &RolloutPlan,
        nodes: &[Node],
        ctx: &mut RolloutContext,
    ) -> SwarmformResult<Vec<StageReport>> {
        let leader = leader_of(nodes)?;
        let total = plan.stages.len();
        let mut reports = Vec::with_capacity(total);

        for (i, stage) in plan.stages.iter().enumerate() {
            tracing::info!(
                rollout = %plan.kind,
                stage = %stage.name,
                step = i + 1,
                total,
                "stage started"
            );
            let report = self.run_stage(stage, leader, nodes, ctx)?;
            reports.push(report);
        }

        tracing::info!(rollout = %plan.kind, stages = total, "rollout complete");
        Ok(reports)
    }

    fn run_stage(
        &self,
        stage: &DeploymentStage,
        leader: &Node,
        nodes: &[Node],
        ctx: &mut RolloutContext,
    ) -> SwarmformResult<StageReport> {
        let mut report = StageReport {
            name: stage.name.clone(),
            files_staged: 0,
            nodes_run: 0,
            readiness: None,
        };

        if !stage.files.is_empty() {
            let shell: &dyn RemoteShell = self.shell.as_ref();
            let stager = ConfigStager::new(self.transfer, shell, self.renderer, self.staging);
            let data = ctx.merge_captures(&stage.data);
            for path in &stage.files {
                report.files_staged += stager.stage(path, leader, &stage.templates, &data)?.len();
            }
        }

        if let Some(cmd) = &stage.command {
            let command = ctx.expand(&cmd.command)?;
            let output = match cmd.target {
                StageTarget::Leader => {
                    report.nodes_run = 1;
                    self.shell.exec(&leader.host, &command, cmd.privileged)?
                }
                StageTarget::AllNodes => {
                    report.nodes_run = nodes.len();
                    let shell = self.shell.as_ref();
                    let mut outputs = run_on_all(nodes, |node| {
                        shell.exec(&node.host, &command, cmd.privileged)
                    })
                    .into_result()?;
                    outputs.remove(&leader.name).unwrap_or_default()
                }
            };

            if let Some(key) = &stage.capture {
                let value = output.trim();
                if value.is_empty() {
                    return Err(SwarmformError::InvariantViolation(format!(
                        "stage '{}' produced no output to capture as '{}'",
                        stage.name, key
                    )));
                }
                tracing::debug!(stage = %stage.name, key = %key, value, "captured");
                ctx.capture(key.clone(), value);
            }
        }

        if let Some(probe) = &stage.probe {
            let prober = ReadinessProber::new(Arc::clone(&self.shell), self.probe_interval);
            let outcome = prober.wait_for(&leader.host, probe);
            report.readiness = Some(outcome);
            if outcome == ReadinessOutcome::TimedOut {
                return Err(SwarmformError::ReadinessTimeout {
                    stage: stage.name.clone(),
                    host: leader.host.clone(),
                    marker: probe.success_marker.clone(),
                    waited: probe.deadline,
                });
            }
        }

        Ok(report)
    }
}
