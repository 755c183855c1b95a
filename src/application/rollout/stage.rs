//! Deployment stages and rollout plans

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde_json::Value;

use crate::application::readiness::ReadinessProbe;
use crate::domain::value_objects::ServiceFlag;

/// Which nodes run a stage command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageTarget {
    Leader,
    /// Every node at once through the fan-out executor
    AllNodes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCommand {
    /// Shell command; `${key}` is replaced by a value captured earlier
    pub command: String,
    pub target: StageTarget,
    pub privileged: bool,
}

/// One step of a rollout
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentStage {
    pub name: String,
    /// Paths relative to the sources root, staged onto the leader
    pub files: Vec<PathBuf>,
    /// Subset of staged files rendered with `data`
    pub templates: BTreeSet<PathBuf>,
    pub data: Value,
    pub command: Option<StageCommand>,
    /// Store the trimmed leader output under this key
    pub capture: Option<String>,
    pub probe: Option<ReadinessProbe>,
}

impl DeploymentStage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
            templates: BTreeSet::new(),
            data: Value::Null,
            command: None,
            capture: None,
            probe: None,
        }
    }

    pub fn stage(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    pub fn template(mut self, path: impl Into<PathBuf>) -> Self {
        self.templates.insert(path.into());
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Run `command` with elevated privilege on the leader
    pub fn on_leader(mut self, command: impl Into<String>) -> Self {
        self.command = Some(StageCommand {
            command: command.into(),
            target: StageTarget::Leader,
            privileged: true,
        });
        self
    }

    /// Run `command` with elevated privilege on every node
    pub fn on_all_nodes(mut self, command: impl Into<String>) -> Self {
        self.command = Some(StageCommand {
            command: command.into(),
            target: StageTarget::AllNodes,
            privileged: true,
        });
        self
    }

    pub fn capture_as(mut self, key: impl Into<String>) -> Self {
        self.capture = Some(key.into());
        self
    }

    pub fn probe(mut self, probe: ReadinessProbe) -> Self {
        self.probe = Some(probe);
        self
    }
}

/// Ordered stages of one named rollout
#[derive(Debug, Clone, PartialEq)]
pub struct RolloutPlan {
    pub kind: ServiceFlag,
    pub stages: Vec<DeploymentStage>,
}

impl RolloutPlan {
    pub fn new(kind: ServiceFlag, stages: Vec<DeploymentStage>) -> Self {
        Self { kind, stages }
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }

    /// Human-readable outline, one line per stage element
    pub fn describe(&self) -> String {
        let mut lines = vec![format!("rollout {}", self.kind)];
        for (i, stage) in self.stages.iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, stage.name));
            for file in &stage.files {
                lines.push(format!("   stage {}", file.display()));
            }
            for template in &stage.templates {
                lines.push(format!("   render {}", template.display()));
            }
            if let Some(cmd) = &stage.command {
                let target = match cmd.target {
                    StageTarget::Leader => "leader",
                    StageTarget::AllNodes => "all nodes",
                };
                lines.push(format!("   run on {}: {}", target, cmd.command));
            }
            if let Some(key) = &stage.capture {
                lines.push(format!("   capture {}", key));
            }
            if let Some(probe) = &stage.probe {
                lines.push(format!(
                    "   wait up to {}s for '{}'",
                    probe.deadline.as_secs(),
                    probe.success_marker
                ));
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn builder_collects_parts() {
        let stage = DeploymentStage::new("elk")
            .stage("elk")
            .template("elk/elk.yml")
            .on_all_nodes("sysctl -w vm.max_map_count=262144")
            .capture_as("Out");

        assert_eq!(stage.files, vec![PathBuf::from("elk")]);
        assert!(stage.templates.contains(&PathBuf::from("elk/elk.yml")));
        let cmd = stage.command.unwrap();
        assert_eq!(cmd.target, StageTarget::AllNodes);
        assert!(cmd.privileged);
        assert_eq!(stage.capture.as_deref(), Some("Out"));
    }

    #[test]
    fn describe_lists_probe_deadline() {
        let plan = RolloutPlan::new(
            ServiceFlag::Proxy,
            vec![DeploymentStage::new("consul").probe(ReadinessProbe {
                command: "docker service logs traefik_consul_server 2>&1".to_string(),
                success_marker: "Synced node info".to_string(),
                deadline: Duration::from_secs(300),
                privileged: true,
            })],
        );

        assert_eq!(
            plan.describe(),
            "rollout proxy\n1. consul\n   wait up to 300s for 'Synced node info'"
        );
    }
}
