//! Configuration type definitions

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{SwarmformError, SwarmformResult};

/// Image versions of every deployed service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceVersions {
    pub traefik: String,
    pub consul: String,
    pub prometheus: String,
    pub grafana: String,
    pub alertmanager: String,
    pub node_exporter: String,
    pub cadvisor: String,
    pub elasticsearch: String,
    pub logstash: String,
    pub kibana: String,
    pub filebeat: String,
    pub curator: String,
}

impl Default for ServiceVersions {
    fn default() -> Self {
        Self {
            traefik: "1.7.9".to_string(),
            consul: "1.4.3".to_string(),
            prometheus: "v2.7.2".to_string(),
            grafana: "6.0.1".to_string(),
            alertmanager: "v0.16.1".to_string(),
            node_exporter: "v0.17.0".to_string(),
            cadvisor: "v0.33.0".to_string(),
            elasticsearch: "6.6.1".to_string(),
            logstash: "6.6.1".to_string(),
            kibana: "6.6.1".to_string(),
            filebeat: "6.6.1".to_string(),
            curator: "5.6.0".to_string(),
        }
    }
}

/// Non-secret monitoring settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Slack channel alerts are posted to
    pub channel_name: String,
    /// Alertmanager webhook; prompted for when empty
    pub webhook_url: Option<String>,
}

/// Non-secret logging settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Kibana basic-auth user; prompted for when empty
    pub kibana_user: Option<String>,
}

/// Cluster-wide descriptor: toggles, versions and service settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterDescriptor {
    /// Cluster name, used in alert labels
    pub name: String,
    /// Production proxy with consul and Let's Encrypt certificates
    pub acme_enabled: bool,
    /// Create overlay networks with `--opt encrypted`
    pub encrypt_networks: bool,
    /// Public domain served by the proxy (required with ACME)
    pub domain: String,
    /// ACME registration email (required with ACME)
    pub email: String,
    pub versions: ServiceVersions,
    pub monitoring: MonitoringConfig,
    pub logging: LoggingConfig,
}

/// How rollouts lay files out and poll for readiness
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Local tree holding configuration files and templates
    pub sources_dir: PathBuf,
    /// Remote directory (relative to the ssh user's home, or absolute)
    pub remote_root: String,
    /// Seconds between two readiness polls
    pub probe_interval_secs: u64,
    /// Owner applied to every staged file
    pub file_owner: String,
    /// Octal mode applied to every staged file
    ///
    /// scp runs as the ssh user, so a re-run can only overwrite files
    /// whose mode still lets that user write them.
    pub file_mode: String,
    /// bcrypt cost for generated htpasswd entries
    pub htpasswd_cost: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            sources_dir: PathBuf::from("sources"),
            remote_root: "swarmform".to_string(),
            probe_interval_secs: 10,
            file_owner: "root:root".to_string(),
            file_mode: "777".to_string(),
            htpasswd_cost: 14,
        }
    }
}

impl OrchestratorConfig {
    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs)
    }
}

/// ssh/scp client settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshConfig {
    /// Login user; defaults to the ssh client's own choice
    pub user: Option<String>,
    pub port: Option<u16>,
    /// Private key; defaults to the ssh client's own choice
    pub identity_file: Option<PathBuf>,
    /// Extra `-o` options passed to both ssh and scp
    pub options: Vec<String>,
}

/// Top-level `swarmform.yml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cluster: ClusterDescriptor,
    pub orchestrator: OrchestratorConfig,
    pub ssh: SshConfig,
}

impl Config {
    /// Check values serde cannot check
    pub fn validate(&self) -> SwarmformResult<()> {
        if self.orchestrator.probe_interval_secs == 0 {
            return Err(SwarmformError::Config(
                "orchestrator.probe_interval_secs must be greater than zero".to_string(),
            ));
        }
        let mode = &self.orchestrator.file_mode;
        if mode.is_empty() || mode.len() > 4 || !mode.chars().all(|c| ('0'..='7').contains(&c)) {
            return Err(SwarmformError::Config(format!(
                "orchestrator.file_mode '{}' is not an octal mode",
                mode
            )));
        }
        if !(4..=31).contains(&self.orchestrator.htpasswd_cost) {
            return Err(SwarmformError::Config(format!(
                "orchestrator.htpasswd_cost {} is outside 4..=31",
                self.orchestrator.htpasswd_cost
            )));
        }
        if self.orchestrator.remote_root.trim().is_empty() {
            return Err(SwarmformError::Config(
                "orchestrator.remote_root must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
