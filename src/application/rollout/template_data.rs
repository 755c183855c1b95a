//! Template data contracts
//!
//! One typed struct per rollout. Each is validated before any remote work
//! and serialized to the JSON object templates read with `{{ .Key }}`.

use serde::Serialize;
use serde_json::Value;

use crate::config::ClusterDescriptor;
use crate::domain::ports::RenderError;
use crate::error::SwarmformResult;

fn invalid(contract: &'static str, message: impl Into<String>) -> RenderError {
    RenderError::InvalidData {
        contract,
        message: message.into(),
    }
}

fn to_value<T: Serialize>(contract: &'static str, data: &T) -> SwarmformResult<Value> {
    serde_json::to_value(data).map_err(|e| invalid(contract, e.to_string()).into())
}

/// Data for traefik and consul templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProxyTemplateData {
    pub cluster_name: String,
    pub domain: String,
    pub email: String,
    pub acme_enabled: bool,
    pub traefik_version: String,
    pub consul_version: String,
    /// Consul `bootstrap_expect`
    pub bootstrap_expect: u8,
}

impl ProxyTemplateData {
    const CONTRACT: &'static str = "ProxyTemplateData";

    pub fn new(cluster: &ClusterDescriptor, bootstrap_expect: u8) -> Self {
        Self {
            cluster_name: cluster.name.clone(),
            domain: cluster.domain.clone(),
            email: cluster.email.clone(),
            acme_enabled: cluster.acme_enabled,
            traefik_version: cluster.versions.traefik.clone(),
            consul_version: cluster.versions.consul.clone(),
            bootstrap_expect,
        }
    }

    pub fn validate(&self) -> SwarmformResult<()> {
        if self.acme_enabled && (self.domain.trim().is_empty() || self.email.trim().is_empty()) {
            return Err(invalid(
                Self::CONTRACT,
                "ACME needs both cluster.domain and cluster.email",
            )
            .into());
        }
        if self.bootstrap_expect == 0 {
            return Err(invalid(Self::CONTRACT, "bootstrap_expect must be at least 1").into());
        }
        Ok(())
    }

    pub fn to_value(&self) -> SwarmformResult<Value> {
        self.validate()?;
        to_value(Self::CONTRACT, self)
    }
}

/// Data for the swarmprom templates
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MonitoringTemplateData {
    pub cluster_name: String,
    pub domain: String,
    pub channel_name: String,
    pub webhook_url: String,
    pub grafana_password: String,
    pub prometheus_version: String,
    pub grafana_version: String,
    pub alertmanager_version: String,
    pub node_exporter_version: String,
    pub cadvisor_version: String,
}

impl MonitoringTemplateData {
    const CONTRACT: &'static str = "MonitoringTemplateData";

    pub fn new(cluster: &ClusterDescriptor, webhook_url: &str, grafana_password: &str) -> Self {
        let versions = &cluster.versions;
        Self {
            cluster_name: cluster.name.clone(),
            domain: cluster.domain.clone(),
            channel_name: cluster.monitoring.channel_name.clone(),
            webhook_url: webhook_url.to_string(),
            grafana_password: grafana_password.to_string(),
            prometheus_version: versions.prometheus.clone(),
            grafana_version: versions.grafana.clone(),
            alertmanager_version: versions.alertmanager.clone(),
            node_exporter_version: versions.node_exporter.clone(),
            cadvisor_version: versions.cadvisor.clone(),
        }
    }

    pub fn validate(&self) -> SwarmformResult<()> {
        if self.grafana_password.is_empty() {
            return Err(invalid(Self::CONTRACT, "grafana admin password is empty").into());
        }
        if !(self.webhook_url.starts_with("https://") || self.webhook_url.starts_with("http://")) {
            return Err(invalid(
                Self::CONTRACT,
                format!("webhook url '{}' is not an http(s) URL", self.webhook_url),
            )
            .into());
        }
        Ok(())
    }

    pub fn to_value(&self) -> SwarmformResult<Value> {
        self.validate()?;
        to_value(Self::CONTRACT, self)
    }
}

impl std::fmt::Debug for MonitoringTemplateData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitoringTemplateData")
            .field("cluster_name", &self.cluster_name)
            .field("channel_name", &self.channel_name)
            .field("webhook_url", &"<redacted>")
            .field("grafana_password", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Data for the ELK templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoggingTemplateData {
    pub cluster_name: String,
    pub domain: String,
    /// `user:hash` with every `$` doubled for compose files
    pub kibana_creds: String,
    pub elasticsearch_version: String,
    pub logstash_version: String,
    pub kibana_version: String,
    pub filebeat_version: String,
    pub curator_version: String,
}

impl LoggingTemplateData {
    const CONTRACT: &'static str = "LoggingTemplateData";

    pub fn new(cluster: &ClusterDescriptor, kibana_creds: String) -> Self {
        let versions = &cluster.versions;
        Self {
            cluster_name: cluster.name.clone(),
            domain: cluster.domain.clone(),
            kibana_creds,
            elasticsearch_version: versions.elasticsearch.clone(),
            logstash_version: versions.logstash.clone(),
            kibana_version: versions.kibana.clone(),
            filebeat_version: versions.filebeat.clone(),
            curator_version: versions.curator.clone(),
        }
    }

    pub fn validate(&self) -> SwarmformResult<()> {
        match self.kibana_creds.split_once(':') {
            Some((user, hash)) if !user.is_empty() && !hash.is_empty() => Ok(()),
            _ => Err(invalid(Self::CONTRACT, "kibana credentials must be 'user:hash'").into()),
        }
    }

    pub fn to_value(&self) -> SwarmformResult<Value> {
        self.validate()?;
        to_value(Self::CONTRACT, self)
    }
}

/// htpasswd line for basic auth behind traefik
///
/// The password is bcrypt-hashed; `$` is doubled so docker compose does not
/// treat the hash as variable interpolation.
pub fn htpasswd_entry(user: &str, password: &str, cost: u32) -> SwarmformResult<String> {
    if user.is_empty() || user.contains(':') {
        return Err(invalid(
            LoggingTemplateData::CONTRACT,
            "kibana user must be non-empty and must not contain ':'",
        )
        .into());
    }
    let hash = bcrypt::hash(password, cost)
        .map_err(|e| invalid(LoggingTemplateData::CONTRACT, e.to_string()))?;
    Ok(format!("{}:{}", user, hash.replace('$', "$$")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SwarmformError;

    fn cluster() -> ClusterDescriptor {
        ClusterDescriptor {
            name: "prod".to_string(),
            domain: "example.com".to_string(),
            email: "ops@example.com".to_string(),
            ..ClusterDescriptor::default()
        }
    }

    #[test]
    fn proxy_data_uses_pascal_case_keys() {
        let value = ProxyTemplateData::new(&cluster(), 3).to_value().unwrap();
        assert_eq!(value["BootstrapExpect"], 3);
        assert_eq!(value["Domain"], "example.com");
        assert_eq!(value["TraefikVersion"], "1.7.9");
    }

    #[test]
    fn proxy_acme_requires_domain_and_email() {
        let mut cluster = cluster();
        cluster.acme_enabled = true;
        cluster.email.clear();

        let err = ProxyTemplateData::new(&cluster, 1).validate().unwrap_err();
        assert!(matches!(
            err,
            SwarmformError::Render(RenderError::InvalidData { contract: "ProxyTemplateData", .. })
        ));
    }

    #[test]
    fn monitoring_rejects_non_http_webhook() {
        let data = MonitoringTemplateData::new(&cluster(), "hooks.slack.com/x", "pw");
        assert!(data.validate().is_err());

        let data = MonitoringTemplateData::new(&cluster(), "https://hooks.slack.com/x", "pw");
        assert!(data.validate().is_ok());
    }

    #[test]
    fn monitoring_debug_redacts_secrets() {
        let data = MonitoringTemplateData::new(&cluster(), "https://hooks/secret", "hunter2");
        let debug = format!("{:?}", data);
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("hooks/secret"));
    }

    #[test]
    fn htpasswd_entry_doubles_dollars_and_verifies() {
        let entry = htpasswd_entry("admin", "s3cret", 4).unwrap();
        let (user, escaped) = entry.split_once(':').unwrap();
        assert_eq!(user, "admin");
        assert!(escaped.starts_with("$$2"));

        let hash = escaped.replace("$$", "$");
        assert!(bcrypt::verify("s3cret", &hash).unwrap());
    }

    #[test]
    fn htpasswd_entry_rejects_colon_in_user() {
        assert!(htpasswd_entry("ad:min", "pw", 4).is_err());
        assert!(htpasswd_entry("", "pw", 4).is_err());
    }

    #[test]
    fn logging_data_requires_user_and_hash() {
        let data = LoggingTemplateData::new(&cluster(), "admin:".to_string());
        assert!(data.validate().is_err());

        let data = LoggingTemplateData::new(&cluster(), "admin:$$2b$$04$$abc".to_string());
        assert_eq!(data.to_value().unwrap()["KibanaCreds"], "admin:$$2b$$04$$abc");
    }
}
