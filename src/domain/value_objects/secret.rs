//! Secret value object - credentials collected right before a rollout
//!
//! Secrets live only in the rollout context and rendered templates. They
//! are never written to the topology or configuration files.

/// A credential a rollout needs from the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Secret {
    GrafanaPassword,
    WebhookUrl,
    KibanaUser,
    KibanaPassword,
}

impl Secret {
    /// Environment variable that can supply the secret non-interactively
    pub fn env_var(self) -> &'static str {
        match self {
            Secret::GrafanaPassword => "SWARMFORM_GRAFANA_PASSWORD",
            Secret::WebhookUrl => "SWARMFORM_WEBHOOK_URL",
            Secret::KibanaUser => "SWARMFORM_KIBANA_USER",
            Secret::KibanaPassword => "SWARMFORM_KIBANA_PASSWORD",
        }
    }

    /// Prompt shown when asking interactively
    pub fn prompt(self) -> &'static str {
        match self {
            Secret::GrafanaPassword => "Grafana admin password",
            Secret::WebhookUrl => "Alertmanager webhook URL",
            Secret::KibanaUser => "Kibana login",
            Secret::KibanaPassword => "Kibana password",
        }
    }

    /// Whether input must not be echoed
    pub fn is_hidden(self) -> bool {
        matches!(self, Secret::GrafanaPassword | Secret::KibanaPassword)
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prompt())
    }
}
