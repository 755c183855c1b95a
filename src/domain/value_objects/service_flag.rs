//! ServiceFlag value object - which stacks a node already runs

use serde::{Deserialize, Serialize};

/// A service stack recorded on a node after a successful rollout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceFlag {
    /// Reverse proxy (traefik, with consul in production mode)
    Proxy,
    /// Prometheus, grafana, alertmanager
    Monitoring,
    /// Elasticsearch, logstash, kibana, filebeat
    Logging,
}

impl std::fmt::Display for ServiceFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceFlag::Proxy => write!(f, "proxy"),
            ServiceFlag::Monitoring => write!(f, "monitoring"),
            ServiceFlag::Logging => write!(f, "logging"),
        }
    }
}
