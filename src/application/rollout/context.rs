//! Rollout context
//!
//! Everything a run knows beyond the topology: toggles from the
//! descriptor, secrets collected for this run and values captured from
//! stage commands. Passed explicitly to every stage.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::ClusterDescriptor;
use crate::domain::value_objects::Secret;
use crate::error::{SwarmformError, SwarmformResult};

#[derive(Clone, Default)]
pub struct RolloutContext {
    pub acme_enabled: bool,
    pub encrypt_networks: bool,
    secrets: BTreeMap<Secret, String>,
    captures: BTreeMap<String, String>,
}

impl RolloutContext {
    pub fn new(cluster: &ClusterDescriptor) -> Self {
        Self {
            acme_enabled: cluster.acme_enabled,
            encrypt_networks: cluster.encrypt_networks,
            ..Self::default()
        }
    }

    pub fn with_secret(mut self, secret: Secret, value: impl Into<String>) -> Self {
        self.set_secret(secret, value);
        self
    }

    pub fn set_secret(&mut self, secret: Secret, value: impl Into<String>) {
        self.secrets.insert(secret, value.into());
    }

    /// Value of a collected secret, or a precondition error naming it
    pub fn secret(&self, secret: Secret) -> SwarmformResult<&str> {
        self.secrets
            .get(&secret)
            .map(String::as_str)
            .ok_or_else(|| {
                SwarmformError::Precondition(format!(
                    "{} was not provided (set {})",
                    secret.prompt(),
                    secret.env_var()
                ))
            })
    }

    pub fn capture(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.captures.insert(key.into(), value.into());
    }

    pub fn captured(&self, key: &str) -> Option<&str> {
        self.captures.get(key).map(String::as_str)
    }

    /// Substitute `${key}` references with captured values
    ///
    /// A reference to a value no earlier stage captured is an error.
    pub fn expand(&self, command: &str) -> SwarmformResult<String> {
        let mut out = String::with_capacity(command.len());
        let mut rest = command;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                out.push_str(&rest[start..]);
                return Ok(out);
            };
            let key = &after[..end];
            let value = self.captured(key).ok_or_else(|| {
                SwarmformError::InvariantViolation(format!(
                    "command refers to '{}' which no earlier stage captured",
                    key
                ))
            })?;
            out.push_str(value);
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        Ok(out)
    }

    /// Stage template data with every captured value added at top level
    pub fn merge_captures(&self, data: &Value) -> Value {
        if self.captures.is_empty() {
            return data.clone();
        }
        let mut merged = match data {
            Value::Object(map) => map.clone(),
            _ => serde_json::Map::new(),
        };
        for (key, value) in &self.captures {
            merged.insert(key.clone(), Value::String(value.clone()));
        }
        Value::Object(merged)
    }
}

impl std::fmt::Debug for RolloutContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RolloutContext")
            .field("acme_enabled", &self.acme_enabled)
            .field("encrypt_networks", &self.encrypt_networks)
            .field("secrets", &self.secrets.keys().collect::<Vec<_>>())
            .field("captures", &self.captures)
            .finish()
    }
}
