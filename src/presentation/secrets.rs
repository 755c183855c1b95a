//! Secret collection
//!
//! Environment variables first, then an interactive prompt when stdin is
//! a terminal. Non-interactive runs without the variable fail with a
//! precondition error instead of hanging.

use dialoguer::{Input, Password};
use is_terminal::IsTerminal;

use crate::domain::ports::SecretSource;
use crate::domain::value_objects::Secret;
use crate::error::{SwarmformError, SwarmformResult};

type EnvLookup = fn(&str) -> Option<String>;

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// SecretSource for the command line
pub struct TerminalSecrets {
    interactive: bool,
    lookup: EnvLookup,
}

impl TerminalSecrets {
    /// Prompt only when stdin is a terminal
    pub fn new() -> Self {
        Self {
            interactive: std::io::stdin().is_terminal(),
            lookup: process_env,
        }
    }

    #[cfg(test)]
    fn with_lookup(interactive: bool, lookup: EnvLookup) -> Self {
        Self {
            interactive,
            lookup,
        }
    }

    fn prompt(&self, secret: Secret) -> SwarmformResult<String> {
        let answer = if secret.is_hidden() {
            Password::new().with_prompt(secret.prompt()).interact()
        } else {
            Input::<String>::new()
                .with_prompt(secret.prompt())
                .interact_text()
        };
        answer.map_err(|e| {
            SwarmformError::Precondition(format!("could not read {}: {}", secret.prompt(), e))
        })
    }
}

impl Default for TerminalSecrets {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretSource for TerminalSecrets {
    fn provide(&self, secret: Secret) -> SwarmformResult<String> {
        if let Some(value) = (self.lookup)(secret.env_var()).filter(|v| !v.is_empty()) {
            tracing::debug!(secret = ?secret, "secret taken from environment");
            return Ok(value);
        }

        if !self.interactive {
            return Err(SwarmformError::Precondition(format!(
                "{} is required; set {} or run from a terminal",
                secret.prompt(),
                secret.env_var()
            )));
        }

        let value = self.prompt(secret)?;
        if value.trim().is_empty() {
            return Err(SwarmformError::Precondition(format!(
                "{} must not be empty",
                secret.prompt()
            )));
        }
        Ok(value)
    }
}
