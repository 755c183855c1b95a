//! SSH Remote Shell
//!
//! Implements the RemoteShell port by shelling out to the system `ssh`
//! client, so host aliases, agents and known_hosts from the operator's
//! ssh configuration apply unchanged.

use std::process::{Command, Stdio};

use crate::config::SshConfig;
use crate::domain::ports::{RemoteError, RemoteShell};
use crate::domain::value_objects::shell_quote;

/// Exit status ssh reserves for its own connection failures
const SSH_CONNECTION_FAILURE: i32 = 255;

/// Remote shell backed by the `ssh` binary
pub struct SshShell {
    settings: SshConfig,
}

impl SshShell {
    pub fn new(settings: SshConfig) -> Self {
        Self { settings }
    }

    /// Build `user@host` (or `host`) for the configured user
    pub fn destination(&self, host: &str) -> String {
        match &self.settings.user {
            Some(user) if !host.contains('@') => format!("{}@{}", user, host),
            _ => host.to_string(),
        }
    }

    /// Wrap a command so it runs as root without ever prompting
    fn privileged(command: &str) -> String {
        format!("sudo -n sh -c {}", shell_quote(command))
    }

    fn build(&self, host: &str, command: &str) -> Command {
        let mut cmd = Command::new("ssh");
        cmd.arg("-o").arg("BatchMode=yes");
        if let Some(port) = self.settings.port {
            cmd.arg("-p").arg(port.to_string());
        }
        if let Some(identity) = &self.settings.identity_file {
            cmd.arg("-i").arg(identity);
        }
        for option in &self.settings.options {
            cmd.arg("-o").arg(option);
        }
        cmd.arg(self.destination(host))
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl RemoteShell for SshShell {
    fn exec(&self, host: &str, command: &str, privileged: bool) -> Result<String, RemoteError> {
        let remote_command = if privileged {
            Self::privileged(command)
        } else {
            command.to_string()
        };

        tracing::debug!(host, command = %remote_command, "ssh exec");

        let output = self
            .build(host, &remote_command)
            .output()
            .map_err(|e| RemoteError::Transport {
                host: host.to_string(),
                message: format!("failed to start ssh: {}", e),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        match output.status.code() {
            Some(0) => Ok(String::from_utf8_lossy(&output.stdout).trim().to_string()),
            Some(SSH_CONNECTION_FAILURE) | None => Err(RemoteError::Transport {
                host: host.to_string(),
                message: if stderr.trim().is_empty() {
                    format!("ssh terminated ({})", output.status)
                } else {
                    stderr.trim().to_string()
                },
            }),
            Some(status) => Err(RemoteError::NonZeroExit {
                host: host.to_string(),
                command: command.to_string(),
                status,
                stderr,
            }),
        }
    }
}
