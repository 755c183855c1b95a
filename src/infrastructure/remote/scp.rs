//! SCP File Transfer
//!
//! Implements the FileTransfer port with the system `scp` client.
//! Remote directories are created by the staging service beforehand;
//! scp does not create them.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::config::SshConfig;
use crate::domain::ports::{FileTransfer, TransferError};

/// File transfer backed by the `scp` binary
pub struct ScpTransfer {
    settings: SshConfig,
}

impl ScpTransfer {
    pub fn new(settings: SshConfig) -> Self {
        Self { settings }
    }

    fn target(&self, host: &str, remote: &str) -> String {
        match &self.settings.user {
            Some(user) if !host.contains('@') => format!("{}@{}:{}", user, host, remote),
            _ => format!("{}:{}", host, remote),
        }
    }

    fn build(&self, host: &str, local: &Path, remote: &str) -> Command {
        let mut cmd = Command::new("scp");
        cmd.arg("-q").arg("-o").arg("BatchMode=yes");
        if let Some(port) = self.settings.port {
            cmd.arg("-P").arg(port.to_string());
        }
        if let Some(identity) = &self.settings.identity_file {
            cmd.arg("-i").arg(identity);
        }
        for option in &self.settings.options {
            cmd.arg("-o").arg(option);
        }
        cmd.arg(local)
            .arg(self.target(host, remote))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

impl FileTransfer for ScpTransfer {
    fn copy(&self, host: &str, local: &Path, remote: &str) -> Result<(), TransferError> {
        tracing::debug!(host, local = %local.display(), remote, "scp copy");

        let output = self
            .build(host, local, remote)
            .output()
            .map_err(|e| TransferError::NotAvailable(format!("failed to start scp: {}", e)))?;

        if !output.status.success() {
            return Err(TransferError::CopyFailed {
                local: local.to_path_buf(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_includes_user_when_configured() {
        let scp = ScpTransfer::new(SshConfig {
            user: Some("cluster".to_string()),
            ..SshConfig::default()
        });
        assert_eq!(
            scp.target("10.0.0.1", "swarmform/elk/elk.yml"),
            "cluster@10.0.0.1:swarmform/elk/elk.yml"
        );
    }

    #[test]
    fn build_uses_capital_p_for_port() {
        let scp = ScpTransfer::new(SshConfig {
            port: Some(2222),
            ..SshConfig::default()
        });
        let cmd = scp.build("node-1", Path::new("/tmp/a.yml"), "swarmform/a.yml");
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert_eq!(
            args,
            vec![
                "-q",
                "-o",
                "BatchMode=yes",
                "-P",
                "2222",
                "/tmp/a.yml",
                "node-1:swarmform/a.yml"
            ]
        );
    }
}
