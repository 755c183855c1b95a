//! Remote Shell Port
//!
//! Executes a command on a cluster node. The orchestrator never talks to
//! ssh directly; everything goes through this trait so rollouts can be
//! exercised against recording fakes.

/// Error returned by a remote command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The command ran on the host and exited with a non-zero status
    NonZeroExit {
        host: String,
        command: String,
        status: i32,
        stderr: String,
    },
    /// The host could not be reached or the client could not be started
    Transport { host: String, message: String },
}

impl RemoteError {
    pub fn host(&self) -> &str {
        match self {
            Self::NonZeroExit { host, .. } | Self::Transport { host, .. } => host,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonZeroExit {
                host,
                command,
                status,
                stderr,
            } => {
                write!(f, "'{}' exited with {} on {}", command, status, host)?;
                let stderr = stderr.trim();
                if !stderr.is_empty() {
                    write!(f, ": {}", stderr)?;
                }
                Ok(())
            }
            Self::Transport { host, message } => {
                write!(f, "cannot reach {}: {}", host, message)
            }
        }
    }
}

impl std::error::Error for RemoteError {}

/// Command execution on a remote node
///
/// Implementations:
/// - `SshShell` - shells out to the system `ssh` client
/// - recording fakes in tests
pub trait RemoteShell: Send + Sync {
    /// Run `command` on `host` and return its trimmed stdout
    ///
    /// `privileged` runs the command with elevated rights on the host.
    fn exec(&self, host: &str, command: &str, privileged: bool) -> Result<String, RemoteError>;
}

impl<T: RemoteShell + ?Sized> RemoteShell for std::sync::Arc<T> {
    fn exec(&self, host: &str, command: &str, privileged: bool) -> Result<String, RemoteError> {
        (**self).exec(host, command, privileged)
    }
}
