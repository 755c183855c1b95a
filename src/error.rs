//! Error types for Swarmform
//!
//! Uses `thiserror` for library errors. The binary converts these into
//! `anyhow` errors and picks the process exit status from the variant.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::domain::ports::{RemoteError, RenderError, TransferError};

/// Result type alias for Swarmform operations
pub type SwarmformResult<T> = Result<T, SwarmformError>;

/// One failed node of a fan-out batch
#[derive(Debug, Clone)]
pub struct NodeFailure {
    pub node: String,
    pub error: RemoteError,
}

impl std::fmt::Display for NodeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.node, self.error)
    }
}

/// Main error type for Swarmform operations
#[derive(Error, Debug)]
pub enum SwarmformError {
    /// A rollout cannot start (missing earlier rollout, missing setting)
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// Staging a file or directory onto a node failed
    #[error("failed to stage {path} on {host}: {source}")]
    Transfer {
        host: String,
        path: PathBuf,
        #[source]
        source: TransferError,
    },

    /// A required remote command failed
    #[error(transparent)]
    RemoteCommand(#[from] RemoteError),

    /// A fan-out batch had at least one failing node
    #[error("{} of {total} nodes failed: {}", .failures.len(), join_failures(.failures))]
    FanOut {
        total: usize,
        failures: Vec<NodeFailure>,
    },

    /// A service did not report ready before its deadline
    #[error("'{stage}' did not become ready on {host} within {}s (waiting for '{marker}')", .waited.as_secs())]
    ReadinessTimeout {
        stage: String,
        host: String,
        marker: String,
        waited: Duration,
    },

    /// The topology breaks a structural rule (no leader, duplicate names)
    #[error("invalid topology: {0}")]
    InvariantViolation(String),

    /// Descriptor or topology file missing
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    /// Descriptor or topology file malformed
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Template data missing or template could not be rendered
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_failures(failures: &[NodeFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl SwarmformError {
    /// Exit status used by the CLI for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SwarmformError::Precondition(_) => 2,
            SwarmformError::InvariantViolation(_) => 3,
            SwarmformError::ReadinessTimeout { .. } => 4,
            _ => 1,
        }
    }
}
