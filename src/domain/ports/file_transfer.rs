//! File Transfer Port
//!
//! Copies a single local file onto a node. Directory handling, rendering
//! and post-processing live in the staging service, not here.

use std::path::{Path, PathBuf};

use super::remote_shell::RemoteError;
use super::template_renderer::RenderError;

/// Error while staging one file or directory
#[derive(Debug)]
pub enum TransferError {
    /// Local file could not be read or inspected
    Io(std::io::Error),
    /// Copy tool exited with a failure
    CopyFailed { local: PathBuf, status: Option<i32>, stderr: String },
    /// Copy tool could not be started
    NotAvailable(String),
    /// Remote directory creation or post-processing failed
    Remote(RemoteError),
    /// Template rendering failed
    Render(RenderError),
    /// Local path is outside the sources root
    OutsideRoot { path: PathBuf, root: PathBuf },
}

impl From<std::io::Error> for TransferError {
    fn from(err: std::io::Error) -> Self {
        TransferError::Io(err)
    }
}

impl From<RemoteError> for TransferError {
    fn from(err: RemoteError) -> Self {
        TransferError::Remote(err)
    }
}

impl From<RenderError> for TransferError {
    fn from(err: RenderError) -> Self {
        TransferError::Render(err)
    }
}

impl std::fmt::Display for TransferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferError::Io(err) => write!(f, "I/O error: {}", err),
            TransferError::CopyFailed {
                local,
                status,
                stderr,
            } => write!(
                f,
                "copy of {} failed (exit {:?}): {}",
                local.display(),
                status,
                stderr.trim()
            ),
            TransferError::NotAvailable(msg) => write!(f, "Not available: {}", msg),
            TransferError::Remote(err) => write!(f, "{}", err),
            TransferError::Render(err) => write!(f, "{}", err),
            TransferError::OutsideRoot { path, root } => write!(
                f,
                "{} is not inside sources root {}",
                path.display(),
                root.display()
            ),
        }
    }
}

impl std::error::Error for TransferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransferError::Io(err) => Some(err),
            TransferError::Remote(err) => Some(err),
            TransferError::Render(err) => Some(err),
            _ => None,
        }
    }
}

/// Single-file copy onto a node
///
/// Implementations:
/// - `ScpTransfer` - shells out to the system `scp` client
/// - in-memory fakes in tests
pub trait FileTransfer: Send + Sync {
    /// Copy `local` to `remote` on `host`, overwriting any existing file
    fn copy(&self, host: &str, local: &Path, remote: &str) -> Result<(), TransferError>;
}

impl<T: FileTransfer + ?Sized> FileTransfer for &T {
    fn copy(&self, host: &str, local: &Path, remote: &str) -> Result<(), TransferError> {
        (**self).copy(host, local, remote)
    }
}
