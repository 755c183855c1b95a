//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the orchestration core.
//! Infrastructure layer provides concrete implementations.

pub mod file_transfer;
pub mod remote_shell;
pub mod secret_source;
pub mod template_renderer;
pub mod topology_repository;

pub use file_transfer::{FileTransfer, TransferError};
pub use remote_shell::{RemoteError, RemoteShell};
pub use secret_source::SecretSource;
pub use template_renderer::{RenderError, TemplateRenderer};
pub use topology_repository::TopologyRepository;
