//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `remote/` - ssh command execution and scp file transfer
//! - `repositories/` - topology persistence
//! - `template` - placeholder template rendering

pub mod remote;
pub mod repositories;
pub mod template;

// Re-export for convenience
pub use remote::{ScpTransfer, SshShell};
pub use repositories::{YamlTopologyRepository, NODES_FILE_NAME};
pub use template::PlaceholderRenderer;
