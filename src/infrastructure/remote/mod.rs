//! Remote Access
//!
//! Adapters for the remote shell and file transfer ports using the
//! operator's own OpenSSH tooling.

mod scp;
mod ssh;

pub use scp::ScpTransfer;
pub use ssh::SshShell;
