//! Value Objects
//!
//! Immutable types without identity.

mod remote_path;
mod role;
mod secret;
mod service_flag;

pub use remote_path::{shell_quote, RemotePath};
pub use role::Role;
pub use secret::Secret;
pub use service_flag::ServiceFlag;
