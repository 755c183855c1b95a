//! SecretSource port - where rollout credentials come from
//!
//! Asked only after every precondition has passed, so a rollout that
//! cannot start never prompts.

use crate::domain::value_objects::Secret;
use crate::error::SwarmformResult;

/// Supplies secrets on demand
///
/// Implementations:
/// - `TerminalSecrets` - environment first, then an interactive prompt
/// - fixed maps in tests
pub trait SecretSource {
    /// Return the value of `secret`
    ///
    /// Fails with `Precondition` when the value cannot be obtained.
    fn provide(&self, secret: Secret) -> SwarmformResult<String>;
}
