//! Presentation Layer
//!
//! This layer handles:
//! - Creating use cases with infrastructure dependencies
//! - Collecting secrets from the environment or the terminal
//! - Output formatting
//!
//! ## Structure
//!
//! - `factory` - Creates use cases with proper dependencies (dependency injection)
//! - `secrets` - `SecretSource` backed by env vars and dialoguer prompts
//! - `output` - Text rendering of topology and rollout results
//!
//! ## Usage
//!
//! ```ignore
//! use swarmform::presentation::factory;
//!
//! let use_case = factory::create_rollout_use_case(&config);
//! let result = use_case.execute(&options, &config.cluster, &TerminalSecrets::new())?;
//! ```

pub mod factory;
pub mod output;
pub mod secrets;

pub use factory::{create_rollout_use_case, rollout_options};
pub use secrets::TerminalSecrets;
