//! Configuration module for Swarmform
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (SWARMFORM_*)
//! 3. Descriptor file (`swarmform.yml` in the working directory)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{
    load_or_default, load_with_warnings, with_env_overrides, ConfigWarning, CONFIG_FILE_NAME,
};
pub use types::{
    ClusterDescriptor, Config, LoggingConfig, MonitoringConfig, OrchestratorConfig, ServiceVersions,
    SshConfig,
};
