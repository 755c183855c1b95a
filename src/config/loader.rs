//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{SwarmformError, SwarmformResult};

use super::types::Config;

/// Default descriptor file name inside the working directory
pub const CONFIG_FILE_NAME: &str = "swarmform.yml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> SwarmformResult<(Config, Vec<ConfigWarning>)> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SwarmformError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = serde_yaml_ng::Deserializer::from_str(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| SwarmformError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                line: find_line_number(&content, &key),
                key,
                file: path.to_path_buf(),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load `path` if it exists, otherwise fall back to defaults.
///
/// A missing file is only an error when the caller asked for it explicitly.
pub fn load_or_default(
    path: &Path,
    explicit: bool,
) -> SwarmformResult<(Config, Vec<ConfigWarning>)> {
    if !explicit && !path.exists() {
        tracing::debug!(path = %path.display(), "no descriptor file, using defaults");
        return Ok((with_env_overrides(Config::default()), Vec::new()));
    }
    let (config, warnings) = load_with_warnings(path)?;
    Ok((with_env_overrides(config), warnings))
}

/// Apply environment variable overrides (SWARMFORM_* prefix)
pub fn with_env_overrides(mut config: Config) -> Config {
    // SWARMFORM_ACME_ENABLED
    if let Some(val) = env_flag("SWARMFORM_ACME_ENABLED") {
        config.cluster.acme_enabled = val;
    }

    // SWARMFORM_ENCRYPT_NETWORKS
    if let Some(val) = env_flag("SWARMFORM_ENCRYPT_NETWORKS") {
        config.cluster.encrypt_networks = val;
    }

    // SWARMFORM_SOURCES_DIR
    if let Ok(dir) = std::env::var("SWARMFORM_SOURCES_DIR") {
        if !dir.is_empty() {
            config.orchestrator.sources_dir = PathBuf::from(dir);
        }
    }

    // SWARMFORM_PROBE_INTERVAL_SECS
    if let Ok(secs) = std::env::var("SWARMFORM_PROBE_INTERVAL_SECS") {
        match secs.trim().parse::<u64>() {
            Ok(secs) => config.orchestrator.probe_interval_secs = secs,
            Err(_) => tracing::warn!(
                value = %secs,
                "ignoring invalid SWARMFORM_PROBE_INTERVAL_SECS"
            ),
        }
    }

    // SWARMFORM_SSH_USER
    if let Ok(user) = std::env::var("SWARMFORM_SSH_USER") {
        if !user.is_empty() {
            config.ssh.user = Some(user);
        }
    }

    config
}

fn env_flag(name: &str) -> Option<bool> {
    let val = std::env::var(name).ok()?;
    Some(parse_flag(&val))
}

fn parse_flag(val: &str) -> bool {
    !matches!(val.trim().to_lowercase().as_str(), "" | "0" | "false" | "no" | "off")
}

fn find_line_number(content: &str, key: &str) -> Option<usize> {
    let needle = format!("{}:", key);
    content
        .lines()
        .position(|line| line.trim_start().starts_with(&needle))
        .map(|idx| idx + 1)
}
