//! RemotePath value object - a path on a cluster node
//!
//! Always uses `/` separators regardless of the local platform, and knows
//! how to quote itself for a POSIX shell.

use std::path::{Component, Path};

/// Path on a remote node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RemotePath(String);

impl RemotePath {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() && path.starts_with('/') {
            return Self("/".to_string());
        }
        Self(trimmed.to_string())
    }

    /// Append a local relative path, converting its separators
    pub fn join(&self, relative: &Path) -> Self {
        let mut joined = self.0.clone();
        for component in relative.components() {
            if let Component::Normal(part) = component {
                if !joined.is_empty() && !joined.ends_with('/') {
                    joined.push('/');
                }
                joined.push_str(&part.to_string_lossy());
            }
        }
        Self(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Single-quoted form safe to splice into a shell command
    pub fn quoted(&self) -> String {
        shell_quote(&self.0)
    }
}

impl std::fmt::Display for RemotePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Quote a string for safe use in POSIX shell commands
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}
