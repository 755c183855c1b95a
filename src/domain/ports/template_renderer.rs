//! Template Renderer Port
//!
//! Turns a configuration template plus a data object into text.

use std::path::{Path, PathBuf};

/// Template rendering errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Template file could not be read
    Unreadable { template: PathBuf, message: String },
    /// Template references a key the data object does not provide
    MissingKey { template: PathBuf, key: String },
    /// Data object failed validation before rendering
    InvalidData { contract: &'static str, message: String },
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unreadable { template, message } => {
                write!(f, "cannot read template {}: {}", template.display(), message)
            }
            Self::MissingKey { template, key } => write!(
                f,
                "template {} uses '{}' but no value was provided",
                template.display(),
                key
            ),
            Self::InvalidData { contract, message } => {
                write!(f, "invalid {} data: {}", contract, message)
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// Template rendering
pub trait TemplateRenderer: Send + Sync {
    /// Render the template at `template` with the fields of `data`
    fn render(&self, template: &Path, data: &serde_json::Value) -> Result<String, RenderError>;
}
