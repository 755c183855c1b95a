//! Placeholder Template Renderer
//!
//! Implements the TemplateRenderer port with plain textual substitution:
//!
//! - `{{ .Key }}` / `{{.Key}}` is replaced by the value of `Key`
//! - `{{ .Outer.Inner }}` walks nested objects
//! - `{{ "literal" }}` emits `literal` unchanged, which is how templates
//!   keep docker's own `{{.Node.ID}}` placeholders intact
//!
//! Anything else between braces is copied through untouched. There is no
//! control flow; templates only ever need values.

use std::path::Path;

use serde_json::Value;

use crate::domain::ports::{RenderError, TemplateRenderer};

/// Renderer for `{{ .Key }}` placeholders
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRenderer;

impl PlaceholderRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render template text that was already read
    pub fn render_str(
        &self,
        template: &Path,
        text: &str,
        data: &Value,
    ) -> Result<String, RenderError> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];
            let Some(end) = find_close(after_open) else {
                // Unterminated action: keep the remainder verbatim
                out.push_str(&rest[start..]);
                return Ok(out);
            };

            let inner = after_open[..end].trim();
            match action_value(inner, data) {
                Action::Literal(s) => out.push_str(s),
                Action::Value(v) => out.push_str(&value_to_text(v)),
                Action::Missing(key) => {
                    return Err(RenderError::MissingKey {
                        template: template.to_path_buf(),
                        key: key.to_string(),
                    })
                }
                Action::Passthrough => out.push_str(&rest[start..start + 2 + end + 2]),
            }
            rest = &after_open[end + 2..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

/// Offset of the `}}` closing an action, skipping over a string literal
fn find_close(after_open: &str) -> Option<usize> {
    let leading = after_open.len() - after_open.trim_start().len();
    let body = &after_open[leading..];
    if let Some(literal) = body.strip_prefix('"') {
        if let Some(quote) = literal.find('"') {
            let after_literal = leading + 1 + quote + 1;
            return after_open[after_literal..]
                .find("}}")
                .map(|i| after_literal + i);
        }
    }
    after_open.find("}}")
}

enum Action<'a> {
    Literal(&'a str),
    Value(&'a Value),
    Missing(&'a str),
    Passthrough,
}

fn action_value<'a>(inner: &'a str, data: &'a Value) -> Action<'a> {
    if inner.len() >= 2 && inner.starts_with('"') && inner.ends_with('"') {
        return Action::Literal(&inner[1..inner.len() - 1]);
    }

    let Some(key) = inner.strip_prefix('.') else {
        return Action::Passthrough;
    };
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.') {
        return Action::Passthrough;
    }

    let mut current = data;
    for part in key.split('.') {
        match current.get(part) {
            Some(next) => current = next,
            None => return Action::Missing(key),
        }
    }
    Action::Value(current)
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

impl TemplateRenderer for PlaceholderRenderer {
    fn render(&self, template: &Path, data: &Value) -> Result<String, RenderError> {
        let text = std::fs::read_to_string(template).map_err(|e| RenderError::Unreadable {
            template: template.to_path_buf(),
            message: e.to_string(),
        })?;
        self.render_str(template, &text, data)
    }
}
