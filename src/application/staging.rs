//! Config Staging
//!
//! Mirrors a subtree of the local sources directory onto one node.
//! Template files are rendered locally first; every transferred file is
//! then normalized (CR stripped, owner and mode set) with one privileged
//! command.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;

use crate::domain::entities::Node;
use crate::domain::ports::{FileTransfer, RemoteShell, TemplateRenderer, TransferError};
use crate::domain::value_objects::{shell_quote, RemotePath};
use crate::error::{SwarmformError, SwarmformResult};

/// Where files come from and how they land on a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingSettings {
    /// Local sources root; staged paths are relative to it
    pub sources_dir: PathBuf,
    /// Remote directory mirroring `sources_dir`
    pub remote_root: RemotePath,
    pub owner: String,
    pub mode: String,
}

/// One file placed on a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Path relative to the sources root
    pub relative: PathBuf,
    pub remote: RemotePath,
    pub rendered: bool,
}

/// Stages local trees through the transfer and shell ports
pub struct ConfigStager<'a> {
    transfer: &'a dyn FileTransfer,
    shell: &'a dyn RemoteShell,
    renderer: &'a dyn TemplateRenderer,
    settings: &'a StagingSettings,
}

impl<'a> ConfigStager<'a> {
    pub fn new(
        transfer: &'a dyn FileTransfer,
        shell: &'a dyn RemoteShell,
        renderer: &'a dyn TemplateRenderer,
        settings: &'a StagingSettings,
    ) -> Self {
        Self {
            transfer,
            shell,
            renderer,
            settings,
        }
    }

    /// Stage `local` (a file or directory) onto `node`
    ///
    /// `local` may be relative to the sources root or an absolute path
    /// inside it. `templates` holds the sources-relative paths that must
    /// be rendered with `data` instead of copied verbatim. Stops at the
    /// first failing file.
    pub fn stage(
        &self,
        local: &Path,
        node: &Node,
        templates: &BTreeSet<PathBuf>,
        data: &Value,
    ) -> SwarmformResult<Vec<StagedFile>> {
        let relative = self
            .relative_to_root(local)
            .map_err(|source| self.transfer_error(node, local, source))?;

        // A lone file still needs its remote directory
        if self.settings.sources_dir.join(&relative).is_file() {
            let parent = relative.parent().unwrap_or_else(|| Path::new(""));
            self.make_remote_dir(node, parent)
                .map_err(|source| self.transfer_error(node, &relative, source))?;
        }

        let mut staged = Vec::new();
        self.stage_entry(&relative, node, templates, data, &mut staged)?;
        Ok(staged)
    }

    fn relative_to_root(&self, local: &Path) -> Result<PathBuf, TransferError> {
        if local.is_relative() {
            return Ok(local.to_path_buf());
        }
        local
            .strip_prefix(&self.settings.sources_dir)
            .map(Path::to_path_buf)
            .map_err(|_| TransferError::OutsideRoot {
                path: local.to_path_buf(),
                root: self.settings.sources_dir.clone(),
            })
    }

    fn stage_entry(
        &self,
        relative: &Path,
        node: &Node,
        templates: &BTreeSet<PathBuf>,
        data: &Value,
        staged: &mut Vec<StagedFile>,
    ) -> SwarmformResult<()> {
        let local = self.settings.sources_dir.join(relative);
        let metadata =
            fs::metadata(&local).map_err(|e| self.transfer_error(node, relative, e.into()))?;

        if metadata.is_dir() {
            self.make_remote_dir(node, relative)
                .map_err(|source| self.transfer_error(node, relative, source))?;

            for child in sorted_children(&local)
                .map_err(|e| self.transfer_error(node, relative, e.into()))?
            {
                self.stage_entry(&relative.join(child), node, templates, data, staged)?;
            }
            return Ok(());
        }

        let file = self
            .stage_file(relative, &local, node, templates, data)
            .map_err(|source| self.transfer_error(node, relative, source))?;
        staged.push(file);
        Ok(())
    }

    fn make_remote_dir(&self, node: &Node, relative: &Path) -> Result<(), TransferError> {
        let remote_dir = self.settings.remote_root.join(relative);
        self.shell
            .exec(&node.host, &format!("mkdir -p {}", remote_dir.quoted()), false)?;
        Ok(())
    }

    fn stage_file(
        &self,
        relative: &Path,
        local: &Path,
        node: &Node,
        templates: &BTreeSet<PathBuf>,
        data: &Value,
    ) -> Result<StagedFile, TransferError> {
        let remote = self.settings.remote_root.join(relative);
        let rendered = templates.contains(relative);

        if rendered {
            let text = self.renderer.render(local, data)?;
            let mut tmp = NamedTempFile::new()?;
            tmp.write_all(text.as_bytes())?;
            tmp.flush()?;
            self.transfer.copy(&node.host, tmp.path(), remote.as_str())?;
        } else {
            self.transfer.copy(&node.host, local, remote.as_str())?;
        }

        tracing::debug!(
            node = %node.name,
            file = %relative.display(),
            rendered,
            "staged"
        );

        self.shell
            .exec(&node.host, &self.post_process_command(&remote), true)?;

        Ok(StagedFile {
            relative: relative.to_path_buf(),
            remote,
            rendered,
        })
    }

    /// Strip CR before LF, then set owner and mode
    fn post_process_command(&self, remote: &RemotePath) -> String {
        let path = remote.quoted();
        format!(
            "sed -i 's/\\r$//' {path} && chown {owner} {path} && chmod {mode} {path}",
            path = path,
            owner = shell_quote(&self.settings.owner),
            mode = shell_quote(&self.settings.mode),
        )
    }

    fn transfer_error(&self, node: &Node, path: &Path, source: TransferError) -> SwarmformError {
        SwarmformError::Transfer {
            host: node.host.clone(),
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Entry names of a directory, sorted so staging order is stable
fn sorted_children(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut names = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| PathBuf::from(e.file_name())))
        .collect::<std::io::Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}
