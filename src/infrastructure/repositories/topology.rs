//! YAML Topology Repository
//!
//! Implements the TopologyRepository port on top of `nodes.yml`, a YAML
//! sequence of nodes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::domain::entities::Node;
use crate::domain::ports::TopologyRepository;
use crate::error::{SwarmformError, SwarmformResult};

/// Default topology file name inside the working directory
pub const NODES_FILE_NAME: &str = "nodes.yml";

/// YAML-file topology repository
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlTopologyRepository;

impl YamlTopologyRepository {
    pub fn new() -> Self {
        Self
    }

    fn lock_path(path: &Path) -> PathBuf {
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| NODES_FILE_NAME.into());
        name.push(".lock");
        path.with_file_name(name)
    }

    fn parent_dir(path: &Path) -> &Path {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    fn write_to_disk(nodes: &[Node], path: &Path) -> SwarmformResult<()> {
        let yaml = serde_yaml_ng::to_string(nodes).map_err(|e| SwarmformError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        // Temp file in the same directory so the rename stays on one filesystem
        let mut tmp = NamedTempFile::new_in(Self::parent_dir(path))?;
        tmp.write_all(yaml.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| SwarmformError::Io(e.error))?;
        Ok(())
    }
}

impl TopologyRepository for YamlTopologyRepository {
    fn load(&self, path: &Path) -> SwarmformResult<Vec<Node>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SwarmformError::NotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        serde_yaml_ng::from_str(&content).map_err(|e| SwarmformError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn persist(&self, nodes: &[Node], path: &Path) -> SwarmformResult<()> {
        let lock_file = fs::File::create(Self::lock_path(path))?;
        lock_file.lock_exclusive()?;

        let result = Self::write_to_disk(nodes, path);

        let _ = lock_file.unlock();
        result
    }
}
