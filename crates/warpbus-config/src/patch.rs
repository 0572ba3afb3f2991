//! Patch file format and host instantiation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use warpbus_core::{Nameable, Routable, WarpHost};

use crate::error::ConfigError;
use crate::node_config::{NodeConfig, NodeKind};

/// A saved set of nodes, their identifiers and their cable targets.
///
/// Patches are stored as TOML (or JSON, chosen by file extension). Targets
/// refer to other nodes by name and are resolved when the patch is built.
///
/// # TOML Format
///
/// ```toml
/// name = "drum bus"
/// block_size = 256
///
/// [[nodes]]
/// name = "kick"
/// kind = "module"
/// target = "send"
/// [nodes.signal]
/// type = "dc"
/// level = 0.5
///
/// [[nodes]]
/// name = "send"
/// ident = "drums"
///
/// [[nodes]]
/// name = "recv"
/// ident = "drums"
/// target = "out"
///
/// [[nodes]]
/// name = "out"
/// kind = "module"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatchConfig {
    /// Name of the patch.
    pub name: String,

    /// Optional description of the patch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Samples per channel in every node buffer (defaults to 256).
    #[serde(default = "default_block_size")]
    pub block_size: usize,

    /// Sample rate used by test generators and rendering (defaults to 48000).
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Nodes, in creation order.
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

fn default_block_size() -> usize {
    256
}

fn default_sample_rate() -> u32 {
    48000
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

impl PatchConfig {
    /// Create a new empty patch.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            block_size: default_block_size(),
            sample_rate: default_sample_rate(),
            nodes: Vec::new(),
        }
    }

    /// Create a patch with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the block size.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Set the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Add a node to the patch.
    pub fn with_node(mut self, node: NodeConfig) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add multiple nodes to the patch.
    pub fn with_nodes(mut self, nodes: impl IntoIterator<Item = NodeConfig>) -> Self {
        self.nodes.extend(nodes);
        self
    }

    /// Get a node entry by name.
    pub fn get(&self, name: &str) -> Option<&NodeConfig> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Get the number of nodes in the patch.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the patch is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Load a patch from a file. `.json` files are read as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        if is_json(path) {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    /// Load a patch from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load a patch from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json_str).map_err(ConfigError::JsonParse)
    }

    /// Save the patch, choosing the format from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = if is_json(path) {
            self.to_json()?
        } else {
            self.to_toml()?
        };
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::debug!(path = %path.display(), nodes = self.nodes.len(), "patch saved");
        Ok(())
    }

    /// Convert the patch to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Convert the patch to a pretty-printed JSON string.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::JsonSerialize)
    }

    /// Check that the patch has nodes and that no two share a name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nodes.is_empty() {
            return Err(ConfigError::EmptyPatch(self.name.clone()));
        }
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.name.as_str()) {
                return Err(ConfigError::DuplicateNode(node.name.clone()));
            }
        }
        Ok(())
    }

    /// Instantiate a host from this patch.
    ///
    /// Nodes are created in file order with their identifiers, then targets
    /// are resolved by name. An unknown target is logged and left unpatched.
    /// Nothing is processed yet: roles settle on the first block.
    pub fn build(&self) -> Result<WarpHost, ConfigError> {
        self.validate()?;
        let mut host = WarpHost::new(self.block_size);

        let mut ids = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let id = host.add_node(node.name.as_str(), node.effective_ident())?;
            if !node.enabled {
                host.set_enabled(id, false)?;
            }
            ids.push(id);
        }

        for (node, &id) in self.nodes.iter().zip(&ids) {
            let Some(target) = node.target.as_deref() else {
                continue;
            };
            match host.find_node(target) {
                Some(to) => host.patch(id, to)?,
                None => tracing::warn!(
                    node = %node.name,
                    missing = target,
                    "unknown target, leaving node unpatched"
                ),
            }
        }

        tracing::info!(
            patch = %self.name,
            nodes = ids.len(),
            block_size = self.block_size,
            "patch built"
        );
        Ok(host)
    }

    /// Describe a running host as a patch.
    ///
    /// Staged identifier edits are captured as if already applied. Signals
    /// live outside the host and are not captured.
    pub fn capture(name: impl Into<String>, host: &WarpHost) -> Self {
        let nodes = host
            .nodes()
            .iter()
            .map(|(_, node)| {
                let ident = node.pending_ident().unwrap_or(node.ident());
                let kind = if ident.is_empty() {
                    NodeKind::Module
                } else {
                    NodeKind::Warp
                };
                NodeConfig {
                    name: node.name().to_string(),
                    kind,
                    ident: ident.to_string(),
                    target: node
                        .target()
                        .and_then(|t| host.node(t))
                        .map(|t| t.name().to_string()),
                    enabled: node.is_enabled(),
                    signal: None,
                }
            })
            .collect();

        Self {
            nodes,
            block_size: host.block_size(),
            ..Self::new(name)
        }
    }
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
