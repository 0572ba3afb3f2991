//! Per-node patch entries and test signal descriptions.

use serde::{Deserialize, Serialize};
use warpbus_core::DEFAULT_IDENT;

/// How a patch entry is instantiated on the host.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A wireless node that routes by identifier.
    #[default]
    Warp,
    /// A plain module: passes audio along its cable only. Generators and
    /// outputs are modules.
    Module,
}

impl NodeKind {
    #[allow(clippy::trivially_copy_pass_by_ref)]
    fn is_warp(&self) -> bool {
        *self == NodeKind::Warp
    }
}

/// A test generator written into a node's buffer before every block.
///
/// ```toml
/// [nodes.signal]
/// type = "sine"
/// frequency = 220.0
/// amplitude = 0.5
/// channels = 2
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignalConfig {
    /// Constant level on every channel.
    Dc {
        /// Sample value.
        level: f32,
        /// Number of active channels.
        #[serde(default = "default_channels")]
        channels: usize,
    },
    /// Sine wave, phase-continuous across blocks.
    Sine {
        /// Frequency in Hz.
        frequency: f32,
        /// Peak amplitude.
        #[serde(default = "default_amplitude")]
        amplitude: f32,
        /// Number of active channels.
        #[serde(default = "default_channels")]
        channels: usize,
    },
}

fn default_channels() -> usize {
    1
}

fn default_amplitude() -> f32 {
    0.5
}

impl SignalConfig {
    /// Constant `level` on one channel.
    pub fn dc(level: f32) -> Self {
        SignalConfig::Dc {
            level,
            channels: default_channels(),
        }
    }

    /// Sine at `frequency` Hz with the default amplitude on one channel.
    pub fn sine(frequency: f32) -> Self {
        SignalConfig::Sine {
            frequency,
            amplitude: default_amplitude(),
            channels: default_channels(),
        }
    }

    /// Sets the channel count.
    pub fn with_channels(mut self, count: usize) -> Self {
        match &mut self {
            SignalConfig::Dc { channels, .. } | SignalConfig::Sine { channels, .. } => {
                *channels = count;
            }
        }
        self
    }

    /// Returns the channel count.
    pub fn channels(&self) -> usize {
        match self {
            SignalConfig::Dc { channels, .. } | SignalConfig::Sine { channels, .. } => *channels,
        }
    }
}

/// Configuration for a single node in a patch.
///
/// # Example
///
/// ```rust
/// use warpbus_config::{NodeConfig, NodeKind};
///
/// let send = NodeConfig::warp("send", "drums");
/// let out = NodeConfig::module("out");
///
/// assert_eq!(send.ident, "drums");
/// assert_eq!(out.kind, NodeKind::Module);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeConfig {
    /// Unique node name; targets refer to nodes by this name.
    pub name: String,

    /// Wireless node or plain module.
    #[serde(default, skip_serializing_if = "NodeKind::is_warp")]
    pub kind: NodeKind,

    /// Bus identifier. Ignored for modules.
    #[serde(default = "default_ident")]
    pub ident: String,

    /// Name of the node this one is patched into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Whether the node takes part in processing.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Optional test generator driving this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<SignalConfig>,
}

fn default_ident() -> String {
    DEFAULT_IDENT.to_string()
}

fn default_enabled() -> bool {
    true
}

impl NodeConfig {
    /// Create a wireless node entry listening on `ident`.
    pub fn warp(name: impl Into<String>, ident: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Warp,
            ident: ident.into(),
            target: None,
            enabled: true,
            signal: None,
        }
    }

    /// Create a plain module entry.
    pub fn module(name: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Module,
            ..Self::warp(name, "")
        }
    }

    /// Patch this node into the node named `target`.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set whether the node is enabled.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Attach a test generator.
    pub fn with_signal(mut self, signal: SignalConfig) -> Self {
        self.signal = Some(signal);
        self
    }

    /// The identifier the host should see: empty for modules.
    pub fn effective_ident(&self) -> &str {
        match self.kind {
            NodeKind::Warp => &self.ident,
            NodeKind::Module => "",
        }
    }
}
