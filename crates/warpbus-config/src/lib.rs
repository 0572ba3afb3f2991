//! Patch files for warpbus.
//!
//! A patch names every node of a wireless routing setup, the bus identifier
//! each one listens on, and the node its cable output is patched into.
//! [`PatchConfig::build()`] turns a patch into a ready-to-run
//! [`WarpHost`](warpbus_core::WarpHost); [`PatchConfig::capture()`] goes the
//! other way.
//!
//! # Features
//!
//! - **Formats**: TOML by default, JSON for `.json` paths
//! - **Name resolution**: targets refer to nodes by name, resolved at build time
//! - **Test signals**: per-node DC or sine generators for headless runs
//!
//! # Example
//!
//! ```rust
//! use warpbus_config::{NodeConfig, PatchConfig, SignalConfig};
//!
//! let patch = PatchConfig::new("pads")
//!     .with_node(
//!         NodeConfig::module("osc")
//!             .with_target("send")
//!             .with_signal(SignalConfig::sine(220.0)),
//!     )
//!     .with_node(NodeConfig::warp("send", "pads"))
//!     .with_node(NodeConfig::warp("recv", "pads").with_target("out"))
//!     .with_node(NodeConfig::module("out"));
//!
//! let host = patch.build().unwrap();
//! assert_eq!(host.nodes().len(), 4);
//! ```

mod error;
mod node_config;
mod patch;

pub use error::ConfigError;
pub use node_config::{NodeConfig, NodeKind, SignalConfig};
pub use patch::PatchConfig;
