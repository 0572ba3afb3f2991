//! Warpbus Core - named wireless audio buses
//!
//! Nodes exchange multichannel audio by sharing a textual identifier instead
//! of a cable. Each [`WarpNode`] works out from its wiring whether it feeds a
//! bus ([`Role::Sink`]) or drains one ([`Role::Source`]); the
//! [`IdentRegistry`] makes sure every bus is summed exactly once per tick even
//! when several sources listen on the same name.
//!
//! # Core Abstractions
//!
//! - [`ChannelBuffer`] - Multichannel block buffer with accumulate/clear/reset
//! - [`VizBuffer`] - Fire-and-forget scope ring for UI feedback
//! - [`IdentRegistry`] - Sinks per identifier plus the "last source" owner
//! - [`WarpNode`] - Routing node and its role state machine
//! - [`WarpHost`] - Owns nodes, registry and transport; drives block and tick passes
//!
//! Capabilities are split into small traits: [`Nameable`], [`Routable`],
//! [`Tickable`].
//!
//! # Processing Model
//!
//! Per block, every node (in creation order) reconciles staged identifier
//! edits, infers its role from its wiring, delivers its cable output, and
//! either notes itself as its bus's source or clears stale audio. Per tick,
//! every source sums the sinks of its bus into its downstream target. Only the
//! source that noted itself last resets the sinks it read.
//!
//! # Example
//!
//! ```rust
//! use warpbus_core::{Role, Routable, WarpHost};
//!
//! let mut host = WarpHost::new(128);
//! let osc = host.add_module("osc").unwrap();
//! let send = host.add_node("send", "pads").unwrap();
//! let recv = host.add_node("recv", "pads").unwrap();
//! let out = host.add_module("out").unwrap();
//!
//! host.patch(osc, send).unwrap(); // patched into: becomes a sink
//! host.patch(recv, out).unwrap(); // patched out of: becomes a source
//! host.step();
//!
//! assert_eq!(host.node(send).unwrap().role(), Role::Sink);
//! assert_eq!(host.node(recv).unwrap().role(), Role::Source);
//! ```
//!
//! # Design Principles
//!
//! - **Infallible routing**: block and tick passes always reach a consistent state
//! - **Explicit context**: no process-wide statics; the registry is passed in
//! - **Checked handles**: back-references are [`NodeId`]s, resolved on use

pub mod arena;
pub mod buffer;
pub mod host;
pub mod node;
pub mod registry;
pub mod traits;
pub mod transport;
pub mod viz;

pub use arena::NodeArena;
pub use buffer::{ChannelBuffer, MAX_CHANNELS, accumulate};
pub use host::{HostError, WarpHost};
pub use node::{DEFAULT_IDENT, NodeId, Role, WarpNode};
pub use registry::IdentRegistry;
pub use traits::{Nameable, RouteContext, Routable, Tickable};
pub use transport::Transport;
pub use viz::{DEFAULT_VIZ_LEN, VizBuffer};
