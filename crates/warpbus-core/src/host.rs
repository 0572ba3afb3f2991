//! Host: owns the nodes, the registry and the transport, and drives them.
//!
//! [`WarpHost`] is the single serialized context in which routing state
//! changes. Structural edits (add, remove, patch, rename) happen between
//! passes; identifier edits are staged and only take effect inside the next
//! [`process_block()`](WarpHost::process_block).
//!
//! One processing step is:
//!
//! 1. [`process_block()`](WarpHost::process_block): every live node, in
//!    creation order, reconciles its identifier, infers its role and delivers
//!    its cable output.
//! 2. [`tick()`](WarpHost::tick): every tick listener, in registration order,
//!    runs its transport poll; sources aggregate their buses here.
//!
//! ```rust
//! use warpbus_core::WarpHost;
//!
//! let mut host = WarpHost::new(64);
//! let send = host.add_node("send", "drums").unwrap();
//! let recv = host.add_node("recv", "drums").unwrap();
//! let osc = host.add_module("osc").unwrap();
//! let out = host.add_module("out").unwrap();
//! host.patch(osc, send).unwrap();
//! host.patch(recv, out).unwrap();
//!
//! host.process_block();
//! host.buffer_mut(send).unwrap().channel_mut(0).fill(0.5);
//! host.tick();
//!
//! assert_eq!(host.node(out).unwrap().buffer().channel(0)[0], 0.5);
//! ```

use crate::arena::NodeArena;
use crate::buffer::ChannelBuffer;
use crate::node::{NodeId, WarpNode};
use crate::registry::IdentRegistry;
use crate::traits::{Nameable, RouteContext, Routable, Tickable};
use crate::transport::Transport;

/// Errors from structural host operations.
///
/// Routing itself never fails; these only cover edits that name nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The handle does not refer to a live node.
    NodeNotFound(NodeId),
    /// A node cannot be patched into itself.
    SelfPatch(NodeId),
    /// Another live node already has this name.
    DuplicateName(String),
}

impl core::fmt::Display for HostError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "node {id} not found"),
            Self::SelfPatch(id) => write!(f, "node {id} cannot be patched into itself"),
            Self::DuplicateName(name) => write!(f, "a node named '{name}' already exists"),
        }
    }
}

impl std::error::Error for HostError {}

/// Owner and driver of a set of routing nodes.
#[derive(Debug)]
pub struct WarpHost {
    nodes: NodeArena,
    registry: IdentRegistry,
    transport: Transport,
    block_size: usize,
}

impl WarpHost {
    /// Creates an empty host whose nodes carry `block_size` samples per channel.
    pub fn new(block_size: usize) -> Self {
        Self {
            nodes: NodeArena::new(),
            registry: IdentRegistry::new(),
            transport: Transport::new(),
            block_size,
        }
    }

    /// Returns the samples per channel of every node buffer.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    // --- Node lifecycle ---

    /// Adds a routing node listening on `ident` and subscribes it to ticks.
    ///
    /// Names must be unique among live nodes; an empty name is never checked.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        ident: impl Into<String>,
    ) -> Result<NodeId, HostError> {
        let name = name.into();
        if !name.is_empty() && self.nodes.find_by_name(&name).is_some() {
            return Err(HostError::DuplicateName(name));
        }
        let id = self
            .nodes
            .insert(WarpNode::new(name, ident, self.block_size));
        self.transport.register(id);
        #[cfg(feature = "tracing")]
        tracing::debug!("host_add: node {id}");
        Ok(id)
    }

    /// Adds an unrouted node: a plain module that only passes audio along its
    /// cable. Generators and outputs are modelled this way.
    pub fn add_module(&mut self, name: impl Into<String>) -> Result<NodeId, HostError> {
        self.add_node(name, "")
    }

    /// Removes a node, deregistering it from every structure it takes part in.
    ///
    /// Nodes that were patched into it lose their target; the node it was
    /// patched into forgets it as a patcher.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), HostError> {
        let mut node = self.nodes.remove(id).ok_or(HostError::NodeNotFound(id))?;

        let ident = node.ident().to_owned();
        let prev = node.previous_ident().to_owned();
        for name in [ident.as_str(), prev.as_str()] {
            self.registry.deregister_sink(id, &mut node, name);
            self.registry.clear_source_if_self(id, name);
        }
        self.transport.deregister(id);

        if let Some(dst) = node.target().and_then(|t| self.nodes.get_mut(t)) {
            dst.remove_patcher(id);
        }
        for &nid in node.patchers() {
            if let Some(n) = self.nodes.get_mut(nid)
                && n.target() == Some(id)
            {
                n.set_target(None);
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("host_remove: node {id}");
        Ok(())
    }

    /// Finds a live node by name.
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.nodes.find_by_name(name)
    }

    /// Returns the node behind `id`.
    pub fn node(&self, id: NodeId) -> Option<&WarpNode> {
        self.nodes.get(id)
    }

    /// Returns the node behind `id` for writing.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut WarpNode> {
        self.nodes.get_mut(id)
    }

    /// Returns a node's local buffer for upstream delivery.
    pub fn buffer_mut(&mut self, id: NodeId) -> Option<&mut ChannelBuffer> {
        self.nodes.get_mut(id).map(WarpNode::buffer_mut)
    }

    /// Returns every live node.
    pub fn nodes(&self) -> &NodeArena {
        &self.nodes
    }

    /// Returns the identifier registry.
    pub fn registry(&self) -> &IdentRegistry {
        &self.registry
    }

    /// Returns the transport.
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    // --- Wiring ---

    /// Points `from`'s output at `to`, replacing any previous target.
    ///
    /// Keeps the reverse patcher index in step and raises `from`'s repatched
    /// notification, consumed by its next block pass.
    pub fn patch(&mut self, from: NodeId, to: NodeId) -> Result<(), HostError> {
        if from == to {
            return Err(HostError::SelfPatch(from));
        }
        if !self.nodes.contains(to) {
            return Err(HostError::NodeNotFound(to));
        }
        let old = self
            .nodes
            .get(from)
            .ok_or(HostError::NodeNotFound(from))?
            .target();
        if let Some(dst) = old.and_then(|t| self.nodes.get_mut(t)) {
            dst.remove_patcher(from);
        }
        if let Some(src) = self.nodes.get_mut(from) {
            src.set_target(Some(to));
        }
        if let Some(dst) = self.nodes.get_mut(to) {
            dst.add_patcher(from);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("host_patch: {from} → {to}");
        Ok(())
    }

    /// Disconnects `from`'s output.
    pub fn unpatch(&mut self, from: NodeId) -> Result<(), HostError> {
        let src = self.nodes.get_mut(from).ok_or(HostError::NodeNotFound(from))?;
        let old = src.target();
        src.set_target(None);
        if let Some(dst) = old.and_then(|t| self.nodes.get_mut(t)) {
            dst.remove_patcher(from);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("host_unpatch: {from}");
        Ok(())
    }

    // --- Control edits ---

    /// Stages a new identifier for `id`; it takes effect on the next block.
    pub fn set_ident(&mut self, id: NodeId, ident: impl Into<String>) -> Result<(), HostError> {
        let node = self.nodes.get_mut(id).ok_or(HostError::NodeNotFound(id))?;
        node.stage_ident(ident.into());
        Ok(())
    }

    /// Enables or disables a node.
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> Result<(), HostError> {
        let node = self.nodes.get_mut(id).ok_or(HostError::NodeNotFound(id))?;
        node.set_enabled(enabled);
        Ok(())
    }

    /// Renames a node.
    pub fn rename(&mut self, id: NodeId, name: impl Into<String>) -> Result<(), HostError> {
        let name = name.into();
        if let Some(other) = self.nodes.find_by_name(&name)
            && other != id
        {
            return Err(HostError::DuplicateName(name));
        }
        let node = self.nodes.get_mut(id).ok_or(HostError::NodeNotFound(id))?;
        node.set_name(name);
        Ok(())
    }

    // --- Processing ---

    /// Runs the per-block pass over every live node in creation order.
    pub fn process_block(&mut self) {
        for idx in 0..self.nodes.slot_count() {
            let id = NodeId(idx as u32);
            let Some(mut node) = self.nodes.take(id) else {
                continue;
            };
            let mut cx = RouteContext {
                id,
                registry: &mut self.registry,
                nodes: &mut self.nodes,
            };
            node.process_block(&mut cx);
            self.nodes.restore(id, node);
        }
        self.transport.advance_block();
    }

    /// Runs the transport poll over every tick listener in registration order.
    pub fn tick(&mut self) {
        for i in 0..self.transport.listeners().len() {
            let id = self.transport.listeners()[i];
            let Some(mut node) = self.nodes.take(id) else {
                continue;
            };
            let mut cx = RouteContext {
                id,
                registry: &mut self.registry,
                nodes: &mut self.nodes,
            };
            node.on_tick(&mut cx);
            self.nodes.restore(id, node);
        }
        self.transport.advance_tick();
    }

    /// One block pass followed by one tick.
    pub fn step(&mut self) {
        self.process_block();
        self.tick();
    }
}
