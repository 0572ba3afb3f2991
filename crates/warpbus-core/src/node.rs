//! Routing nodes and their role state machine.
//!
//! A [`WarpNode`] never declares whether it feeds or drains a bus. It infers
//! its [`Role`] every block from its wiring:
//!
//! - something is patched *into* it → it is a [`Role::Sink`], feeding the bus
//!   named by its identifier;
//! - its own output was just patched to a live target → it is a
//!   [`Role::Source`], draining every sink of its identifier into that target
//!   once per tick;
//! - neither → [`Role::None`].
//!
//! Role flips always pass through `None`: the old registration is removed
//! before the new one is made.
//!
//! A node whose identifier is empty is unrouted. It never takes a role and
//! behaves like a plain module: whatever lands in its buffer is delivered over
//! its cable (if any) and then cleared.

use crate::buffer::ChannelBuffer;
use crate::traits::{Nameable, RouteContext, Routable, Tickable};
use crate::viz::VizBuffer;

/// Identifier a freshly created routing node listens on.
pub const DEFAULT_IDENT: &str = "default";

/// Handle to a node owned by the host.
///
/// Handles are assigned sequentially and never reused, so a stale handle can
/// be detected by looking it up rather than compared against freed memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }

    /// Rebuilds a handle from [`index()`](Self::index). Resolving it against a
    /// host that never issued it simply finds nothing.
    #[inline]
    pub fn from_index(index: u32) -> Self {
        Self(index)
    }
}

impl core::fmt::Display for NodeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// What a node currently does for its identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Role {
    /// Not routed.
    #[default]
    None,
    /// Feeds the bus; drained by sources.
    Sink,
    /// Drains the bus into its downstream target.
    Source,
}

impl Role {
    /// Returns a short lowercase label.
    pub const fn label(self) -> &'static str {
        match self {
            Role::None => "none",
            Role::Sink => "sink",
            Role::Source => "source",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// A node that routes audio by identifier instead of by cable.
#[derive(Debug, Clone)]
pub struct WarpNode {
    name: String,
    ident: String,
    ident_prev: String,
    /// Identifier edit waiting for the next block pass.
    pending_ident: Option<String>,
    role: Role,
    enabled: bool,
    buffer: ChannelBuffer,
    /// Per-tick sum of every sink on the bus (sources only).
    accum: ChannelBuffer,
    viz: VizBuffer,
    target: Option<NodeId>,
    cable_enabled: bool,
    /// Reverse edges: nodes whose target is this node.
    patchers: Vec<NodeId>,
    /// Set when the outbound connection changes; consumed by the block pass.
    repatched: bool,
}

impl WarpNode {
    /// Creates an enabled, unpatched node listening on `ident`.
    pub fn new(name: impl Into<String>, ident: impl Into<String>, block_size: usize) -> Self {
        let ident = ident.into();
        Self {
            name: name.into(),
            ident_prev: ident.clone(),
            ident,
            pending_ident: None,
            role: Role::None,
            enabled: true,
            buffer: ChannelBuffer::new(block_size),
            accum: ChannelBuffer::new(block_size),
            viz: VizBuffer::default(),
            target: None,
            cable_enabled: true,
            patchers: Vec::new(),
            repatched: false,
        }
    }

    /// Returns the identifier edit staged for the next block, if any.
    pub fn pending_ident(&self) -> Option<&str> {
        self.pending_ident.as_deref()
    }

    /// Returns true if the node takes part in routing and aggregation.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the node's local buffer.
    pub fn buffer(&self) -> &ChannelBuffer {
        &self.buffer
    }

    /// Returns the node's local buffer for writing (upstream delivery).
    pub fn buffer_mut(&mut self) -> &mut ChannelBuffer {
        &mut self.buffer
    }

    /// Returns the visualization ring.
    pub fn viz(&self) -> &VizBuffer {
        &self.viz
    }

    /// Returns the downstream target, if patched.
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// Returns the nodes currently patched into this one.
    pub fn patchers(&self) -> &[NodeId] {
        &self.patchers
    }

    /// Returns true if direct cable output is enabled.
    pub fn cable_enabled(&self) -> bool {
        self.cable_enabled
    }

    /// Returns true if the node carries no identifier.
    pub fn is_unrouted(&self) -> bool {
        self.ident.is_empty()
    }

    /// Returns the identifier committed before the current one.
    pub fn previous_ident(&self) -> &str {
        &self.ident_prev
    }

    pub(crate) fn stage_ident(&mut self, ident: String) {
        self.pending_ident = Some(ident);
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn set_target(&mut self, target: Option<NodeId>) {
        self.target = target;
        self.repatched = true;
    }

    pub(crate) fn add_patcher(&mut self, id: NodeId) {
        if !self.patchers.contains(&id) {
            self.patchers.push(id);
        }
    }

    pub(crate) fn remove_patcher(&mut self, id: NodeId) {
        self.patchers.retain(|&p| p != id);
    }

    /// Moves registry membership from the previous identifier to the current
    /// one. A sink stays a sink; a source gives up last-source status and
    /// re-claims it under the new name on its next note.
    fn migrate_ident(&mut self, cx: &mut RouteContext<'_>) {
        if self.ident == self.ident_prev {
            return;
        }
        let prev = core::mem::take(&mut self.ident_prev);
        let was_sink = self.role == Role::Sink;
        if was_sink {
            cx.registry.deregister_sink(cx.id, self, &prev);
        }
        cx.registry.clear_source_if_self(cx.id, &prev);
        if was_sink {
            let ident = self.ident.clone();
            cx.registry.register_sink(cx.id, self, &ident);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("ident: {} '{prev}' → '{}'", cx.id, self.ident);
        self.ident_prev.clone_from(&self.ident);
    }

    /// Leaves whatever role the node holds under its current identifier.
    fn drop_role(&mut self, cx: &mut RouteContext<'_>) {
        let ident = core::mem::take(&mut self.ident);
        match self.role {
            Role::Sink => {
                cx.registry.deregister_sink(cx.id, self, &ident);
            }
            Role::Source => {
                cx.registry.clear_source_if_self(cx.id, &ident);
            }
            Role::None => {}
        }
        self.ident = ident;
        self.set_role(Role::None);
        self.cable_enabled = true;
    }

    fn infer_role(&mut self, cx: &mut RouteContext<'_>) {
        let nodes = &*cx.nodes;
        let me = cx.id;
        self.patchers
            .retain(|&p| nodes.get(p).is_some_and(|n| n.target == Some(me)));
        if self.target.is_some_and(|t| !nodes.contains(t)) {
            self.target = None;
        }
        let fed = !self.patchers.is_empty();
        let target_live = self.target.is_some();
        let repatched = core::mem::take(&mut self.repatched);

        if self.ident.is_empty() {
            if self.role != Role::None {
                self.drop_role(cx);
            }
            return;
        }

        if !fed && !target_live {
            if self.role != Role::None {
                self.drop_role(cx);
                self.patchers.clear();
            }
            return;
        }

        // A source that lost its target falls back through None.
        if self.role == Role::Source && !target_live {
            self.drop_role(cx);
        }

        // A live outbound connection makes a source, whether it was just
        // patched or the node lost its role some other way (an unrouted
        // identifier in between, for one).
        if target_live && (repatched || self.role == Role::None) && self.role != Role::Source {
            if self.role == Role::Sink {
                let ident = core::mem::take(&mut self.ident);
                cx.registry.deregister_sink(cx.id, self, &ident);
                self.ident = ident;
            }
            self.set_role(Role::Source);
            self.cable_enabled = true;
        }

        if fed && self.role == Role::None {
            let ident = core::mem::take(&mut self.ident);
            cx.registry.register_sink(cx.id, self, &ident);
            self.ident = ident;
        }
    }

    /// Delivers the local buffer over the direct cable, then empties it.
    /// A disabled target receives nothing.
    fn deliver_cable(&mut self, cx: &mut RouteContext<'_>) {
        if self.role == Role::Sink || !self.cable_enabled {
            return;
        }
        let Some(dst) = self.target.and_then(|t| cx.nodes.get_mut(t)) else {
            return;
        };
        if dst.enabled {
            dst.buffer.accumulate_from(&self.buffer);
        }
        self.buffer.clear();
    }

    /// True if the bus has a last source that will drain (and reset) it.
    fn bus_is_drained(&self, cx: &RouteContext<'_>) -> bool {
        cx.registry
            .last_source(&self.ident)
            .and_then(|id| cx.nodes.get(id))
            .is_some_and(|src| {
                src.enabled && src.target.is_some_and(|t| cx.nodes.contains(t))
            })
    }
}

impl Nameable for WarpNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl Routable for WarpNode {
    fn ident(&self) -> &str {
        &self.ident
    }

    fn role(&self) -> Role {
        self.role
    }

    fn set_role(&mut self, role: Role) {
        #[cfg(feature = "tracing")]
        tracing::debug!("role: '{}' {} → {}", self.name, self.role, role);
        self.role = role;
    }

    fn set_cable_enabled(&mut self, enabled: bool) {
        self.cable_enabled = enabled;
    }
}

impl Tickable for WarpNode {
    fn process_block(&mut self, cx: &mut RouteContext<'_>) {
        // Nobody drains a disabled node; upstream cables must not pile up.
        if !self.enabled {
            self.buffer.clear();
            return;
        }
        if let Some(ident) = self.pending_ident.take() {
            self.ident = ident;
        }
        self.migrate_ident(cx);
        self.infer_role(cx);
        self.deliver_cable(cx);

        match self.role {
            Role::Sink => {
                // A sink has no visible cable; the scope is its only feedback.
                for ch in 0..self.buffer.active_channels() {
                    self.viz.write_chunk(self.buffer.channel(ch), ch);
                }
                if !self.bus_is_drained(cx) {
                    self.buffer.clear();
                }
            }
            Role::Source => cx.registry.note_source(cx.id, &self.ident),
            Role::None => {
                if !self.bus_is_drained(cx) {
                    self.buffer.clear();
                }
            }
        }
    }

    fn on_tick(&mut self, cx: &mut RouteContext<'_>) {
        if self.role != Role::Source || !self.enabled {
            return;
        }
        let Some(target) = self.target.filter(|&t| cx.nodes.contains(t)) else {
            return;
        };
        let drains = cx.registry.last_source(&self.ident) == Some(cx.id);

        self.accum.set_active_channels(1);
        for &sink_id in cx.registry.sinks_for(&self.ident) {
            let Some(sink) = cx.nodes.get_mut(sink_id) else {
                continue;
            };
            if !sink.enabled {
                continue;
            }
            self.accum.accumulate_from(&sink.buffer);
            if drains {
                sink.buffer.reset();
            }
        }

        for ch in 0..self.accum.active_channels() {
            self.viz.write_chunk(self.accum.channel(ch), ch);
        }
        if let Some(dst) = cx.nodes.get_mut(target) {
            dst.buffer.accumulate_from(&self.accum);
        }
        self.accum.clear();
    }
}
