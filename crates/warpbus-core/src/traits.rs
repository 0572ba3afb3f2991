//! Capability traits implemented by routing nodes.
//!
//! A node is driven through three narrow seams instead of one broad base type:
//!
//! - [`Nameable`]: the host's name lookup (patch files refer to nodes by name).
//! - [`Routable`]: what the [`IdentRegistry`](crate::IdentRegistry) needs to
//!   flip a node's role when it joins or leaves a bus.
//! - [`Tickable`]: the per-block pass and the per-tick transport poll.

use crate::node::{NodeId, Role};
use crate::registry::IdentRegistry;
use crate::arena::NodeArena;

/// Something the host can find by name.
pub trait Nameable {
    /// Returns the node's display name.
    fn name(&self) -> &str;

    /// Renames the node.
    fn set_name(&mut self, name: String);
}

/// Role bookkeeping the registry applies on sink registration changes.
pub trait Routable {
    /// Returns the committed identifier.
    fn ident(&self) -> &str;

    /// Returns the current role.
    fn role(&self) -> Role;

    /// Sets the current role.
    fn set_role(&mut self, role: Role);

    /// Enables or disables direct cable output.
    ///
    /// A sink is fed by its bus, so its cable must not also fire.
    fn set_cable_enabled(&mut self, enabled: bool);
}

/// Everything a node may touch while the host drives it.
///
/// The node being driven is taken out of the arena for the duration of the
/// call; looking up `id` in `nodes` yields `None`.
pub struct RouteContext<'a> {
    /// Handle of the node being driven.
    pub id: NodeId,
    /// The shared identifier registry.
    pub registry: &'a mut IdentRegistry,
    /// Every other node.
    pub nodes: &'a mut NodeArena,
}

/// Per-block and per-tick entry points.
pub trait Tickable {
    /// Per-block pass: reconcile identifier, infer role, deliver cable output.
    fn process_block(&mut self, cx: &mut RouteContext<'_>);

    /// Per-tick transport poll, after every node finished its block pass.
    fn on_tick(&mut self, cx: &mut RouteContext<'_>);
}
