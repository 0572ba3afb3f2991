//! Transport tick listeners and counters.

use crate::node::NodeId;

/// Tracks which nodes receive the per-tick poll, and in what order.
///
/// Listeners are polled in registration order. Because the host also runs the
/// per-block pass in creation order, the source that noted itself last during
/// the block pass is also polled last, so its destructive reset of the sinks
/// lands after every other source has read them.
#[derive(Debug, Default, Clone)]
pub struct Transport {
    listeners: Vec<NodeId>,
    blocks: u64,
    ticks: u64,
}

impl Transport {
    /// Creates a transport with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id` to the end of the poll order. Returns false if already listening.
    pub fn register(&mut self, id: NodeId) -> bool {
        if self.listeners.contains(&id) {
            return false;
        }
        self.listeners.push(id);
        true
    }

    /// Removes `id` from the poll order. Returns false if it was not listening.
    pub fn deregister(&mut self, id: NodeId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|&l| l != id);
        self.listeners.len() != before
    }

    /// Returns the listeners in poll order.
    pub fn listeners(&self) -> &[NodeId] {
        &self.listeners
    }

    /// Returns the number of completed block passes.
    pub fn blocks(&self) -> u64 {
        self.blocks
    }

    /// Returns the number of completed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub(crate) fn advance_block(&mut self) {
        self.blocks += 1;
    }

    pub(crate) fn advance_tick(&mut self) {
        self.ticks += 1;
    }
}
