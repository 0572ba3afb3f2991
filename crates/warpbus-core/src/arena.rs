//! Slot storage for host-owned nodes.
//!
//! Nodes live in a `Vec` of optional slots indexed by [`NodeId`]. Ids are never
//! reused, so a handle to a removed node simply stops resolving.
//!
//! While the host drives a node it takes the node out of its slot so the node
//! can borrow every *other* node mutably. A taken slot still counts as live
//! for [`contains()`](NodeArena::contains) but does not resolve through
//! [`get()`](NodeArena::get).

use crate::node::{NodeId, WarpNode};
use crate::traits::Nameable;

/// Owning storage for every node in a host.
#[derive(Debug, Default)]
pub struct NodeArena {
    slots: Vec<Option<WarpNode>>,
    live: Vec<bool>,
}

impl NodeArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a node and returns its handle.
    pub fn insert(&mut self, node: WarpNode) -> NodeId {
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Some(node));
        self.live.push(true);
        id
    }

    /// Removes a node for good.
    pub fn remove(&mut self, id: NodeId) -> Option<WarpNode> {
        let idx = id.0 as usize;
        let node = self.slots.get_mut(idx)?.take()?;
        self.live[idx] = false;
        Some(node)
    }

    /// Takes a node out of its slot without releasing its handle.
    pub(crate) fn take(&mut self, id: NodeId) -> Option<WarpNode> {
        self.slots.get_mut(id.0 as usize)?.take()
    }

    /// Puts a node taken with [`take()`](Self::take) back.
    pub(crate) fn restore(&mut self, id: NodeId, node: WarpNode) {
        let idx = id.0 as usize;
        if self.live.get(idx).copied().unwrap_or(false) {
            self.slots[idx] = Some(node);
        }
    }

    /// Returns true if `id` refers to a node that has not been removed.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.live.get(id.0 as usize).copied().unwrap_or(false)
    }

    /// Returns the node behind `id`.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&WarpNode> {
        self.slots.get(id.0 as usize)?.as_ref()
    }

    /// Returns the node behind `id` for writing.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut WarpNode> {
        self.slots.get_mut(id.0 as usize)?.as_mut()
    }

    /// Returns the number of live nodes.
    pub fn len(&self) -> usize {
        self.live.iter().filter(|&&l| l).count()
    }

    /// Returns true if no node is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns one past the highest handle ever issued.
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Iterates over live nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &WarpNode)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|n| (NodeId(i as u32), n)))
    }

    /// Finds a node by name. The first match in creation order wins.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.iter().find(|(_, n)| n.name() == name).map(|(id, _)| id)
    }
}
