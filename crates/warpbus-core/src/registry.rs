//! Identifier registry: who feeds and who drains each named bus.
//!
//! [`IdentRegistry`] maps an identifier to the ordered list of nodes
//! registered as sinks for it, and separately remembers the node most recently
//! confirmed as that identifier's source (the "last source"). Only the last
//! source resets sink buffers after reading them, so several sources can share
//! one bus without consuming it twice.
//!
//! The empty identifier means "unrouted" and never enters the registry: every
//! operation on `""` is a no-op that reports "not found".
//!
//! An identifier whose sink list empties is dropped from the sink table. The
//! last-source table is independent, so a source stays recognised for a bus
//! that currently has no sinks.

use std::collections::HashMap;

use crate::node::{NodeId, Role};
use crate::traits::Routable;

/// Sink lists and last-source ownership, keyed by identifier.
#[derive(Debug, Default)]
pub struct IdentRegistry {
    sinks: HashMap<String, Vec<NodeId>>,
    last_sources: HashMap<String, NodeId>,
}

impl IdentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the sinks registered under `ident`, in registration order.
    ///
    /// Unknown identifiers yield an empty slice; no entry is created.
    pub fn sinks_for(&self, ident: &str) -> &[NodeId] {
        self.sinks.get(ident).map_or(&[], Vec::as_slice)
    }

    /// Returns true if `ident` currently has at least one sink.
    pub fn contains(&self, ident: &str) -> bool {
        self.sinks.contains_key(ident)
    }

    /// Returns true if `id` is registered as a sink under `ident`.
    pub fn is_sink(&self, id: NodeId, ident: &str) -> bool {
        self.sinks_for(ident).contains(&id)
    }

    /// Iterates over identifiers that have sinks. Order is unspecified.
    pub fn idents(&self) -> impl Iterator<Item = &str> {
        self.sinks.keys().map(String::as_str)
    }

    /// Iterates over identifiers that have a recognised last source.
    pub fn source_idents(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.last_sources.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Registers `node` as a sink for `ident`.
    ///
    /// Sets the node's role to [`Role::Sink`] and disables its cable output.
    /// If the node held last-source status for `ident` it gives it up.
    /// Returns false if `ident` is empty or the node was already registered.
    pub fn register_sink(&mut self, id: NodeId, node: &mut impl Routable, ident: &str) -> bool {
        if ident.is_empty() {
            return false;
        }
        if let Some(list) = self.sinks.get_mut(ident) {
            if list.contains(&id) {
                return false;
            }
            list.push(id);
        } else {
            self.sinks.insert(ident.to_owned(), vec![id]);
        }
        self.clear_source_if_self(id, ident);
        node.set_role(Role::Sink);
        node.set_cable_enabled(false);
        #[cfg(feature = "tracing")]
        tracing::debug!("registry_sink_add: {id} → '{ident}'");
        true
    }

    /// Removes `node` from `ident`'s sinks.
    ///
    /// Resets the node's role to [`Role::None`] and re-enables its cable
    /// output. Drops the identifier once its sink list is empty. Returns false
    /// if the node was not registered.
    pub fn deregister_sink(&mut self, id: NodeId, node: &mut impl Routable, ident: &str) -> bool {
        let Some(list) = self.sinks.get_mut(ident) else {
            return false;
        };
        let Some(pos) = list.iter().position(|&n| n == id) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            self.sinks.remove(ident);
        }
        node.set_role(Role::None);
        node.set_cable_enabled(true);
        #[cfg(feature = "tracing")]
        tracing::debug!("registry_sink_remove: {id} ✕ '{ident}'");
        true
    }

    /// Records `id` as the last source for `ident`. Last writer wins.
    pub fn note_source(&mut self, id: NodeId, ident: &str) {
        if ident.is_empty() {
            return;
        }
        match self.last_sources.get_mut(ident) {
            Some(slot) => *slot = id,
            None => {
                self.last_sources.insert(ident.to_owned(), id);
            }
        }
    }

    /// Returns the recognised last source for `ident`, if any.
    pub fn last_source(&self, ident: &str) -> Option<NodeId> {
        self.last_sources.get(ident).copied()
    }

    /// Clears `ident`'s last source if it is `id`. Returns true if cleared.
    pub fn clear_source_if_self(&mut self, id: NodeId, ident: &str) -> bool {
        if self.last_source(ident) == Some(id) {
            self.last_sources.remove(ident);
            #[cfg(feature = "tracing")]
            tracing::debug!("registry_source_clear: {id} ✕ '{ident}'");
            true
        } else {
            false
        }
    }

    /// Returns true if neither table holds anything.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty() && self.last_sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub {
        ident: String,
        role: Role,
        cable: bool,
    }

    impl Stub {
        fn new(ident: &str) -> Self {
            Self {
                ident: ident.to_string(),
                role: Role::None,
                cable: true,
            }
        }
    }

    impl Routable for Stub {
        fn ident(&self) -> &str {
            &self.ident
        }
        fn role(&self) -> Role {
            self.role
        }
        fn set_role(&mut self, role: Role) {
            self.role = role;
        }
        fn set_cable_enabled(&mut self, enabled: bool) {
            self.cable = enabled;
        }
    }

    fn id(n: u32) -> NodeId {
        NodeId(n)
    }

    #[test]
    fn register_appends_in_order_without_duplicates() {
        let mut reg = IdentRegistry::new();
        let mut a = Stub::new("x");
        let mut b = Stub::new("x");

        assert!(reg.register_sink(id(0), &mut a, "x"));
        assert!(reg.register_sink(id(1), &mut b, "x"));
        assert!(!reg.register_sink(id(0), &mut a, "x"));

        assert_eq!(reg.sinks_for("x"), &[id(0), id(1)]);
        assert_eq!(a.role, Role::Sink);
        assert!(!a.cable, "sink cable output must be disabled");
    }

    #[test]
    fn deregister_restores_role_and_cable() {
        let mut reg = IdentRegistry::new();
        let mut a = Stub::new("x");
        reg.register_sink(id(0), &mut a, "x");

        assert!(reg.deregister_sink(id(0), &mut a, "x"));
        assert_eq!(a.role, Role::None);
        assert!(a.cable);
        assert!(!reg.deregister_sink(id(0), &mut a, "x"));
    }

    #[test]
    fn empty_sink_list_is_dropped() {
        let mut reg = IdentRegistry::new();
        let mut a = Stub::new("x");
        reg.register_sink(id(0), &mut a, "x");
        assert!(reg.contains("x"));

        reg.deregister_sink(id(0), &mut a, "x");
        assert!(!reg.contains("x"));
        assert!(reg.sinks_for("x").is_empty());
        assert!(reg.is_empty());
    }

    #[test]
    fn dropped_entry_is_recreated_on_next_registration() {
        let mut reg = IdentRegistry::new();
        let mut a = Stub::new("x");
        let mut b = Stub::new("x");
        reg.register_sink(id(0), &mut a, "x");
        reg.deregister_sink(id(0), &mut a, "x");

        assert!(reg.register_sink(id(1), &mut b, "x"));
        assert_eq!(reg.sinks_for("x"), &[id(1)]);
        assert!(!reg.register_sink(id(1), &mut b, "x"));
        assert_eq!(reg.sinks_for("x"), &[id(1)]);
    }

    #[test]
    fn sinks_for_does_not_materialise_entries() {
        let reg = IdentRegistry::new();
        assert!(reg.sinks_for("ghost").is_empty());
        assert!(!reg.contains("ghost"));
    }

    #[test]
    fn empty_identifier_is_a_no_op() {
        let mut reg = IdentRegistry::new();
        let mut a = Stub::new("");

        assert!(!reg.register_sink(id(0), &mut a, ""));
        assert_eq!(a.role, Role::None);
        reg.note_source(id(0), "");
        assert_eq!(reg.last_source(""), None);
        assert!(reg.is_empty());
    }

    #[test]
    fn note_source_last_writer_wins() {
        let mut reg = IdentRegistry::new();
        reg.note_source(id(3), "bus");
        reg.note_source(id(5), "bus");
        assert_eq!(reg.last_source("bus"), Some(id(5)));
    }

    #[test]
    fn clear_source_only_when_self() {
        let mut reg = IdentRegistry::new();
        reg.note_source(id(5), "bus");
        assert!(!reg.clear_source_if_self(id(3), "bus"));
        assert_eq!(reg.last_source("bus"), Some(id(5)));
        assert!(reg.clear_source_if_self(id(5), "bus"));
        assert_eq!(reg.last_source("bus"), None);
    }

    #[test]
    fn last_source_survives_without_sinks() {
        let mut reg = IdentRegistry::new();
        reg.note_source(id(1), "bus");
        assert!(!reg.contains("bus"));
        assert_eq!(reg.last_source("bus"), Some(id(1)));
    }

    #[test]
    fn registering_as_sink_relinquishes_last_source() {
        let mut reg = IdentRegistry::new();
        let mut a = Stub::new("x");
        reg.note_source(id(0), "x");
        reg.register_sink(id(0), &mut a, "x");
        assert_eq!(reg.last_source("x"), None);
    }

    #[test]
    fn identifiers_are_case_sensitive() {
        let mut reg = IdentRegistry::new();
        let mut a = Stub::new("Bus");
        reg.register_sink(id(0), &mut a, "Bus");
        assert!(reg.sinks_for("bus").is_empty());
        assert_eq!(reg.sinks_for("Bus"), &[id(0)]);
    }
}
