//! Property-based tests for warpbus-core routing invariants.
//!
//! Random register/deregister sequences against the registry, random wiring
//! edits against a host, and the bus sum property.

use proptest::prelude::*;
use warpbus_core::{IdentRegistry, NodeId, Role, Routable, WarpHost};

/// Minimal routable used to drive the registry directly.
#[derive(Clone)]
struct Stub {
    role: Role,
    cable: bool,
}

impl Routable for Stub {
    fn ident(&self) -> &str {
        ""
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

const IDENTS: [&str; 4] = ["", "a", "b", "c"];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// After any sequence of register/deregister calls, no sink list holds a
    /// duplicate, every member reports Role::Sink, and no list is empty.
    #[test]
    fn registry_lists_stay_consistent(
        ops in prop::collection::vec((0usize..6, 0usize..4, any::<bool>()), 0..200),
    ) {
        let mut reg = IdentRegistry::new();
        let mut stubs = vec![Stub { role: Role::None, cable: true }; 6];
        // Which identifier each stub is registered under, if any.
        let mut home: Vec<Option<&str>> = vec![None; 6];

        for (node, ident_idx, register) in ops {
            let id = NodeId::from_index(node as u32);
            let ident = IDENTS[ident_idx];
            if register {
                // One identifier per node: leave the old one first.
                if let Some(old) = home[node] {
                    reg.deregister_sink(id, &mut stubs[node], old);
                    home[node] = None;
                }
                if reg.register_sink(id, &mut stubs[node], ident) {
                    home[node] = Some(ident);
                }
            } else if reg.deregister_sink(id, &mut stubs[node], ident) {
                home[node] = None;
            }
        }

        for ident in IDENTS {
            let sinks = reg.sinks_for(ident);
            if reg.contains(ident) {
                prop_assert!(!sinks.is_empty(), "empty entry for '{}' persisted", ident);
            }
            for (i, a) in sinks.iter().enumerate() {
                prop_assert!(!sinks[i + 1..].contains(a), "duplicate {} in '{}'", a, ident);
                let stub = &stubs[a.index() as usize];
                prop_assert_eq!(stub.role, Role::Sink);
                prop_assert!(!stub.cable);
            }
        }
        prop_assert!(!reg.contains(""));
        for (node, stub) in stubs.iter().enumerate() {
            prop_assert_eq!(stub.role == Role::Sink, home[node].is_some());
        }
    }

    /// For N enabled sinks and one source, the target receives the elementwise
    /// sum of the sinks, sample for sample.
    #[test]
    fn source_output_is_elementwise_sum(
        blocks in prop::collection::vec(prop::collection::vec(-1.0f32..=1.0, 8), 1..6),
    ) {
        let mut host = WarpHost::new(8);
        let mut sinks = Vec::new();
        for (i, _) in blocks.iter().enumerate() {
            let feeder = host.add_module(format!("f{i}")).unwrap();
            let sink = host.add_node(format!("s{i}"), "sum").unwrap();
            host.patch(feeder, sink).unwrap();
            sinks.push(sink);
        }
        let source = host.add_node("src", "sum").unwrap();
        let out = host.add_module("out").unwrap();
        host.patch(source, out).unwrap();
        host.process_block();

        let mut expected = [0.0f32; 8];
        for (sink, samples) in sinks.iter().zip(blocks.iter()) {
            host.buffer_mut(*sink).unwrap().channel_mut(0).copy_from_slice(samples);
            for (e, s) in expected.iter_mut().zip(samples.iter()) {
                *e += *s;
            }
        }
        host.tick();

        let got = host.node(out).unwrap().buffer().channel(0);
        for (g, e) in got.iter().zip(expected.iter()) {
            prop_assert_eq!(g, e);
        }
        for sink in &sinks {
            prop_assert!(host.node(*sink).unwrap().buffer().is_silent());
        }
    }

    /// Random wiring and identifier edits never leave the registry pointing at
    /// a node whose role disagrees with it.
    #[test]
    fn host_edits_keep_roles_and_registry_in_step(
        edits in prop::collection::vec((0usize..5, 0usize..5, 0usize..4), 0..60),
    ) {
        let mut host = WarpHost::new(4);
        let ids: Vec<NodeId> = (0..5)
            .map(|i| host.add_node(format!("n{i}"), IDENTS[i % 4]).unwrap())
            .collect();

        for (a, b, kind) in edits {
            match kind {
                0 if a != b => host.patch(ids[a], ids[b]).unwrap(),
                1 => host.unpatch(ids[a]).unwrap(),
                2 => host.set_ident(ids[a], IDENTS[b % 4]).unwrap(),
                _ => host.step(),
            }
        }
        host.process_block();

        for ident in IDENTS {
            for &sink in host.registry().sinks_for(ident) {
                let node = host.node(sink).unwrap();
                prop_assert_eq!(node.role(), Role::Sink);
                prop_assert_eq!(node.ident(), ident);
            }
            if let Some(src) = host.registry().last_source(ident) {
                let node = host.node(src).unwrap();
                prop_assert_eq!(node.role(), Role::Source);
                prop_assert_eq!(node.ident(), ident);
            }
        }
        for (id, node) in host.nodes().iter() {
            if node.role() == Role::Sink {
                prop_assert!(host.registry().is_sink(id, node.ident()));
            }
        }
    }
}
