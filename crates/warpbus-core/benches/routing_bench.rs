//! Criterion benchmarks for wireless bus routing (`warpbus-core`).
//!
//! Every sink is fed by an unrouted module so the block pass keeps them
//! registered; one source drains the bus into an unrouted output. Two axes:
//!
//! - **Step**: one block pass plus one tick at varying sink counts
//! - **Block sweep**: a fixed 8-sink bus across block sizes
//!
//! Run with: `cargo bench -p warpbus-core -- routing/`
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use warpbus_core::{NodeId, WarpHost};

const BLOCK_SIZE: usize = 256;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];
const SINK_COUNTS: &[usize] = &[1, 4, 16, 64];

// ---------------------------------------------------------------------------
// Host constructors
// ---------------------------------------------------------------------------

/// Builds a host with `sinks` feeders patched into sinks on one bus and a
/// single draining source. Returns the host and the sink handles.
fn make_bus(sinks: usize, block_size: usize) -> (WarpHost, Vec<NodeId>) {
    let mut host = WarpHost::new(block_size);
    let mut ids = Vec::with_capacity(sinks);
    for i in 0..sinks {
        let feeder = host.add_module(format!("feed{i}")).unwrap();
        let sink = host.add_node(format!("send{i}"), "bus").unwrap();
        host.patch(feeder, sink).unwrap();
        ids.push(sink);
    }
    let recv = host.add_node("recv", "bus").unwrap();
    let out = host.add_module("out").unwrap();
    host.patch(recv, out).unwrap();
    host.process_block();
    (host, ids)
}

fn fill(host: &mut WarpHost, sinks: &[NodeId]) {
    for &id in sinks {
        if let Some(buf) = host.buffer_mut(id) {
            buf.channel_mut(0).fill(0.25);
        }
    }
}

// ---------------------------------------------------------------------------
// Step benchmarks: fixed block size 256
// ---------------------------------------------------------------------------

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("routing/step");

    for &count in SINK_COUNTS {
        let (mut host, sinks) = make_bus(count, BLOCK_SIZE);
        group.bench_with_input(BenchmarkId::new("sinks", count), &count, |b, _| {
            b.iter(|| {
                host.process_block();
                fill(&mut host, &sinks);
                host.tick();
                black_box(host.transport().ticks());
            });
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Block size sweep: 8 sinks across all standard block sizes
// ---------------------------------------------------------------------------

fn bench_block_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("routing/block_sweep");

    for &block_size in BLOCK_SIZES {
        let (mut host, sinks) = make_bus(8, block_size);
        group.bench_with_input(
            BenchmarkId::new("sinks_8", block_size),
            &block_size,
            |b, _| {
                b.iter(|| {
                    host.process_block();
                    fill(&mut host, &sinks);
                    host.tick();
                    black_box(host.transport().ticks());
                });
            },
        );
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

criterion_group!(benches, bench_step, bench_block_sweep);
criterion_main!(benches);
