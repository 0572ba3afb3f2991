//! Run a patch headless and report node state.

use clap::Args;
use std::path::PathBuf;
use warpbus_core::{Nameable, Routable};

use super::common::{Session, format_peak};

#[derive(Args)]
pub struct RunArgs {
    /// Patch file (TOML, or JSON with a .json extension)
    #[arg(value_name = "PATCH")]
    patch: PathBuf,

    /// Number of block + tick steps to run
    #[arg(short, long, default_value = "16")]
    blocks: u64,
}

pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let mut session = Session::open(&args.patch)?;
    tracing::info!(
        blocks = args.blocks,
        generators = session.signals.generator_count(),
        "running patch"
    );

    for _ in 0..args.blocks {
        session.step();
    }

    let host = &session.host;
    println!(
        "Patch: {} ({} nodes, block size {}, {} steps)",
        session.patch.name,
        host.nodes().len(),
        host.block_size(),
        host.transport().ticks()
    );
    println!();
    println!(
        "  {:<16} {:<7} {:<12} {:>3} {:>10}",
        "NODE", "ROLE", "IDENT", "CH", "PEAK"
    );
    for (_, node) in host.nodes().iter() {
        let ident = if node.is_unrouted() { "-" } else { node.ident() };
        let state = if node.is_enabled() { "" } else { " (disabled)" };
        println!(
            "  {:<16} {:<7} {:<12} {:>3} {:>10}{}",
            node.name(),
            node.role().label(),
            ident,
            node.buffer().active_channels(),
            format_peak(node.buffer().peak()),
            state
        );
    }

    Ok(())
}
