//! Print the buses of a patch after one settling block.

use clap::Args;
use std::collections::BTreeSet;
use std::path::PathBuf;
use warpbus_core::{Nameable, NodeId, WarpHost};

use super::common::Session;

#[derive(Args)]
pub struct InspectArgs {
    /// Patch file (TOML, or JSON with a .json extension)
    #[arg(value_name = "PATCH")]
    patch: PathBuf,
}

fn node_name(host: &WarpHost, id: NodeId) -> String {
    host.node(id)
        .map_or_else(|| id.to_string(), |n| n.name().to_string())
}

pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    let mut session = Session::open(&args.patch)?;
    session.host.process_block();

    let host = &session.host;
    let registry = host.registry();
    let idents: BTreeSet<&str> = registry
        .idents()
        .chain(registry.source_idents().map(|(ident, _)| ident))
        .collect();

    println!("Patch: {}", session.patch.name);
    if let Some(desc) = &session.patch.description {
        println!("  {desc}");
    }
    println!();

    if idents.is_empty() {
        println!("No active buses.");
        return Ok(());
    }

    for ident in idents {
        println!("Bus '{ident}'");
        let sinks: Vec<String> = registry
            .sinks_for(ident)
            .iter()
            .map(|&id| node_name(host, id))
            .collect();
        if sinks.is_empty() {
            println!("  sinks:  (none)");
        } else {
            println!("  sinks:  {}", sinks.join(", "));
        }
        match registry.last_source(ident) {
            Some(id) => println!("  source: {}", node_name(host, id)),
            None => println!("  source: (none)"),
        }
    }

    Ok(())
}
