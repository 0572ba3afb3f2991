//! Warpbus CLI - run, inspect and render wireless bus patches.

mod commands;
mod signal;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "warpbus")]
#[command(author, version, about = "Warpbus wireless audio bus runner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a patch and print every node's final state
    Run(commands::run::RunArgs),

    /// Settle a patch for one block and print its buses
    Inspect(commands::inspect::InspectArgs),

    /// Run a patch and record one node's output to a WAV file
    Render(commands::render::RenderArgs),
}

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    // Logs go to stderr so command output stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Inspect(args) => commands::inspect::run(args),
        Commands::Render(args) => commands::render::run(args),
    }
}
