//! Record one node's post-tick buffer to a WAV file.

use anyhow::Context;
use clap::Args;
use hound::{SampleFormat, WavSpec, WavWriter};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use super::common::{Session, format_peak};

#[derive(Args)]
pub struct RenderArgs {
    /// Patch file (TOML, or JSON with a .json extension)
    #[arg(value_name = "PATCH")]
    patch: PathBuf,

    /// Name of the node to record
    #[arg(value_name = "NODE")]
    node: String,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Number of block + tick steps to run
    #[arg(short, long, default_value = "64")]
    blocks: u64,

    /// Output bit depth (16, 24, or 32 for float)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    if !matches!(args.bit_depth, 16 | 24 | 32) {
        anyhow::bail!("unsupported bit depth {}; use 16, 24 or 32", args.bit_depth);
    }

    let mut session = Session::open(&args.patch)?;
    let id = session
        .host
        .find_node(&args.node)
        .with_context(|| format!("node '{}' not found in patch", args.node))?;

    let pb = ProgressBar::new(args.blocks);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} blocks ({eta})")?
            .progress_chars("##-"),
    );

    // One entry per block, one Vec per active channel.
    let mut blocks: Vec<Vec<Vec<f32>>> = Vec::with_capacity(args.blocks as usize);
    for _ in 0..args.blocks {
        session.step();
        let buffer = session
            .host
            .node(id)
            .context("recorded node disappeared")?
            .buffer();
        blocks.push(
            (0..buffer.active_channels())
                .map(|ch| buffer.channel(ch).to_vec())
                .collect(),
        );
        pb.inc(1);
    }
    pb.finish_with_message("done");

    let channels = blocks.iter().map(Vec::len).max().unwrap_or(1).max(1);
    let spec = WavSpec {
        channels: channels as u16,
        sample_rate: session.patch.sample_rate,
        bits_per_sample: args.bit_depth,
        sample_format: if args.bit_depth == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };

    let mut writer = WavWriter::create(&args.output, spec)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let max_val = (1i32 << (args.bit_depth.min(31) - 1)) as f32;
    let mut peak = 0.0f32;
    let mut frames = 0usize;
    for block in &blocks {
        let len = session.host.block_size();
        for i in 0..len {
            for ch in 0..channels {
                // Blocks with fewer channels are padded with silence.
                let sample = block.get(ch).map_or(0.0, |c| c[i]);
                peak = peak.max(sample.abs());
                if args.bit_depth == 32 {
                    writer.write_sample(sample)?;
                } else {
                    let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
                    writer.write_sample(int_sample)?;
                }
            }
            frames += 1;
        }
    }
    writer.finalize()?;

    println!(
        "Rendered '{}': {} frames, {} channel(s), {} Hz, peak {}",
        args.node,
        frames,
        channels,
        spec.sample_rate,
        format_peak(peak)
    );
    println!("Wrote {}", args.output.display());
    Ok(())
}
