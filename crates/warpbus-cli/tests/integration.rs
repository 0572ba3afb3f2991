//! Integration tests for the `warpbus` binary.
//!
//! Each test writes a patch into a temp dir and runs the built binary on it.

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use warpbus_config::{NodeConfig, PatchConfig, SignalConfig};

/// Helper to get the path to the `warpbus` binary built by cargo.
fn warpbus_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_warpbus"))
}

fn write_patch(dir: &Path, file: &str) -> PathBuf {
    let patch = PatchConfig::new("cli test")
        .with_block_size(16)
        .with_node(
            NodeConfig::module("osc")
                .with_target("send")
                .with_signal(SignalConfig::dc(0.5)),
        )
        .with_node(NodeConfig::warp("send", "drums"))
        .with_node(NodeConfig::warp("recv", "drums").with_target("out"))
        .with_node(NodeConfig::module("out"));
    let path = dir.join(file);
    patch.save(&path).unwrap();
    path
}

// ---------------------------------------------------------------------------
// `warpbus run`
// ---------------------------------------------------------------------------

#[test]
fn cli_run_reports_roles_and_levels() {
    let dir = TempDir::new().unwrap();
    let patch = write_patch(dir.path(), "patch.toml");

    let output = warpbus_bin()
        .args(["run", patch.to_str().unwrap(), "--blocks", "4"])
        .output()
        .expect("failed to run warpbus run");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("cli test"));
    assert!(stdout.contains("4 steps"));
    let line = |name: &str| {
        stdout
            .lines()
            .find(|l| l.trim_start().starts_with(name))
            .unwrap_or_else(|| panic!("no line for {name}:\n{stdout}"))
            .to_string()
    };
    assert!(line("send").contains("sink"));
    assert!(line("recv").contains("source"));
    // 0.5 on the output: about -6 dB.
    assert!(line("out").contains("-6.0 dB"), "{}", line("out"));
}

#[test]
fn cli_run_accepts_json_patches() {
    let dir = TempDir::new().unwrap();
    let patch = write_patch(dir.path(), "patch.json");

    let output = warpbus_bin()
        .args(["run", patch.to_str().unwrap(), "-b", "1"])
        .output()
        .expect("failed to run warpbus run");
    assert!(output.status.success());
}

#[test]
fn cli_run_missing_patch_fails() {
    let dir = TempDir::new().unwrap();
    let output = warpbus_bin()
        .args(["run", dir.path().join("absent.toml").to_str().unwrap()])
        .output()
        .expect("failed to run warpbus run");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("absent.toml"));
}

// ---------------------------------------------------------------------------
// `warpbus inspect`
// ---------------------------------------------------------------------------

#[test]
fn cli_inspect_lists_buses() {
    let dir = TempDir::new().unwrap();
    let patch = write_patch(dir.path(), "patch.toml");

    let output = warpbus_bin()
        .args(["inspect", patch.to_str().unwrap()])
        .output()
        .expect("failed to run warpbus inspect");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Bus 'drums'"));
    assert!(stdout.contains("sinks:  send"));
    assert!(stdout.contains("source: recv"));
}

// ---------------------------------------------------------------------------
// `warpbus render`
// ---------------------------------------------------------------------------

#[test]
fn cli_render_writes_wav() {
    let dir = TempDir::new().unwrap();
    let patch = write_patch(dir.path(), "patch.toml");
    let wav = dir.path().join("out.wav");

    let output = warpbus_bin()
        .args([
            "render",
            patch.to_str().unwrap(),
            "out",
            wav.to_str().unwrap(),
            "--blocks",
            "4",
        ])
        .output()
        .expect("failed to run warpbus render");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let reader = hound::WavReader::open(&wav).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 48000);
    let samples: Vec<f32> = reader.into_samples::<f32>().map(Result::unwrap).collect();
    assert_eq!(samples.len(), 64);
    // The first block settles roles; the bus carries audio from then on.
    assert!(samples[16..].iter().all(|&s| s == 0.5));
}

#[test]
fn cli_render_unknown_node_fails() {
    let dir = TempDir::new().unwrap();
    let patch = write_patch(dir.path(), "patch.toml");

    let output = warpbus_bin()
        .args([
            "render",
            patch.to_str().unwrap(),
            "nope",
            dir.path().join("x.wav").to_str().unwrap(),
        ])
        .output()
        .expect("failed to run warpbus render");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("node 'nope' not found"));
}
