//! Shared helpers for CLI commands.

use anyhow::Context;
use std::path::Path;
use warpbus_config::PatchConfig;
use warpbus_core::WarpHost;

use crate::signal::SignalBank;

/// A patch loaded from disk, instantiated, with its generators bound.
pub struct Session {
    pub patch: PatchConfig,
    pub host: WarpHost,
    pub signals: SignalBank,
}

impl Session {
    /// Load and build the patch at `path`.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let patch = PatchConfig::load(path)
            .with_context(|| format!("loading patch {}", path.display()))?;
        let host = patch
            .build()
            .with_context(|| format!("building patch '{}'", patch.name))?;
        let signals = SignalBank::from_patch(&patch, &host);
        Ok(Self {
            patch,
            host,
            signals,
        })
    }

    /// Feed generators, then run one block pass and one tick.
    pub fn step(&mut self) {
        self.signals.write(&mut self.host);
        self.host.step();
    }
}

/// Convert linear amplitude to decibels, floored at -120 dB.
pub fn linear_to_db(linear: f32) -> f32 {
    20.0 * linear.max(1e-6).log10()
}

/// Format a peak level for tables.
pub fn format_peak(peak: f32) -> String {
    if peak <= 0.0 {
        "-inf".to_string()
    } else {
        format!("{:.1} dB", linear_to_db(peak))
    }
}
