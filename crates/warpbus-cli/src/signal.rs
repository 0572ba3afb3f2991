//! Test generators that feed patch nodes before every block.

use std::f32::consts::TAU;
use warpbus_config::{PatchConfig, SignalConfig};
use warpbus_core::{NodeId, WarpHost};

struct Generator {
    id: NodeId,
    signal: SignalConfig,
    /// Normalized phase in `0.0..1.0` (sine only).
    phase: f32,
}

/// Every generator declared by a patch, bound to its host node.
pub struct SignalBank {
    generators: Vec<Generator>,
    sample_rate: f32,
    scratch: Vec<f32>,
}

impl SignalBank {
    /// Binds each node's `signal` entry to the node of the same name in `host`.
    pub fn from_patch(patch: &PatchConfig, host: &WarpHost) -> Self {
        let generators = patch
            .nodes
            .iter()
            .filter_map(|node| {
                let signal = node.signal.clone()?;
                let id = host.find_node(&node.name)?;
                Some(Generator {
                    id,
                    signal,
                    phase: 0.0,
                })
            })
            .collect();
        Self {
            generators,
            sample_rate: patch.sample_rate as f32,
            scratch: vec![0.0; host.block_size()],
        }
    }

    /// Number of bound generators.
    pub fn generator_count(&self) -> usize {
        self.generators.len()
    }

    /// Overwrites every generator node's buffer with the next block.
    pub fn write(&mut self, host: &mut WarpHost) {
        for generator in &mut self.generators {
            let Some(buffer) = host.buffer_mut(generator.id) else {
                continue;
            };
            let channels = generator.signal.channels();
            buffer.set_active_channels(channels);

            match generator.signal {
                SignalConfig::Dc { level, .. } => self.scratch.fill(level),
                SignalConfig::Sine {
                    frequency,
                    amplitude,
                    ..
                } => {
                    let inc = frequency / self.sample_rate;
                    for sample in &mut self.scratch {
                        *sample = amplitude * (TAU * generator.phase).sin();
                        generator.phase = (generator.phase + inc).fract();
                    }
                }
            }

            for ch in 0..buffer.active_channels() {
                buffer.channel_mut(ch).copy_from_slice(&self.scratch);
            }
        }
    }
}
