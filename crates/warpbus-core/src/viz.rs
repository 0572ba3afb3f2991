//! Visualization ring buffer.
//!
//! [`VizBuffer`] keeps the most recent samples of each channel for UI
//! feedback (scopes, meters). Writes are fire-and-forget: no backpressure, no
//! errors, out-of-range channels are dropped. Channel storage is allocated on
//! first write and reused afterwards.

use crate::buffer::MAX_CHANNELS;

/// Default ring length per channel, in samples.
pub const DEFAULT_VIZ_LEN: usize = 2048;

/// Fixed-length per-channel ring of recent samples.
#[derive(Debug, Clone)]
pub struct VizBuffer {
    rings: Vec<Vec<f32>>,
    write_pos: Vec<usize>,
    len: usize,
}

impl VizBuffer {
    /// Creates an empty ring holding `len` samples per channel.
    pub fn new(len: usize) -> Self {
        Self {
            rings: Vec::new(),
            write_pos: Vec::new(),
            len: len.max(1),
        }
    }

    /// Returns the ring length per channel.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: a ring holds at least one sample per channel.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the number of channels that have received at least one write.
    pub fn channel_count(&self) -> usize {
        self.rings.len()
    }

    /// Appends a chunk of samples to `channel`'s ring, overwriting the oldest.
    pub fn write_chunk(&mut self, samples: &[f32], channel: usize) {
        if channel >= MAX_CHANNELS {
            return;
        }
        while self.rings.len() <= channel {
            self.rings.push(vec![0.0; self.len]);
            self.write_pos.push(0);
        }
        let ring = &mut self.rings[channel];
        let pos = &mut self.write_pos[channel];
        // Only the tail of an oversized chunk survives anyway.
        let skip = samples.len().saturating_sub(self.len);
        for &s in &samples[skip..] {
            ring[*pos] = s;
            *pos = (*pos + 1) % self.len;
        }
    }

    /// Returns the `count` most recent samples of `channel`, oldest first.
    ///
    /// Channels that were never written read as silence.
    pub fn latest(&self, channel: usize, count: usize) -> Vec<f32> {
        let count = count.min(self.len);
        let Some(ring) = self.rings.get(channel) else {
            return vec![0.0; count];
        };
        let end = self.write_pos[channel];
        (0..count)
            .map(|i| ring[(end + self.len - count + i) % self.len])
            .collect()
    }

    /// Silences every ring and rewinds the write positions.
    pub fn clear(&mut self) {
        for ring in &mut self.rings {
            ring.fill(0.0);
        }
        self.write_pos.fill(0);
    }
}

impl Default for VizBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_VIZ_LEN)
    }
}
