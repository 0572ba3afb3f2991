//! Multichannel sample buffers.
//!
//! A [`ChannelBuffer`] holds up to [`MAX_CHANNELS`] channels of `block_size`
//! samples each. Only the first [`active_channels()`](ChannelBuffer::active_channels)
//! channels carry signal; the rest stay allocated and silent so that growing
//! the channel count again never reallocates.
//!
//! Two ways to empty a buffer:
//!
//! - [`clear()`](ChannelBuffer::clear) zeroes every sample in place. The
//!   channel layout is kept.
//! - [`reset()`](ChannelBuffer::reset) hands the buffer back: samples are
//!   zeroed and the layout returns to a single active channel.

/// Upper bound on the number of channels a buffer can carry.
pub const MAX_CHANNELS: usize = 16;

/// Adds `src` into `dst` sample-by-sample.
///
/// Only the overlapping prefix of the two slices is touched.
#[inline]
pub fn accumulate(dst: &mut [f32], src: &[f32]) {
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d += *s;
    }
}

/// A block of multichannel audio.
#[derive(Debug, Clone)]
pub struct ChannelBuffer {
    channels: Vec<Vec<f32>>,
    active: usize,
    size: usize,
}

impl ChannelBuffer {
    /// Creates a silent single-channel buffer with `size` samples per channel.
    pub fn new(size: usize) -> Self {
        Self {
            channels: vec![vec![0.0; size]],
            active: 1,
            size,
        }
    }

    /// Returns the number of samples per channel.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of channels currently carrying signal.
    #[inline]
    pub fn active_channels(&self) -> usize {
        self.active
    }

    /// Sets the number of active channels, clamped to `1..=MAX_CHANNELS`.
    ///
    /// Channels that become inactive are zeroed, so re-activating them later
    /// yields silence rather than stale samples.
    pub fn set_active_channels(&mut self, count: usize) {
        let count = count.clamp(1, MAX_CHANNELS);
        while self.channels.len() < count {
            self.channels.push(vec![0.0; self.size]);
        }
        for ch in &mut self.channels[count..] {
            ch.fill(0.0);
        }
        self.active = count;
    }

    /// Grows the active channel count to at least `count`. Never shrinks.
    #[inline]
    pub fn grow_channels(&mut self, count: usize) {
        if count > self.active {
            self.set_active_channels(count);
        }
    }

    /// Returns the samples of channel `ch`.
    ///
    /// # Panics
    ///
    /// Panics if `ch >= active_channels()`.
    #[inline]
    pub fn channel(&self, ch: usize) -> &[f32] {
        assert!(ch < self.active, "channel {ch} is not active");
        &self.channels[ch]
    }

    /// Returns the samples of channel `ch` for writing.
    ///
    /// # Panics
    ///
    /// Panics if `ch >= active_channels()`.
    #[inline]
    pub fn channel_mut(&mut self, ch: usize) -> &mut [f32] {
        assert!(ch < self.active, "channel {ch} is not active");
        &mut self.channels[ch]
    }

    /// Zeroes every sample. The buffer remains valid with the same layout.
    pub fn clear(&mut self) {
        for ch in &mut self.channels[..self.active] {
            ch.fill(0.0);
        }
    }

    /// Zeroes every sample and returns to a single active channel.
    pub fn reset(&mut self) {
        self.clear();
        self.active = 1;
    }

    /// Adds another buffer into this one, growing the channel count to cover
    /// every channel of `other`.
    pub fn accumulate_from(&mut self, other: &ChannelBuffer) {
        self.grow_channels(other.active);
        for ch in 0..other.active {
            accumulate(&mut self.channels[ch], &other.channels[ch]);
        }
    }

    /// Returns the largest absolute sample across active channels.
    pub fn peak(&self) -> f32 {
        self.channels[..self.active]
            .iter()
            .flat_map(|ch| ch.iter())
            .fold(0.0_f32, |acc, s| acc.max(s.abs()))
    }

    /// Returns true if every active sample is exactly zero.
    pub fn is_silent(&self) -> bool {
        self.channels[..self.active]
            .iter()
            .all(|ch| ch.iter().all(|&s| s == 0.0))
    }
}
