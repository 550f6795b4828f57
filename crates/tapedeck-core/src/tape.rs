//! Multi-channel tape storage.
//!
//! A [`Tape`] stores one contiguous sample sequence per channel. Two modes:
//!
//! - **Unbounded**: channels grow on demand as recording moves forward.
//! - **Fixed capacity**: a sliding window of `capacity` samples over an
//!   implicit infinite timeline. Writes past the window end evict the oldest
//!   samples; writes before the window start evict the newest.
//!
//! Reads never fail. Anything outside the stored range reads as silence.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::TapeConfig;
use crate::layout::WindowLayout;
use crate::{Error, Result};

/// A tape shared between a recorder and any number of scrubbers.
pub type SharedTape = Arc<RwLock<Tape>>;

/// Sample ordering of playback output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleLayout {
    /// `[ch0 frames][ch1 frames]...`
    #[default]
    ChannelMajor,
    /// `[ch0 f0, ch1 f0, ch0 f1, ch1 f1, ...]`
    Interleaved,
}

/// Multi-channel sample store with record and random-access playback.
#[derive(Debug, Clone)]
pub struct Tape {
    channels: Vec<Vec<f32>>,
    frames_per_buffer: usize,
    sample_rate: u32,
    num_channels: usize,
    capacity: Option<usize>,
    record_position: usize,
    playback_position: usize,
}

impl Tape {
    /// Create a tape. With `capacity` set, every channel is pre-sized and
    /// zero-filled and never changes length.
    pub fn new(
        frames_per_buffer: usize,
        sample_rate: u32,
        num_channels: usize,
        capacity: Option<usize>,
    ) -> Self {
        let initial_len = capacity.unwrap_or(0);
        Self {
            channels: vec![vec![0.0; initial_len]; num_channels],
            frames_per_buffer,
            sample_rate,
            num_channels,
            capacity,
            record_position: 0,
            playback_position: 0,
        }
    }

    /// Create a tape from a validated config.
    pub fn from_config(config: &TapeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            config.frames_per_buffer,
            config.sample_rate,
            config.num_channels,
            config.capacity,
        ))
    }

    /// Create a fixed-capacity tape holding already decoded samples.
    ///
    /// Capacity equals the channel length and the record cursor is placed at
    /// the end of the data, so the whole content is inside the visible window.
    pub fn from_channels(
        frames_per_buffer: usize,
        sample_rate: u32,
        channels: Vec<Vec<f32>>,
    ) -> Result<Self> {
        let Some(first) = channels.first() else {
            return Err(Error::InvalidConfig("tape needs at least one channel".into()));
        };
        let len = first.len();
        if channels.iter().any(|ch| ch.len() != len) {
            return Err(Error::RaggedChannels);
        }

        Ok(Self {
            num_channels: channels.len(),
            channels,
            frames_per_buffer,
            sample_rate,
            capacity: Some(len),
            record_position: len,
            playback_position: 0,
        })
    }

    pub fn into_shared(self) -> SharedTape {
        Arc::new(RwLock::new(self))
    }

    /// Samples stored per channel.
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.len() as f32 / self.sample_rate as f32
    }

    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frames_per_buffer(&self) -> usize {
        self.frames_per_buffer
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn is_fixed(&self) -> bool {
        self.capacity.is_some()
    }

    /// Raw per-channel storage. For fixed tapes, index 0 is the oldest sample
    /// of the visible window, not timeline sample 0.
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn record_position(&self) -> usize {
        self.record_position
    }

    pub fn playback_position(&self) -> usize {
        self.playback_position
    }

    /// Move the record cursor. For fixed tapes this also moves the visible
    /// window, which is always derived from the record cursor.
    pub fn seek_record(&mut self, position: usize) {
        self.record_position = position;
    }

    pub fn seek_playback(&mut self, position: usize) {
        self.playback_position = position;
    }

    pub fn seconds_to_samples(&self, seconds: f32) -> usize {
        (seconds.max(0.0) * self.sample_rate as f32) as usize
    }

    /// Timeline range `[start, end)` currently addressable by reads.
    fn visible_range(&self) -> (usize, usize) {
        match self.capacity {
            None => (0, self.len()),
            Some(capacity) => {
                let start = self.record_position.saturating_sub(capacity);
                (start, start.saturating_add(capacity))
            }
        }
    }

    #[inline]
    fn read(samples: &[f32], global: usize, (start, end): (usize, usize)) -> f32 {
        if global < start || global >= end {
            return 0.0;
        }
        samples.get(global - start).copied().unwrap_or(0.0)
    }

    // =========================================================================
    // Recording
    // =========================================================================

    /// Record one block at the record cursor.
    pub fn record(&mut self, samples: &[f32]) {
        self.record_at(samples, self.record_position);
    }

    /// Record one block at a timeline offset in seconds.
    pub fn record_at_seconds(&mut self, samples: &[f32], seconds: f32) {
        let offset = self.seconds_to_samples(seconds);
        self.record_at(samples, offset);
    }

    /// Record one block of `frames_per_buffer` samples per channel,
    /// channel-major, at timeline `offset`.
    ///
    /// Missing input samples are written as zeros. The record cursor moves to
    /// the end of the block if that is further than its current position.
    ///
    /// On a fixed tape a block wider than the capacity keeps only its newest
    /// `capacity` samples. A write before the window start shifts the stored
    /// samples right, but the cursor does not retreat, so the window stays
    /// anchored to it and the block reads back just below the record cursor
    /// rather than at `offset`.
    pub fn record_at(&mut self, samples: &[f32], offset: usize) {
        let frames = self.frames_per_buffer;
        if frames == 0 || self.num_channels == 0 {
            return;
        }
        let write_end = offset.saturating_add(frames);

        // (first storage index written, leading block frames dropped)
        let (local_start, skip) = match self.capacity {
            None => {
                for ch in &mut self.channels {
                    if ch.len() < write_end {
                        ch.resize(write_end, 0.0);
                    }
                }
                (offset, 0)
            }
            Some(0) => return,
            Some(capacity) => {
                let window_start = self.record_position.saturating_sub(capacity);
                let window_end = window_start.saturating_add(capacity);

                if write_end > window_end {
                    let shift = write_end - window_end;
                    self.evict_oldest(shift);
                    let window_start = window_start + shift;
                    (
                        offset.saturating_sub(window_start),
                        window_start.saturating_sub(offset),
                    )
                } else if offset < window_start {
                    self.evict_newest(window_start - offset);
                    (0, 0)
                } else {
                    (offset - window_start, 0)
                }
            }
        };

        for (index, dst) in self.channels.iter_mut().enumerate() {
            let Some(dst) = dst.get_mut(local_start..) else {
                continue;
            };
            let dst_len = dst.len().min(frames - skip);
            let dst = &mut dst[..dst_len];

            let src_start = index * frames + skip;
            let src_end = (src_start + dst_len).min(samples.len());
            let src = samples.get(src_start..src_end).unwrap_or(&[]);
            let copied = src.len();
            dst[..copied].copy_from_slice(src);
            dst[copied..].fill(0.0);
        }

        if write_end > self.record_position {
            self.record_position = write_end;
        }
    }

    /// Shift every channel left by `shift`, zero-filling the tail.
    fn evict_oldest(&mut self, shift: usize) {
        for ch in &mut self.channels {
            let len = ch.len();
            if shift >= len {
                ch.fill(0.0);
            } else {
                ch.copy_within(shift.., 0);
                ch[len - shift..].fill(0.0);
            }
        }
        if shift >= self.capacity.unwrap_or(0) {
            tracing::trace!(shift, "tape window jumped past capacity, cleared");
        }
    }

    /// Shift every channel right by `shift`, zero-filling the head.
    fn evict_newest(&mut self, shift: usize) {
        for ch in &mut self.channels {
            let len = ch.len();
            if shift >= len {
                ch.fill(0.0);
            } else {
                ch.copy_within(..len - shift, shift);
                ch[..shift].fill(0.0);
            }
        }
    }

    // =========================================================================
    // Playback
    // =========================================================================

    /// Read `num_frames` per channel starting at timeline `offset`.
    pub fn playback(&self, num_frames: usize, offset: usize, layout: SampleLayout) -> Vec<f32> {
        if num_frames == 0 || self.num_channels == 0 {
            return Vec::new();
        }
        let mut out = vec![0.0; num_frames * self.num_channels];
        self.playback_into(&mut out, num_frames, offset, layout);
        out
    }

    /// Read one callback block at a timeline offset in seconds.
    pub fn playback_at_seconds(&self, seconds: f32, layout: SampleLayout) -> Vec<f32> {
        self.playback(
            self.frames_per_buffer,
            self.seconds_to_samples(seconds),
            layout,
        )
    }

    /// Read one callback block at the playback cursor and advance it.
    pub fn play_next(&mut self, layout: SampleLayout) -> Vec<f32> {
        let out = self.playback(self.frames_per_buffer, self.playback_position, layout);
        self.playback_position = self
            .playback_position
            .saturating_add(self.frames_per_buffer);
        out
    }

    /// Allocation-free playback into `out`.
    ///
    /// Reads `min(num_frames, out.len() / num_channels)` frames, which is also
    /// the channel stride for [`SampleLayout::ChannelMajor`]. Returns the
    /// number of frames written.
    pub fn playback_into(
        &self,
        out: &mut [f32],
        num_frames: usize,
        offset: usize,
        layout: SampleLayout,
    ) -> usize {
        let nc = self.num_channels;
        if nc == 0 {
            return 0;
        }
        let frames = num_frames.min(out.len() / nc);
        let range = self.visible_range();

        for (ch, samples) in self.channels.iter().enumerate() {
            for i in 0..frames {
                let value = Self::read(samples, offset.saturating_add(i), range);
                let index = match layout {
                    SampleLayout::ChannelMajor => ch * frames + i,
                    SampleLayout::Interleaved => i * nc + ch,
                };
                out[index] = value;
            }
        }
        frames
    }

    /// Row-tiled copy of `layout.window_size` samples starting at `offset`.
    pub fn windowed_playback(&self, layout: &WindowLayout, offset: usize) -> Vec<f32> {
        let mut out = vec![0.0; layout.buffer_len(self.num_channels)];
        self.fill_windowed(&mut out, layout, offset);
        out
    }

    /// Fill `out` with the row-tiled window format (see [`WindowLayout`]).
    ///
    /// Data rows copy tape samples with the same out-of-range rules as
    /// [`playback`](Self::playback). When the window ends mid-row the rest of
    /// that row repeats the last written sample. Zero rows stay zero. If `out`
    /// is smaller than the layout requires it is left zeroed.
    pub fn fill_windowed(&self, out: &mut [f32], layout: &WindowLayout, offset: usize) {
        out.fill(0.0);

        let nc = self.num_channels;
        let width = layout.row_width;
        if layout.is_empty() || nc == 0 || width == 0 || out.len() < layout.buffer_len(nc) {
            return;
        }
        let range = self.visible_range();

        for row in 0..layout.rows_per_channel {
            let source_start = row * width;
            let source_end = (source_start + width).min(layout.window_size);
            let copied = source_end.saturating_sub(source_start);

            for (ch, samples) in self.channels.iter().enumerate() {
                let data_row = layout.data_row(ch, row, nc);
                let dest = &mut out[data_row * width..(data_row + 1) * width];

                for (i, cell) in dest[..copied].iter_mut().enumerate() {
                    *cell = Self::read(samples, offset.saturating_add(source_start + i), range);
                }

                if copied < width {
                    let hold = if copied > 0 { dest[copied - 1] } else { 0.0 };
                    dest[copied..].fill(hold);
                }
            }
        }
    }

    /// Drop all content. Unbounded tapes become empty, fixed tapes are zeroed.
    /// Both cursors return to 0.
    pub fn clear(&mut self) {
        for ch in &mut self.channels {
            match self.capacity {
                Some(_) => ch.fill(0.0),
                None => ch.clear(),
            }
        }
        self.record_position = 0;
        self.playback_position = 0;
    }
}
