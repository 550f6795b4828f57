//! Variable-speed scrubbing over a shared tape.
//!
//! A [`ScrubWindow`] keeps a read cursor moving over a [`Tape`] at any speed
//! (including reverse) and a materialized, row-tiled copy of the tape region
//! around the cursor. The window is only re-pulled from the tape when the
//! cursor gets close to its edges, so most callbacks are O(1).

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::clock::CallbackClock;
use crate::config::ScrubConfig;
use crate::layout::WindowLayout;
use crate::tape::{SharedTape, Tape};
use crate::{Error, Result};

/// Window offset before the first refresh. Far enough from any real position
/// that the first update always finds the window stale.
pub const UNSET_OFFSET: usize = usize::MAX / 2;

/// Scrub cursor plus materialized window over a shared tape.
///
/// Holds only a weak reference to the tape. A dropped tape behaves exactly
/// like no tape bound: [`update`](Self::update) becomes a no-op.
#[derive(Debug)]
pub struct ScrubWindow {
    config: ScrubConfig,
    layout: WindowLayout,
    tape: Option<Weak<RwLock<Tape>>>,
    window: Vec<f32>,
    clock: CallbackClock,
    position: usize,
    speed: i32,
    window_offset: usize,
    stopped: bool,
    loop_enabled: bool,
}

impl ScrubWindow {
    /// Create a scrub window with its buffer preallocated.
    ///
    /// Never fails. A config that resolves to an empty layout yields a window
    /// whose updates are no-ops; call [`ScrubConfig::validate`] first to catch
    /// that early.
    pub fn new(config: ScrubConfig) -> Self {
        let layout = config.layout();
        let speed = i32::try_from(config.frames_per_buffer).unwrap_or(i32::MAX);
        Self {
            config,
            layout,
            tape: None,
            window: vec![0.0; layout.buffer_len(config.num_channels)],
            clock: CallbackClock::new(),
            position: 0,
            speed,
            window_offset: UNSET_OFFSET,
            stopped: false,
            loop_enabled: false,
        }
    }

    pub fn config(&self) -> &ScrubConfig {
        &self.config
    }

    // =========================================================================
    // Tape binding
    // =========================================================================

    /// Bind a tape. Fails if its channel count differs from the config.
    pub fn set_tape(&mut self, tape: &SharedTape) -> Result<()> {
        let actual = tape.read().num_channels();
        if actual != self.config.num_channels {
            return Err(Error::ChannelMismatch {
                expected: self.config.num_channels,
                actual,
            });
        }
        self.tape = Some(Arc::downgrade(tape));
        self.window_offset = UNSET_OFFSET;
        Ok(())
    }

    pub fn clear_tape(&mut self) {
        self.tape = None;
    }

    /// The bound tape, if it is still alive.
    pub fn tape(&self) -> Option<SharedTape> {
        self.tape.as_ref().and_then(Weak::upgrade)
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// Set speed as a ratio of normal playback (1.0 = realtime, negative =
    /// reverse, 0 = frozen).
    pub fn set_speed(&mut self, ratio: f32) {
        // float -> int casts saturate and map NaN to 0
        self.speed = (ratio * self.config.frames_per_buffer as f32).round() as i32;
    }

    pub fn speed_ratio(&self) -> f32 {
        if self.config.frames_per_buffer == 0 {
            return 0.0;
        }
        self.speed as f32 / self.config.frames_per_buffer as f32
    }

    /// Samples advanced per callback tick. Negative in reverse.
    pub fn speed_samples_per_buffer(&self) -> i32 {
        self.speed
    }

    pub fn speed_samples_per_second(&self) -> f32 {
        self.speed_ratio() * self.config.sample_rate as f32
    }

    /// Move the cursor. The window is not refreshed until the next update.
    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    pub fn set_position_seconds(&mut self, seconds: f32) {
        self.position = (seconds.max(0.0) * self.config.sample_rate as f32) as usize;
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn start(&mut self) {
        self.stopped = false;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn set_loop(&mut self, enabled: bool) {
        self.loop_enabled = enabled;
    }

    pub fn is_loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    // =========================================================================
    // Per-callback update
    // =========================================================================

    /// Advance the cursor for the callback at `time`.
    ///
    /// `time` is a callback counter. The cursor moves by
    /// `speed * (time - previous time)` samples. Hitting a tape boundary
    /// either wraps (loop enabled) or clamps and stops. The window is pulled
    /// from the tape only when stale. A wrap pulls it around the position
    /// before the wrap.
    pub fn update(&mut self, time: u32) {
        let delta = self.clock.tick(time);
        if delta == 0 || self.stopped || self.speed == 0 || self.window.is_empty() {
            return;
        }
        let Some(shared) = self.tape() else {
            return;
        };
        let tape = shared.read();

        let length = tape.len();
        let advance = delta.saturating_mul(i64::from(self.speed));
        let target = i64::try_from(self.position)
            .unwrap_or(i64::MAX)
            .saturating_add(advance);
        let end = i64::try_from(length).unwrap_or(i64::MAX);

        if target < 0 || target >= end {
            if self.loop_enabled && length > 0 {
                self.pull_window(&tape, self.position);
                let wrapped = target.rem_euclid(end);
                tracing::trace!(from = self.position, to = wrapped, "scrub loop wrap");
                self.position = wrapped as usize;
            } else {
                self.position = if target < 0 { 0 } else { length };
                self.stopped = true;
                tracing::debug!(position = self.position, length, "scrub hit tape boundary, stopped");
            }
            return;
        }

        if self.is_stale() {
            self.pull_window(&tape, self.position);
        }
        self.position = target as usize;
    }

    /// Whether the cursor is too close to the window edges for the current
    /// direction of travel.
    pub fn is_stale(&self) -> bool {
        let frame = self.speed.unsigned_abs() as usize;
        let valid_start = self.window_offset.saturating_add(frame);
        let valid_end = self
            .window_offset
            .saturating_add(self.layout.window_size)
            .saturating_sub(frame);
        let margin = frame.saturating_mul(2);

        if self.speed >= 0 {
            self.position < valid_start || self.position >= valid_end.saturating_sub(margin)
        } else {
            self.position >= valid_end || self.position < valid_start.saturating_add(margin)
        }
    }

    /// Re-pull the window around the current position.
    pub fn refresh(&mut self) {
        let Some(shared) = self.tape() else {
            return;
        };
        let tape = shared.read();
        self.pull_window(&tape, self.position);
    }

    fn pull_window(&mut self, tape: &Tape, position: usize) {
        self.window_offset = self.offset_for(position);
        tape.fill_windowed(&mut self.window, &self.layout, self.window_offset);
    }

    /// Window start for a cursor at `position`. Forward play keeps one
    /// sample of history, reverse play keeps the window behind the cursor.
    fn offset_for(&self, position: usize) -> usize {
        match self.speed {
            s if s > 0 => position.saturating_sub(1),
            s if s < 0 => position.saturating_sub(self.layout.window_size),
            _ => 0,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn at_beginning(&self) -> bool {
        self.position == 0
    }

    /// `false` when no tape is bound.
    pub fn at_end(&self) -> bool {
        self.tape()
            .is_some_and(|tape| self.position >= tape.read().len())
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn position_seconds(&self) -> f32 {
        self.samples_to_seconds(self.position)
    }

    /// Tape sample at column 0 of the window. [`UNSET_OFFSET`] before the
    /// first refresh.
    pub fn window_offset(&self) -> usize {
        self.window_offset
    }

    pub fn window_offset_seconds(&self) -> f32 {
        self.samples_to_seconds(self.window_offset)
    }

    pub fn window_size_samples(&self) -> usize {
        self.layout.window_size
    }

    pub fn window_size_seconds(&self) -> f32 {
        self.samples_to_seconds(self.layout.window_size)
    }

    pub fn layout(&self) -> &WindowLayout {
        &self.layout
    }

    /// Row-tiled window contents, see [`WindowLayout`].
    pub fn window_buffer(&self) -> &[f32] {
        &self.window
    }

    pub fn has_window(&self) -> bool {
        !self.window.is_empty() && self.window_offset != UNSET_OFFSET
    }

    fn samples_to_seconds(&self, samples: usize) -> f32 {
        if self.config.sample_rate == 0 {
            return 0.0;
        }
        samples as f32 / self.config.sample_rate as f32
    }

    /// Render one callback block from the window, channel-major.
    ///
    /// Frame `i` reads the window at `position + i * speed / frames_per_buffer`.
    /// Reads outside the window are silent, and so is the whole block while
    /// stopped or before the first refresh. Writes at most
    /// `frames_per_buffer * num_channels` samples and returns the frame count.
    ///
    /// A loop wrap refreshes the window at the pre-wrap position, so the block
    /// read right after a wrap is silent. The next [`update`](Self::update)
    /// pulls a window around the wrapped cursor.
    pub fn read_block(&self, out: &mut [f32]) -> usize {
        out.fill(0.0);

        let nc = self.config.num_channels;
        let fpb = self.config.frames_per_buffer;
        if nc == 0 || fpb == 0 {
            return 0;
        }
        let frames = fpb.min(out.len() / nc);
        if self.stopped || !self.has_window() {
            return frames;
        }

        let base = i64::try_from(self.position).unwrap_or(i64::MAX);
        let offset = i64::try_from(self.window_offset).unwrap_or(i64::MAX);
        let step = i64::from(self.speed);

        for i in 0..frames {
            let index = base.saturating_add(i as i64 * step / fpb as i64);
            let Ok(relative) = usize::try_from(index.saturating_sub(offset)) else {
                continue;
            };
            for ch in 0..nc {
                if let Some(at) = self.layout.locate(ch, relative, nc) {
                    out[ch * frames + i] = self.window[at];
                }
            }
        }
        frames
    }
}
