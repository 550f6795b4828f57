//! Builder for configuring and constructing a `TapeDeck`.

use tapedeck_core::{ScrubConfig, ScrubWindow, Tape, TapeConfig, MAX_ROW_WIDTH};

use crate::{Result, TapeDeck};

/// Both the tape and the scrub window share block size, sample rate and
/// channel count, so they are configured once here.
///
/// # Example
///
/// ```
/// use tapedeck::prelude::*;
///
/// let deck = TapeDeck::builder()
///     .sample_rate(48000)
///     .capacity_seconds(10.0)
///     .window_seconds(1.0)
///     .looping(true)
///     .build()?;
///
/// assert_eq!(deck.tape().read().capacity(), Some(480_000));
/// assert!(deck.scrub().is_loop_enabled());
/// # Ok::<(), tapedeck::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct TapeDeckBuilder {
    frames_per_buffer: usize,
    sample_rate: u32,
    channels: usize,
    capacity: Option<usize>,
    capacity_seconds: Option<f32>,
    window_seconds: f32,
    max_row_width: usize,
    speed: f32,
    looping: bool,
}

impl Default for TapeDeckBuilder {
    fn default() -> Self {
        Self {
            frames_per_buffer: 256,
            sample_rate: 44100,
            channels: 2,
            capacity: None,
            capacity_seconds: None,
            window_seconds: 2.0,
            max_row_width: MAX_ROW_WIDTH,
            speed: 1.0,
            looping: false,
        }
    }
}

impl TapeDeckBuilder {
    /// Default: 256
    pub fn frames_per_buffer(mut self, frames: usize) -> Self {
        self.frames_per_buffer = frames;
        self
    }

    /// Default: 44100
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Default: 2
    pub fn channels(mut self, count: usize) -> Self {
        self.channels = count;
        self
    }

    /// Fixed tape capacity in samples per channel. Default: unbounded
    pub fn capacity(mut self, samples: usize) -> Self {
        self.capacity = Some(samples);
        self.capacity_seconds = None;
        self
    }

    /// Fixed tape capacity in seconds, resolved against the final sample rate.
    pub fn capacity_seconds(mut self, seconds: f32) -> Self {
        self.capacity_seconds = Some(seconds);
        self.capacity = None;
        self
    }

    /// Default: 2.0
    pub fn window_seconds(mut self, seconds: f32) -> Self {
        self.window_seconds = seconds;
        self
    }

    /// Default: 4096
    pub fn max_row_width(mut self, width: usize) -> Self {
        self.max_row_width = width;
        self
    }

    /// Initial scrub speed ratio. Default: 1.0
    pub fn speed(mut self, ratio: f32) -> Self {
        self.speed = ratio;
        self
    }

    /// Default: false
    pub fn looping(mut self, enabled: bool) -> Self {
        self.looping = enabled;
        self
    }

    pub fn tape_config(&self) -> TapeConfig {
        let config = TapeConfig::default()
            .with_frames_per_buffer(self.frames_per_buffer)
            .with_sample_rate(self.sample_rate)
            .with_channels(self.channels);
        match (self.capacity, self.capacity_seconds) {
            (Some(samples), _) => config.with_capacity(samples),
            (None, Some(seconds)) => config.with_capacity_seconds(seconds),
            (None, None) => config,
        }
    }

    pub fn scrub_config(&self) -> ScrubConfig {
        ScrubConfig::default()
            .with_frames_per_buffer(self.frames_per_buffer)
            .with_sample_rate(self.sample_rate)
            .with_channels(self.channels)
            .with_window_seconds(self.window_seconds)
            .with_max_row_width(self.max_row_width)
    }

    pub fn build(self) -> Result<TapeDeck> {
        let scrub_config = self.scrub_config();
        scrub_config.validate()?;
        let tape = Tape::from_config(&self.tape_config())?.into_shared();

        let mut scrub = ScrubWindow::new(scrub_config);
        scrub.set_tape(&tape)?;
        scrub.set_speed(self.speed);
        scrub.set_loop(self.looping);

        tracing::debug!(
            frames_per_buffer = self.frames_per_buffer,
            sample_rate = self.sample_rate,
            channels = self.channels,
            window_samples = scrub.window_size_samples(),
            "built tape deck"
        );

        Ok(TapeDeck::from_parts(tape, scrub))
    }
}
