//! Tape and scrub window configuration.

use crate::layout::{WindowLayout, MAX_ROW_WIDTH};
use crate::{Error, Result};

const MIN_SAMPLE_RATE: u32 = 8000;
const MAX_SAMPLE_RATE: u32 = 384_000;

fn validate_common(frames_per_buffer: usize, sample_rate: u32, num_channels: usize) -> Result<()> {
    if frames_per_buffer == 0 {
        return Err(Error::InvalidConfig(
            "frames_per_buffer must be greater than 0".into(),
        ));
    }
    if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
        return Err(Error::InvalidConfig(format!(
            "sample_rate {} out of range ({}-{} Hz)",
            sample_rate, MIN_SAMPLE_RATE, MAX_SAMPLE_RATE
        )));
    }
    if num_channels == 0 {
        return Err(Error::InvalidConfig(
            "num_channels must be greater than 0".into(),
        ));
    }
    Ok(())
}

/// Configuration for a [`Tape`](crate::Tape).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TapeConfig {
    /// Samples per channel in one record/playback block (default: 256)
    pub frames_per_buffer: usize,
    /// Sample rate in Hz (default: 44100)
    pub sample_rate: u32,
    /// Number of channels (default: 2)
    pub num_channels: usize,
    /// Fixed capacity in samples per channel. `None` grows on demand.
    pub capacity: Option<usize>,
}

impl Default for TapeConfig {
    fn default() -> Self {
        Self {
            frames_per_buffer: 256,
            sample_rate: 44100,
            num_channels: 2,
            capacity: None,
        }
    }
}

impl TapeConfig {
    pub fn with_frames_per_buffer(mut self, frames: usize) -> Self {
        self.frames_per_buffer = frames;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_channels(mut self, num_channels: usize) -> Self {
        self.num_channels = num_channels;
        self
    }

    /// Fixed-capacity sliding window of `samples` per channel.
    pub fn with_capacity(mut self, samples: usize) -> Self {
        self.capacity = Some(samples);
        self
    }

    /// Fixed capacity expressed in seconds, rounded down to whole samples.
    pub fn with_capacity_seconds(mut self, seconds: f32) -> Self {
        self.capacity = Some((seconds.max(0.0) * self.sample_rate as f32) as usize);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_common(self.frames_per_buffer, self.sample_rate, self.num_channels)?;
        if self.capacity == Some(0) {
            return Err(Error::InvalidConfig(
                "fixed capacity must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for a [`ScrubWindow`](crate::ScrubWindow).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrubConfig {
    /// Samples per channel consumed per callback (default: 256)
    pub frames_per_buffer: usize,
    /// Sample rate in Hz (default: 44100)
    pub sample_rate: u32,
    /// Number of channels (default: 2)
    pub num_channels: usize,
    /// Requested window duration in seconds (default: 2.0)
    pub window_seconds: f32,
    /// Widest row the consumer accepts (default: 4096)
    pub max_row_width: usize,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self {
            frames_per_buffer: 256,
            sample_rate: 44100,
            num_channels: 2,
            window_seconds: 2.0,
            max_row_width: MAX_ROW_WIDTH,
        }
    }
}

impl ScrubConfig {
    pub fn with_frames_per_buffer(mut self, frames: usize) -> Self {
        self.frames_per_buffer = frames;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_channels(mut self, num_channels: usize) -> Self {
        self.num_channels = num_channels;
        self
    }

    pub fn with_window_seconds(mut self, seconds: f32) -> Self {
        self.window_seconds = seconds;
        self
    }

    pub fn with_max_row_width(mut self, width: usize) -> Self {
        self.max_row_width = width;
        self
    }

    /// Row-tiled geometry this config resolves to.
    pub fn layout(&self) -> WindowLayout {
        WindowLayout::for_duration(
            self.window_seconds,
            self.frames_per_buffer,
            self.sample_rate,
            self.max_row_width,
        )
    }

    pub fn validate(&self) -> Result<()> {
        validate_common(self.frames_per_buffer, self.sample_rate, self.num_channels)?;
        if !self.window_seconds.is_finite() || self.window_seconds < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "window_seconds {} must be finite and non-negative",
                self.window_seconds
            )));
        }
        if self.max_row_width == 0 {
            return Err(Error::InvalidConfig(
                "max_row_width must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tape_config() {
        let config = TapeConfig::default();
        assert_eq!(config.frames_per_buffer, 256);
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.num_channels, 2);
        assert_eq!(config.capacity, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tape_config_rejects_zero_capacity() {
        let config = TapeConfig::default().with_capacity(0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_tape_config_capacity_seconds() {
        let config = TapeConfig::default()
            .with_sample_rate(48000)
            .with_capacity_seconds(0.5);
        assert_eq!(config.capacity, Some(24000));
    }

    #[test]
    fn test_sample_rate_range() {
        assert!(TapeConfig::default().with_sample_rate(4000).validate().is_err());
        assert!(TapeConfig::default().with_sample_rate(500_000).validate().is_err());
        assert!(TapeConfig::default().with_sample_rate(96000).validate().is_ok());
    }

    #[test]
    fn test_zero_channels_rejected() {
        assert!(TapeConfig::default().with_channels(0).validate().is_err());
        assert!(ScrubConfig::default().with_channels(0).validate().is_err());
    }

    #[test]
    fn test_default_scrub_config() {
        let config = ScrubConfig::default();
        assert_eq!(config.window_seconds, 2.0);
        assert_eq!(config.max_row_width, 4096);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scrub_config_rejects_bad_window() {
        assert!(ScrubConfig::default()
            .with_window_seconds(f32::NAN)
            .validate()
            .is_err());
        assert!(ScrubConfig::default()
            .with_window_seconds(-1.0)
            .validate()
            .is_err());
        assert!(ScrubConfig::default()
            .with_max_row_width(0)
            .validate()
            .is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serde_roundtrip() {
        let config = ScrubConfig::default().with_window_seconds(0.5);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ScrubConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
