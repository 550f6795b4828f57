//! Test helpers and fixtures for tapedeck integration tests
//!
//! ## Tolerance Levels
//!
//! - `FLOAT_EPSILON` (1e-6): Exact operations (record/playback copies)
//! - `INT16_EPSILON` (1/32768): One 16-bit quantization step

#![allow(dead_code)]

use tapedeck::prelude::*;

/// Test sample rate
pub const TEST_SAMPLE_RATE: u32 = 8000;

/// Block size for deterministic testing
pub const TEST_BUFFER_SIZE: usize = 64;

pub const FLOAT_EPSILON: f32 = 1e-6;

/// 16-bit quantization step size.
pub const INT16_EPSILON: f32 = 1.0 / 32768.0;

/// Route library logs to the test harness. Set `RUST_LOG=tapedeck_core=trace`
/// to see scrub boundary and loop events.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Stereo deck at the test rate with a 1000-sample scrub window.
pub fn test_deck() -> TapeDeck {
    TapeDeck::builder()
        .frames_per_buffer(TEST_BUFFER_SIZE)
        .sample_rate(TEST_SAMPLE_RATE)
        .channels(2)
        .window_seconds(0.125)
        .build()
        .expect("Failed to create test deck")
}

/// Generate a test signal: sine wave at given frequency for specified samples.
pub fn generate_sine(frequency: f32, sample_rate: u32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Generate an integer staircase signal [0, 1, 2, ..., n-1] as f32.
///
/// Each sample equals its index, so any read can be checked against the
/// timeline position it came from.
pub fn generate_integer_staircase(num_samples: usize) -> Vec<f32> {
    (0..num_samples).map(|i| i as f32).collect()
}

/// Channel-major block `frame` of a stereo signal where the right channel is
/// the negated left channel.
pub fn stereo_block(signal: &[f32], frame: usize) -> Vec<f32> {
    let start = frame * TEST_BUFFER_SIZE;
    let left = &signal[start..start + TEST_BUFFER_SIZE];
    left.iter().copied().chain(left.iter().map(|s| -s)).collect()
}

/// Calculate RMS of a signal.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Calculate peak amplitude of a signal.
pub fn peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0_f32, |a, b| a.max(b))
}

/// Assert that a signal is approximately silent (all values near zero).
pub fn assert_silence(samples: &[f32], tolerance: f32) {
    let max = peak(samples);
    assert!(
        max <= tolerance,
        "Expected silence, but peak amplitude was {}",
        max
    );
}
