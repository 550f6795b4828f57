//! WAV load/export tests against real files on disk.

use approx::assert_abs_diff_eq;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;
use tapedeck_core::SampleLayout;
use tapedeck_wav::{export_wav, load_wav, LoadOptions, WavError};
use tempfile::TempDir;

const RATE: u32 = 8000;

/// Write a stereo 16-bit file where left = i, right = -i (as raw i16).
fn write_ramp_i16(path: &Path, frames: usize) {
    let spec = WavSpec {
        channels: 2,
        sample_rate: RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for i in 0..frames as i16 {
        writer.write_sample(i).unwrap();
        writer.write_sample(-i).unwrap();
    }
    writer.finalize().unwrap();
}

fn options() -> LoadOptions {
    LoadOptions::default()
        .with_frames_per_buffer(64)
        .with_sample_rate(RATE)
}

#[test]
fn test_load_full_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ramp.wav");
    write_ramp_i16(&path, 8000);

    let tape = load_wav(&path, &options()).unwrap();
    assert_eq!(tape.num_channels(), 2);
    assert_eq!(tape.len(), 8000);
    assert_eq!(tape.capacity(), Some(8000));
    assert_eq!(tape.record_position(), 8000);
    assert_eq!(tape.frames_per_buffer(), 64);

    let left = tape.channel(0).unwrap();
    let right = tape.channel(1).unwrap();
    assert_abs_diff_eq!(left[100], 100.0 / 32768.0, epsilon = 1e-7);
    assert_abs_diff_eq!(right[100], -100.0 / 32768.0, epsilon = 1e-7);
}

#[test]
fn test_load_sub_range() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ramp.wav");
    write_ramp_i16(&path, 8000);

    let tape = load_wav(&path, &options().with_range(0.25, 0.5)).unwrap();
    assert_eq!(tape.len(), 2000);
    assert_abs_diff_eq!(tape.channel(0).unwrap()[0], 2000.0 / 32768.0, epsilon = 1e-7);
    assert_abs_diff_eq!(tape.channel(0).unwrap()[1999], 3999.0 / 32768.0, epsilon = 1e-7);

    // Loaded data is fully inside the visible window
    let out = tape.playback(2, 0, SampleLayout::Interleaved);
    assert_abs_diff_eq!(out[0], 2000.0 / 32768.0, epsilon = 1e-7);
    assert_abs_diff_eq!(out[1], -2000.0 / 32768.0, epsilon = 1e-7);
}

#[test]
fn test_load_end_past_file_is_clamped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ramp.wav");
    write_ramp_i16(&path, 4000);

    let tape = load_wav(&path, &options().with_range(0.25, 30.0)).unwrap();
    assert_eq!(tape.len(), 2000);
}

#[test]
fn test_load_invalid_ranges() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ramp.wav");
    write_ramp_i16(&path, 4000);

    for bad in [
        options().with_start(-1.0),
        options().with_range(0.3, 0.1),
        options().with_start(0.5),
    ] {
        assert!(matches!(load_wav(&path, &bad), Err(WavError::InvalidRange(_))));
    }
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = load_wav(dir.path().join("missing.wav"), &options());
    assert!(matches!(result, Err(WavError::Io(_))));
}

#[test]
fn test_load_garbage_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("garbage.wav");
    std::fs::write(&path, b"definitely not a riff file").unwrap();
    assert!(matches!(load_wav(&path, &options()), Err(WavError::Decode(_))));
}

#[test]
fn test_load_float_and_24_bit() {
    let dir = TempDir::new().unwrap();

    let float_path = dir.path().join("float.wav");
    let spec = WavSpec {
        channels: 1,
        sample_rate: RATE,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(&float_path, spec).unwrap();
    for s in [0.25f32, -0.5, 0.75, 1.5] {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();

    let tape = load_wav(&float_path, &options()).unwrap();
    assert_eq!(tape.channel(0).unwrap(), &[0.25, -0.5, 0.75, 1.5]);

    let int24_path = dir.path().join("int24.wav");
    let spec = WavSpec {
        channels: 1,
        sample_rate: RATE,
        bits_per_sample: 24,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&int24_path, spec).unwrap();
    for s in [4_194_304i32, -8_388_608] {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();

    let tape = load_wav(&int24_path, &options()).unwrap();
    assert_abs_diff_eq!(tape.channel(0).unwrap()[0], 0.5, epsilon = 1e-7);
    assert_abs_diff_eq!(tape.channel(0).unwrap()[1], -1.0, epsilon = 1e-7);
}

#[test]
fn test_export_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("take.wav");

    let mut tape = tapedeck_core::Tape::new(4, RATE, 2, None);
    tape.record(&[0.0, 0.25, 0.5, 2.0, 0.0, -0.25, -0.5, -2.0]);
    export_wav(&tape, &path).unwrap();

    let reader = hound::WavReader::open(&path).unwrap();
    assert_eq!(reader.spec().bits_per_sample, 16);
    assert_eq!(reader.spec().sample_rate, RATE);
    assert_eq!(reader.duration(), 4);

    let loaded = load_wav(&path, &options()).unwrap();
    let tolerance = 2.0 / 32767.0;
    let left = loaded.channel(0).unwrap();
    let right = loaded.channel(1).unwrap();
    assert_abs_diff_eq!(left[1], 0.25, epsilon = tolerance);
    assert_abs_diff_eq!(right[2], -0.5, epsilon = tolerance);
    // clamped to full scale
    assert_abs_diff_eq!(left[3], 1.0, epsilon = tolerance);
    assert_abs_diff_eq!(right[3], -1.0, epsilon = tolerance);
}

#[test]
fn test_export_empty_tape() {
    let dir = TempDir::new().unwrap();
    let tape = tapedeck_core::Tape::new(4, RATE, 2, None);
    assert!(matches!(
        export_wav(&tape, dir.path().join("empty.wav")),
        Err(WavError::EmptyTape)
    ));
}
