//! WAV decoding into fixed-capacity tapes.

use std::io::Read;
use std::path::Path;

use hound::{SampleFormat, WavReader};
use tapedeck_core::Tape;

use crate::error::{Result, WavError};

/// Options for [`load_wav`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOptions {
    /// Block size of the resulting tape (default: 256)
    pub frames_per_buffer: usize,
    /// Sample rate the tape runs at (default: 44100). A different file rate
    /// is logged, not resampled.
    pub sample_rate: u32,
    /// Start of the loaded range in seconds (default: file start)
    pub start_seconds: Option<f32>,
    /// End of the loaded range in seconds (default: file end)
    pub end_seconds: Option<f32>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            frames_per_buffer: 256,
            sample_rate: 44100,
            start_seconds: None,
            end_seconds: None,
        }
    }
}

impl LoadOptions {
    pub fn with_frames_per_buffer(mut self, frames: usize) -> Self {
        self.frames_per_buffer = frames;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_start(mut self, seconds: f32) -> Self {
        self.start_seconds = Some(seconds);
        self
    }

    pub fn with_end(mut self, seconds: f32) -> Self {
        self.end_seconds = Some(seconds);
        self
    }

    pub fn with_range(self, start: f32, end: f32) -> Self {
        self.with_start(start).with_end(end)
    }
}

/// Frame range `[start, end)` to decode.
fn resolve_range(
    options: &LoadOptions,
    total_frames: usize,
    file_rate: u32,
) -> Result<(usize, usize)> {
    let total_seconds = total_frames as f32 / file_rate as f32;
    let start = options.start_seconds.unwrap_or(0.0);
    let end = options.end_seconds.unwrap_or(total_seconds);

    if start.is_nan() || start < 0.0 {
        return Err(WavError::InvalidRange(format!("start {start}s must be >= 0")));
    }
    if end.is_nan() || end <= start {
        return Err(WavError::InvalidRange(format!(
            "end {end}s must be after start {start}s"
        )));
    }
    let end = if end > total_seconds {
        tracing::warn!(
            requested = end,
            duration = total_seconds,
            "end time past end of file, clamping"
        );
        total_seconds
    } else {
        end
    };

    let start_frame = (start * file_rate as f32) as usize;
    let end_frame = ((end * file_rate as f32) as usize).min(total_frames);
    if start_frame >= total_frames {
        return Err(WavError::InvalidRange(format!(
            "start frame {start_frame} past end of file ({total_frames} frames)"
        )));
    }
    if end_frame <= start_frame {
        return Err(WavError::InvalidRange(format!(
            "range {start}s..{end}s contains no samples"
        )));
    }
    Ok((start_frame, end_frame))
}

/// Split interleaved samples into per-channel vectors of `frames` each.
/// A short read is padded with silence.
fn deinterleave<S, I>(
    samples: I,
    num_channels: usize,
    frames: usize,
    convert: impl Fn(S) -> f32,
) -> Result<Vec<Vec<f32>>>
where
    I: Iterator<Item = hound::Result<S>>,
{
    let mut channels = vec![Vec::with_capacity(frames); num_channels];
    for (i, sample) in samples.take(frames * num_channels).enumerate() {
        channels[i % num_channels].push(convert(sample?));
    }

    let read = channels.first().map_or(0, Vec::len);
    if read < frames {
        tracing::warn!(expected = frames, read, "WAV data shorter than header, padding");
    }
    for ch in &mut channels {
        ch.resize(frames, 0.0);
    }
    Ok(channels)
}

fn decode<R: Read>(
    reader: &mut WavReader<R>,
    num_channels: usize,
    frames: usize,
) -> Result<Vec<Vec<f32>>> {
    let spec = reader.spec();
    match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => {
            deinterleave(reader.samples::<f32>(), num_channels, frames, |s| s)
        }
        (SampleFormat::Int, bits @ (8 | 16 | 24 | 32)) => {
            let scale = 1.0 / (1u64 << (bits - 1)) as f32;
            deinterleave(reader.samples::<i32>(), num_channels, frames, |s| {
                s as f32 * scale
            })
        }
        (format, bits) => Err(WavError::UnsupportedFormat(format!(
            "{bits}-bit {format:?}"
        ))),
    }
}

/// Load a WAV file, or a time range of it, into a fixed-capacity tape.
///
/// The tape capacity equals the number of loaded frames and its record
/// cursor sits at the end of the data. Range times are interpreted at the
/// file's sample rate.
pub fn load_wav(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Tape> {
    let path = path.as_ref();
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();

    tracing::debug!(
        path = %path.display(),
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        bits_per_sample = spec.bits_per_sample,
        frames = reader.duration(),
        "loading WAV file"
    );

    if spec.channels == 0 {
        return Err(WavError::InvalidData("file has 0 channels".into()));
    }
    if spec.sample_rate == 0 {
        return Err(WavError::InvalidData("file has a 0 Hz sample rate".into()));
    }
    if spec.sample_rate != options.sample_rate {
        tracing::warn!(
            file = spec.sample_rate,
            requested = options.sample_rate,
            "WAV sample rate does not match tape sample rate"
        );
    }

    let num_channels = usize::from(spec.channels);
    let total_frames = reader.duration() as usize;
    let (start_frame, end_frame) = resolve_range(options, total_frames, spec.sample_rate)?;
    let frames = end_frame - start_frame;

    // start_frame < total_frames, which came from a u32
    reader.seek(start_frame as u32)?;
    let channels = decode(&mut reader, num_channels, frames)?;

    tracing::debug!(start_frame, end_frame, frames, "decoded WAV range");

    Tape::from_channels(options.frames_per_buffer, options.sample_rate, channels)
        .map_err(|e| WavError::InvalidData(e.to_string()))
}
