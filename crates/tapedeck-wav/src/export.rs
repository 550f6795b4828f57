//! WAV export as 16-bit PCM.

use std::io::{Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use tapedeck_core::Tape;

use crate::error::{Result, WavError};

fn wav_spec(tape: &Tape) -> Result<WavSpec> {
    if tape.is_empty() || tape.num_channels() == 0 {
        return Err(WavError::EmptyTape);
    }
    let channels = u16::try_from(tape.num_channels()).map_err(|_| {
        WavError::UnsupportedFormat(format!("{} channels", tape.num_channels()))
    })?;
    Ok(WavSpec {
        channels,
        sample_rate: tape.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    })
}

/// Convert f32 sample to i16, clamping to [-1, 1].
#[inline]
fn float_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0) as i16
}

fn write_samples<W: Write + Seek>(tape: &Tape, writer: &mut WavWriter<W>) -> Result<()> {
    let channels = tape.channels();
    for frame in 0..tape.len() {
        for ch in channels {
            writer.write_sample(float_to_i16(ch[frame]))?;
        }
    }
    Ok(())
}

/// Write the stored samples of `tape` as interleaved 16-bit PCM to `writer`.
pub fn write_wav<W: Write + Seek>(tape: &Tape, writer: W) -> Result<()> {
    let spec = wav_spec(tape)?;
    let mut writer = WavWriter::new(writer, spec)?;
    write_samples(tape, &mut writer)?;
    writer.finalize()?;
    Ok(())
}

/// Export the stored samples of `tape` to a 16-bit PCM WAV file.
///
/// Fails with [`WavError::EmptyTape`] when the tape holds no samples.
pub fn export_wav(tape: &Tape, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let spec = wav_spec(tape)?;
    let mut writer = WavWriter::create(path, spec)?;
    write_samples(tape, &mut writer)?;
    writer.finalize()?;

    tracing::debug!(
        path = %path.display(),
        channels = spec.channels,
        frames = tape.len(),
        "exported tape to WAV"
    );
    Ok(())
}
