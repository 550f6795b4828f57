//! TapeDeck that drives a tape and its scrub window per callback

#[cfg(feature = "wav")]
use std::path::Path;

use tapedeck_core::{ScrubWindow, SharedTape};

use crate::TapeDeckBuilder;
#[cfg(feature = "wav")]
use crate::{LoadOptions, Result};

/// One tape plus one scrub window bound to it.
///
/// Call [`process`](Self::process) once per audio callback. While armed, the
/// callback's input block is recorded before the scrub cursor advances, so a
/// scrubber following the record head sees the block recorded in the same
/// callback.
///
/// # Example
///
/// ```
/// use tapedeck::prelude::*;
///
/// let mut deck = TapeDeck::builder().channels(1).frames_per_buffer(4).build()?;
/// deck.arm_recording(Some(8));
/// deck.process(0, Some(&[0.5; 4]));
///
/// assert_eq!(deck.tape().read().len(), 12);
/// # Ok::<(), tapedeck::Error>(())
/// ```
#[derive(Debug)]
pub struct TapeDeck {
    tape: SharedTape,
    scrub: ScrubWindow,
    recording: bool,
    pending_offset: Option<usize>,
}

impl TapeDeck {
    pub fn builder() -> TapeDeckBuilder {
        TapeDeckBuilder::default()
    }

    pub(crate) fn from_parts(tape: SharedTape, scrub: ScrubWindow) -> Self {
        Self {
            tape,
            scrub,
            recording: false,
            pending_offset: None,
        }
    }

    pub fn tape(&self) -> &SharedTape {
        &self.tape
    }

    pub fn scrub(&self) -> &ScrubWindow {
        &self.scrub
    }

    pub fn scrub_mut(&mut self) -> &mut ScrubWindow {
        &mut self.scrub
    }

    /// Start recording input passed to [`process`](Self::process).
    ///
    /// With `Some(offset)` the first block lands at that timeline offset and
    /// later blocks continue from the record cursor. With `None` recording
    /// continues from the current record cursor.
    pub fn arm_recording(&mut self, offset: Option<usize>) {
        self.recording = true;
        self.pending_offset = offset;
        tracing::debug!(?offset, "recording armed");
    }

    pub fn disarm_recording(&mut self) {
        if self.recording {
            tracing::debug!(
                record_position = self.tape.read().record_position(),
                "recording disarmed"
            );
        }
        self.recording = false;
        self.pending_offset = None;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Per-callback entry point: record `input` if armed, then advance the
    /// scrub window for callback `time`.
    ///
    /// `input` is one channel-major block of `frames_per_buffer` samples per
    /// channel.
    pub fn process(&mut self, time: u32, input: Option<&[f32]>) {
        if let (true, Some(block)) = (self.recording, input) {
            let mut tape = self.tape.write();
            match self.pending_offset.take() {
                Some(offset) => tape.record_at(block, offset),
                None => tape.record(block),
            }
        }
        self.scrub.update(time);
    }

    /// Replace the tape with a WAV file (or a range of it).
    ///
    /// Block size and sample rate follow the deck. The scrub window is
    /// rebound to the new tape and rewound to its start. On error the current
    /// tape stays in place.
    #[cfg(feature = "wav")]
    pub fn load_wav(
        &mut self,
        path: impl AsRef<Path>,
        start_seconds: Option<f32>,
        end_seconds: Option<f32>,
    ) -> Result<()> {
        let config = self.scrub.config();
        let options = LoadOptions {
            frames_per_buffer: config.frames_per_buffer,
            sample_rate: config.sample_rate,
            start_seconds,
            end_seconds,
        };
        let tape = tapedeck_wav::load_wav(path, &options)?.into_shared();

        self.scrub.set_tape(&tape)?;
        self.scrub.set_position(0);
        self.tape = tape;
        self.disarm_recording();
        Ok(())
    }

    /// Write the current tape to a 16-bit WAV file.
    #[cfg(feature = "wav")]
    pub fn export_wav(&self, path: impl AsRef<Path>) -> Result<()> {
        tapedeck_wav::export_wav(&self.tape.read(), path)?;
        Ok(())
    }
}
