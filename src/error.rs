//! Centralized error type for the tapedeck umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] tapedeck_core::Error),

    #[cfg(feature = "wav")]
    #[error("WAV: {0}")]
    Wav(#[from] tapedeck_wav::WavError),
}

pub type Result<T> = std::result::Result<T, Error>;
