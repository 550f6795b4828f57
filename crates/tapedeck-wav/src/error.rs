//! Error types for tapedeck-wav

use std::io;
use thiserror::Error;

/// WAV load/export error type
#[derive(Error, Debug)]
pub enum WavError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed or unreadable WAV data
    #[error("WAV decode error: {0}")]
    Decode(hound::Error),

    /// Sample format or channel layout not handled
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Requested load range is outside the file or empty
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Export of a tape with no samples
    #[error("Cannot export an empty tape")]
    EmptyTape,

    /// Invalid audio data
    #[error("Invalid audio data: {0}")]
    InvalidData(String),
}

/// Result type for WAV operations
pub type Result<T> = std::result::Result<T, WavError>;

impl From<hound::Error> for WavError {
    fn from(e: hound::Error) -> Self {
        match e {
            hound::Error::IoError(io) => WavError::Io(io),
            hound::Error::Unsupported => {
                WavError::UnsupportedFormat("unsupported WAV feature".into())
            }
            other => WavError::Decode(other),
        }
    }
}
