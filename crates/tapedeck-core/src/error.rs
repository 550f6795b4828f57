//! Error types for tapedeck-core.

use thiserror::Error;

/// Error type for tapedeck-core operations.
///
/// Only configuration validation reports errors. Recording, playback and
/// scrub updates are total and never fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Channel count mismatch: expected {expected}, got {actual}")]
    ChannelMismatch { expected: usize, actual: usize },

    #[error("Channels have different lengths")]
    RaggedChannels,
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
