//! # tapedeck - Tape recording and variable-speed scrubbing
//!
//! ## Architecture
//!
//! tapedeck is an umbrella crate that coordinates:
//! - **tapedeck-core** - Tape storage, scrub window, row-tiled window layout
//! - **tapedeck-wav** - WAV load and export
//!
//! ## Quick Start
//!
//! ```
//! use tapedeck::prelude::*;
//!
//! let mut deck = TapeDeck::builder()
//!     .frames_per_buffer(256)
//!     .sample_rate(44100)
//!     .channels(2)
//!     .build()?;
//!
//! // Record four callbacks worth of input, then scrub back through it
//! deck.arm_recording(None);
//! for time in 0..4 {
//!     deck.process(time, Some(&vec![0.25; 512]));
//! }
//! deck.disarm_recording();
//!
//! // The scrubber ran into the end of the growing tape and stopped
//! let scrub = deck.scrub_mut();
//! scrub.set_position(1024);
//! scrub.set_speed(-0.5);
//! scrub.start();
//! deck.process(4, None);
//! assert_eq!(deck.scrub().position(), 896);
//! # Ok::<(), tapedeck::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - WAV support
//! - `wav` - [`TapeDeck::load_wav`] / [`TapeDeck::export_wav`]
//! - `serde` - Serialize/deserialize config types

/// Re-export of tapedeck-core for direct access
pub use tapedeck_core as core;

pub use tapedeck_core::{
    CallbackClock, SampleLayout, ScrubConfig, ScrubWindow, SharedTape, Tape, TapeConfig,
    WindowLayout, MAX_ROW_WIDTH,
};

pub mod error;
pub use error::{Error, Result};

#[cfg(feature = "wav")]
pub use tapedeck_wav as wav;
#[cfg(feature = "wav")]
pub use tapedeck_wav::{LoadOptions, WavError};

mod builder;
mod deck;

pub use builder::TapeDeckBuilder;
pub use deck::TapeDeck;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{Error, Result, TapeDeck, TapeDeckBuilder};

    pub use crate::core::{SampleLayout, ScrubConfig, ScrubWindow, SharedTape, Tape, TapeConfig};

    #[cfg(feature = "wav")]
    pub use crate::LoadOptions;
}
