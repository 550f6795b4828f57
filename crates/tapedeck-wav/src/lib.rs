//! WAV persistence for [`tapedeck_core::Tape`].
//!
//! - [`load_wav`]: decode a file (optionally a time sub-range) into a
//!   fixed-capacity tape sized to the loaded data
//! - [`export_wav`]: write a tape as interleaved 16-bit PCM
//!
//! # Example
//!
//! ```ignore
//! use tapedeck_wav::{export_wav, load_wav, LoadOptions};
//!
//! let tape = load_wav("take.wav", &LoadOptions::default().with_range(1.0, 3.0))?;
//! export_wav(&tape, "excerpt.wav")?;
//! ```

pub mod error;
pub use error::{Result, WavError};

mod export;
pub use export::{export_wav, write_wav};

mod load;
pub use load::{load_wav, LoadOptions};
