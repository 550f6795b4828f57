//! Tape storage and variable-speed scrubbing for real-time audio.
//!
//! # Primary API
//!
//! - [`Tape`]: multi-channel sample store, unbounded or fixed-capacity
//! - [`ScrubWindow`]: moving read cursor plus a materialized, row-tiled window
//!   over a [`SharedTape`]
//! - [`WindowLayout`]: geometry of the row-tiled window buffer
//! - [`CallbackClock`]: callback counter to tick delta conversion
//!
//! # Feature-gated APIs
//!
//! - `"serde"`: `Serialize`/`Deserialize` for [`TapeConfig`] and [`ScrubConfig`]
//!
//! # Example
//!
//! ```
//! use tapedeck_core::{ScrubConfig, ScrubWindow, Tape};
//!
//! let tape = Tape::new(256, 44100, 2, None).into_shared();
//! tape.write().record(&vec![0.5; 512]);
//!
//! let mut scrub = ScrubWindow::new(ScrubConfig::default());
//! scrub.set_tape(&tape)?;
//! scrub.set_speed(0.5);
//! scrub.update(0);
//! assert_eq!(scrub.position(), 128);
//! # Ok::<(), tapedeck_core::Error>(())
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod clock;
pub use clock::CallbackClock;

pub mod config;
pub use config::{ScrubConfig, TapeConfig};

pub mod layout;
pub use layout::{WindowLayout, MAX_ROW_WIDTH};

pub mod tape;
pub use tape::{SampleLayout, SharedTape, Tape};

pub mod scrub;
pub use scrub::{ScrubWindow, UNSET_OFFSET};
