//! Callback tick delta tracking.

/// Converts absolute callback times into signed tick deltas.
///
/// The driver passes a monotonically increasing callback counter. Skipped
/// callbacks show up as deltas greater than one, rewinds as negative deltas.
/// A backwards jump larger than half the counter range is taken to be the
/// counter wrapping and yields `-1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallbackClock {
    last: Option<u32>,
}

impl CallbackClock {
    const WRAPAROUND_THRESHOLD: u32 = u32::MAX / 2;

    pub fn new() -> Self {
        Self::default()
    }

    /// Record `time` and return the delta since the previous tick.
    /// The first tick always returns 1.
    pub fn tick(&mut self, time: u32) -> i64 {
        let Some(last) = self.last.replace(time) else {
            return 1;
        };

        if time >= last {
            i64::from(time - last)
        } else {
            let diff = last - time;
            if diff > Self::WRAPAROUND_THRESHOLD {
                -1
            } else {
                -i64::from(diff)
            }
        }
    }

    /// Time passed to the most recent tick.
    pub fn last_time(&self) -> Option<u32> {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
