//! Row-tiled window geometry.
//!
//! The downstream consumer reads the scrub window as a 2D grid. Each tile row
//! holds, for every channel, one row of sample data followed by one row of
//! zeros:
//!
//! ```text
//! row 0: ch0 samples [0, w)
//! row 1: zeros
//! row 2: ch1 samples [0, w)
//! row 3: zeros
//! row 4: ch0 samples [w, 2w)
//! ...
//! ```
//!
//! The interleaving is a compatibility contract and must not change.

/// Default widest row accepted by the consumer.
pub const MAX_ROW_WIDTH: usize = 4096;

/// Geometry of a materialized scrub window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowLayout {
    /// Samples per data row
    pub row_width: usize,
    /// Data rows per channel
    pub rows_per_channel: usize,
    /// Samples per channel covered by the window
    pub window_size: usize,
}

impl WindowLayout {
    /// Layout with `window_size = row_width * rows_per_channel`.
    pub fn new(row_width: usize, rows_per_channel: usize) -> Self {
        Self {
            row_width,
            rows_per_channel,
            window_size: row_width.saturating_mul(rows_per_channel),
        }
    }

    /// Resolve a requested duration into a layout.
    ///
    /// The request is never smaller than one callback period. The row width is
    /// capped by `max_row_width` and the window is rounded down to a whole
    /// number of rows.
    pub fn for_duration(
        seconds: f32,
        frames_per_buffer: usize,
        sample_rate: u32,
        max_row_width: usize,
    ) -> Self {
        let requested = (seconds.max(0.0) * sample_rate as f32) as usize;
        let requested = requested.max(frames_per_buffer);

        let row_width = max_row_width.min(requested);
        if row_width == 0 {
            return Self::default();
        }
        Self::new(row_width, requested / row_width)
    }

    /// Number of rows in the tiled buffer (data and zero rows).
    pub fn height(&self, num_channels: usize) -> usize {
        num_channels * self.rows_per_channel * 2
    }

    /// Total samples in the tiled buffer.
    pub fn buffer_len(&self, num_channels: usize) -> usize {
        self.row_width * self.height(num_channels)
    }

    /// Index of the data row for `channel` in tile row `row`.
    /// The zero row follows at `data_row + 1`.
    #[inline]
    pub fn data_row(&self, channel: usize, row: usize, num_channels: usize) -> usize {
        row * (num_channels * 2) + channel * 2
    }

    /// Location of window-relative sample `index` of `channel` in the tiled
    /// buffer, or `None` outside the window.
    #[inline]
    pub fn locate(&self, channel: usize, index: usize, num_channels: usize) -> Option<usize> {
        if index >= self.window_size || channel >= num_channels || self.row_width == 0 {
            return None;
        }
        let row = index / self.row_width;
        let column = index % self.row_width;
        Some(self.data_row(channel, row, num_channels) * self.row_width + column)
    }

    pub fn is_empty(&self) -> bool {
        self.window_size == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_duration_layout() {
        // 2 seconds at 44.1kHz = 88200 samples -> 21 rows of 4096
        let layout = WindowLayout::for_duration(2.0, 256, 44100, MAX_ROW_WIDTH);
        assert_eq!(layout.row_width, 4096);
        assert_eq!(layout.rows_per_channel, 21);
        assert_eq!(layout.window_size, 86016);
        assert_eq!(layout.height(2), 84);
        assert_eq!(layout.buffer_len(2), 4096 * 84);
    }

    #[test]
    fn test_short_duration_is_one_row() {
        let layout = WindowLayout::for_duration(0.01, 256, 44100, MAX_ROW_WIDTH);
        assert_eq!(layout.row_width, 441);
        assert_eq!(layout.rows_per_channel, 1);
        assert_eq!(layout.window_size, 441);
    }

    #[test]
    fn test_duration_never_below_one_callback() {
        let layout = WindowLayout::for_duration(0.0, 512, 48000, MAX_ROW_WIDTH);
        assert_eq!(layout.window_size, 512);

        let layout = WindowLayout::for_duration(f32::NAN, 512, 48000, MAX_ROW_WIDTH);
        assert_eq!(layout.window_size, 512);
    }

    #[test]
    fn test_zero_everything_is_empty() {
        let layout = WindowLayout::for_duration(0.0, 0, 44100, MAX_ROW_WIDTH);
        assert!(layout.is_empty());
        assert_eq!(layout.buffer_len(2), 0);
    }

    #[test]
    fn test_data_row_interleaving() {
        let layout = WindowLayout::new(4, 3);
        // ch0 row0, ch1 row0, ch0 row1
        assert_eq!(layout.data_row(0, 0, 2), 0);
        assert_eq!(layout.data_row(1, 0, 2), 2);
        assert_eq!(layout.data_row(0, 1, 2), 4);
        assert_eq!(layout.data_row(1, 2, 2), 10);
    }

    #[test]
    fn test_locate() {
        let layout = WindowLayout::new(4, 2);
        assert_eq!(layout.locate(0, 0, 2), Some(0));
        assert_eq!(layout.locate(0, 5, 2), Some(4 * 4 + 1));
        assert_eq!(layout.locate(1, 3, 2), Some(2 * 4 + 3));
        assert_eq!(layout.locate(0, 8, 2), None);
        assert_eq!(layout.locate(2, 0, 2), None);
    }
}
