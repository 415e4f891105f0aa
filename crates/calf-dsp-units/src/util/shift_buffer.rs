// SPDX-License-Identifier: LGPL-3.0-or-later

//! Fixed-length sliding frame for hop-based spectral processing.
//!
//! The buffer always holds exactly `len()` samples. Each `shift_in()`
//! drops the oldest samples from the front and appends the new ones at
//! the back, so `data()` is the most recent frame as one contiguous
//! slice, ready to be windowed and transformed.
//!
//! # Examples
//! ```
//! use calf_dsp_units::util::shift_buffer::ShiftBuffer;
//!
//! let mut sb = ShiftBuffer::new(4);
//! sb.shift_in(&[1.0, 2.0]);
//! assert_eq!(sb.data(), &[0.0, 0.0, 1.0, 2.0]);
//!
//! sb.shift_in(&[3.0]);
//! assert_eq!(sb.data(), &[0.0, 1.0, 2.0, 3.0]);
//!
//! // The oldest samples sit at the front
//! assert_eq!(sb.head(2), &[0.0, 1.0]);
//! ```

/// Fixed-length FIFO frame shifted one hop at a time.
///
/// Starts zero-filled. Unlike a circular buffer, `data()` is always
/// contiguous and in chronological order.
#[derive(Debug, Clone)]
pub struct ShiftBuffer {
    buffer: Vec<f32>,
}

impl ShiftBuffer {
    /// Create a zero-filled frame of `len` samples.
    pub fn new(len: usize) -> Self {
        Self {
            buffer: vec![0.0; len],
        }
    }

    /// Return the frame length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Return true if the frame has zero length.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Shift the frame left by `data.len()` and append `data` at the back.
    ///
    /// If `data` is longer than the frame, only its last `len()` samples
    /// are kept.
    pub fn shift_in(&mut self, data: &[f32]) {
        let len = self.buffer.len();
        let count = data.len().min(len);
        let data = &data[data.len() - count..];

        self.buffer.copy_within(count.., 0);
        self.buffer[len - count..].copy_from_slice(data);
    }

    /// Shift the frame left by `count` and append `count` zeros.
    pub fn shift_in_zeros(&mut self, count: usize) {
        let len = self.buffer.len();
        let count = count.min(len);

        self.buffer.copy_within(count.., 0);
        self.buffer[len - count..].fill(0.0);
    }

    /// Return the whole frame, oldest sample first.
    pub fn data(&self) -> &[f32] {
        &self.buffer
    }

    /// Return the whole frame mutably.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.buffer
    }

    /// Return the `count` oldest samples.
    pub fn head(&self, count: usize) -> &[f32] {
        &self.buffer[..count.min(self.buffer.len())]
    }

    /// Zero the whole frame.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
    }
}
