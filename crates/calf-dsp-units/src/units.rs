// SPDX-License-Identifier: LGPL-3.0-or-later

//! Unit conversion functions.
//!
//! Conversions from decibels to linear gain and from FFT bin indices
//! to frequencies.

/// Convert decibels to linear gain (amplitude ratio).
///
/// # Arguments
/// * `db` - Level in decibels
///
/// # Returns
/// Linear gain (amplitude ratio)
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    (db * (std::f32::consts::LN_10 / 20.0)).exp()
}

/// Centre frequency of an FFT bin.
///
/// # Arguments
/// * `sr` - Sample rate in Hz
/// * `fft_size` - Transform length in samples
/// * `bin` - Bin index
///
/// # Returns
/// Frequency in Hz
#[inline]
pub fn bin_to_frequency(sr: f32, fft_size: usize, bin: usize) -> f32 {
    bin as f32 * sr / fft_size as f32
}
