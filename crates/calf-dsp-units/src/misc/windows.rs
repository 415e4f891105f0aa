// SPDX-License-Identifier: LGPL-3.0-or-later

//! FFT window functions for overlap-add processing.
//!
//! Windows here are *periodic*: the denominator is `N` instead of `N - 1`,
//! so shifted copies at hop `N / 4` overlap without a seam. This is the
//! form spectral processors want; a symmetric window would leave a
//! one-sample ripple in the overlap sum.

use std::f64::consts::PI;

/// Generate a generalized periodic raised-cosine window,
/// `a - b * cos(2πi / N)`.
fn hamming_periodic_general(dst: &mut [f32], a: f64, b: f64) {
    let n = dst.len();
    if n == 0 {
        return;
    }

    let f = 2.0 * PI / n as f64;
    for (i, sample) in dst.iter_mut().enumerate() {
        *sample = (a - b * (i as f64 * f).cos()) as f32;
    }
}

/// Generate a periodic Hann window.
///
/// # Examples
/// ```
/// use calf_dsp_units::misc::windows::hann_periodic;
///
/// let mut window = vec![0.0; 8];
/// hann_periodic(&mut window);
/// assert_eq!(window[0], 0.0);
/// assert_eq!(window[4], 1.0);
/// ```
pub fn hann_periodic(dst: &mut [f32]) {
    hamming_periodic_general(dst, 0.5, 0.5);
}

/// Generate the reciprocal of a window.
///
/// Samples where the window is at or below `floor` map to `0.0` instead of
/// a huge reciprocal, so the edges of a frame drop out of any peak search
/// that multiplies by the inverse window.
///
/// # Arguments
/// * `dst` - Destination buffer
/// * `window` - Window coefficients
/// * `floor` - Smallest window value that still gets inverted
pub fn inverse(dst: &mut [f32], window: &[f32], floor: f32) {
    for (d, &w) in dst.iter_mut().zip(window.iter()) {
        *d = if w > floor { 1.0 / w } else { 0.0 };
    }
}
