// SPDX-License-Identifier: LGPL-3.0-or-later

//! Operations on one-sided complex spectra.
//!
//! A one-sided spectrum of a length-`n` real signal holds `n / 2 + 1` bins.
//! The negative frequencies are omitted, so the amplitude of every bin
//! except DC and Nyquist is half of what the signal actually carries at
//! that frequency. [`spectrum_mag`] and [`limit_spectrum_mag`] compensate
//! by doubling those bins, so their results are comparable across the
//! whole spectrum.

use multiversion::multiversion;
use num_complex::Complex32;

/// Magnitude of a single bin of a one-sided spectrum with `bins` entries.
///
/// DC and Nyquist use the absolute value of the real part; all other bins
/// are doubled to account for their omitted negative-frequency twin.
#[inline]
pub fn bin_mag(c: Complex32, bin: usize, bins: usize) -> f32 {
    if bin == 0 || bin + 1 == bins {
        c.re.abs()
    } else {
        c.norm() * 2.0
    }
}

/// One-sided magnitude spectrum: `dst[i] = bin_mag(src[i])`.
#[multiversion(targets("x86_64+avx2+fma", "x86_64+avx", "x86_64+sse4.1", "aarch64+neon",))]
pub fn spectrum_mag(dst: &mut [f32], src: &[Complex32]) {
    let bins = src.len();
    for (i, (d, &c)) in dst.iter_mut().zip(src.iter()).enumerate() {
        *d = bin_mag(c, i, bins);
    }
}

/// Limit the one-sided magnitude of each bin to `limit[i]`, preserving phase.
///
/// Bins already within their limit are left untouched. A limit of zero
/// removes the bin entirely.
#[multiversion(targets("x86_64+avx2+fma", "x86_64+avx", "x86_64+sse4.1", "aarch64+neon",))]
pub fn limit_spectrum_mag(spectrum: &mut [Complex32], limit: &[f32]) {
    let bins = spectrum.len();
    for (i, (c, &lim)) in spectrum.iter_mut().zip(limit.iter()).enumerate() {
        let level = bin_mag(*c, i, bins);
        if level > lim {
            *c *= lim / level;
        }
    }
}
