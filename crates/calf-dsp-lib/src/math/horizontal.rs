// SPDX-License-Identifier: LGPL-3.0-or-later

//! Horizontal (reduction) operations on float buffers.

use multiversion::multiversion;

/// Maximum of `|a[i] * b[i]|`. Returns `0.0` for empty buffers.
#[multiversion(targets("x86_64+avx2+fma", "x86_64+avx", "x86_64+sse4.1", "aarch64+neon",))]
pub fn abs_max_mul(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x * y).abs())
        .fold(0.0, f32::max)
}

/// Maximum of `|(a[i] + b[i]) * c[i]|`.
#[multiversion(targets("x86_64+avx2+fma", "x86_64+avx", "x86_64+sse4.1", "aarch64+neon",))]
pub fn abs_max_sum_mul(a: &[f32], b: &[f32], c: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .zip(c.iter())
        .map(|((&x, &y), &z)| ((x + y) * z).abs())
        .fold(0.0, f32::max)
}
