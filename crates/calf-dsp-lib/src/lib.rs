// SPDX-License-Identifier: LGPL-3.0-or-later

//! # calf-dsp-lib
//!
//! Low-level DSP primitives backing the Calf shaping clipper.
//!
//! - **FFT**: cached real-input forward/inverse transforms via `realfft`
//! - **Complex spectra**: one-sided magnitude and per-bin magnitude limiting
//! - **Math**: packed (element-wise) and horizontal (reduction) buffer ops
//!
//! ## Design
//!
//! Buffer-processing functions use runtime SIMD dispatch via the
//! `multiversion` crate. Each annotated function is compiled for
//! AVX2+FMA, AVX, SSE4.1, and NEON targets; the best variant is
//! selected automatically at startup. The FFT delegates to `rustfft`
//! (through `realfft`), which already provides SIMD implementations.

pub mod complex;
pub mod fft;
pub mod math;
