// SPDX-License-Identifier: LGPL-3.0-or-later

//! Error types for processor configuration and streaming.

use calf_dsp_lib::fft::FftError;
use thiserror::Error;

/// Errors raised by the shaping clipper and its helpers.
///
/// Configuration errors are structural: the processor is left unchanged
/// and the caller has to retry with valid parameters.
#[derive(Error, Debug)]
pub enum ClipperError {
    /// FFT size is zero or not a multiple of 4
    #[error("FFT size must be a positive multiple of 4, got {0}")]
    InvalidFftSize(usize),

    /// Sample rate is not a finite positive number
    #[error("Sample rate must be finite and positive, got {0}")]
    InvalidSampleRate(f32),

    /// Clip level is not a finite positive number
    #[error("Clip level must be finite and positive, got {0}")]
    InvalidClipLevel(f32),

    /// Adaptive distortion strength is negative or not finite
    #[error("Adaptive distortion strength must be finite and non-negative, got {0}")]
    InvalidAdaptiveStrength(f32),

    /// Margin curve control points are malformed
    #[error("Invalid margin curve: {0}")]
    InvalidMarginCurve(String),

    /// Input or output block does not match the feed size
    #[error("Block size mismatch: expected {expected} samples, got {actual}")]
    BlockSize { expected: usize, actual: usize },

    /// FFT backend rejected a buffer
    #[error(transparent)]
    Fft(#[from] FftError),
}

/// Result type for clipper operations
pub type ClipperResult<T> = Result<T, ClipperError>;
