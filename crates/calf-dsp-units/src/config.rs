// SPDX-License-Identifier: LGPL-3.0-or-later

//! Serializable clipper settings.
//!
//! A host can persist a [`ShapingClipperConfig`] in whatever format it
//! uses and rebuild or retune a clipper from it. Missing fields fall back
//! to their defaults.

use serde::{Deserialize, Serialize};

use crate::consts::{CLIPPER_DFL_ADAPTIVE_STRENGTH, CLIPPER_DFL_CLIP_LEVEL, CLIPPER_DFL_ITERATIONS};
use crate::dynamics::margin_curve::{DEFAULT_MARGIN_POINTS, MarginCurve, MarginPoint, validate_points};
use crate::dynamics::shaping_clipper::ShapingClipper;
use crate::error::{ClipperError, ClipperResult};

/// Complete set of shaping clipper parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapingClipperConfig {
    /// Sample rate in Hz
    pub sample_rate: f32,
    /// Frame length in samples, a multiple of 4
    pub fft_size: usize,
    /// Peak level the output is held to
    pub clip_level: f32,
    /// Clipping passes per frame (0 bypasses)
    pub iterations: usize,
    /// How far the masking threshold may be relaxed (0.0 to 1.0)
    pub adaptive_distortion_strength: f32,
    /// Margin curve control points, (Hz, dB)
    pub margin_curve: Vec<MarginPoint>,
}

impl Default for ShapingClipperConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100.0,
            fft_size: 1024, // ~23 ms frames at 44.1 kHz
            clip_level: CLIPPER_DFL_CLIP_LEVEL,
            iterations: CLIPPER_DFL_ITERATIONS,
            adaptive_distortion_strength: CLIPPER_DFL_ADAPTIVE_STRENGTH,
            margin_curve: DEFAULT_MARGIN_POINTS.to_vec(),
        }
    }
}

impl ShapingClipperConfig {
    /// Set the sample rate in Hz.
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the frame length in samples.
    pub fn with_fft_size(mut self, fft_size: usize) -> Self {
        self.fft_size = fft_size;
        self
    }

    /// Set the clip level (linear amplitude).
    pub fn with_clip_level(mut self, clip_level: f32) -> Self {
        self.clip_level = clip_level;
        self
    }

    /// Set the number of clipping passes per frame.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the adaptive distortion strength.
    pub fn with_adaptive_distortion_strength(mut self, strength: f32) -> Self {
        self.adaptive_distortion_strength = strength;
        self
    }

    /// Replace the margin curve control points.
    pub fn with_margin_curve(mut self, points: impl Into<Vec<MarginPoint>>) -> Self {
        self.margin_curve = points.into();
        self
    }

    /// Check every field without building anything.
    pub fn validate(&self) -> ClipperResult<()> {
        if self.fft_size == 0 || self.fft_size % 4 != 0 {
            return Err(ClipperError::InvalidFftSize(self.fft_size));
        }
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(ClipperError::InvalidSampleRate(self.sample_rate));
        }
        if !(self.clip_level.is_finite() && self.clip_level > 0.0) {
            return Err(ClipperError::InvalidClipLevel(self.clip_level));
        }
        let strength = self.adaptive_distortion_strength;
        if !(strength.is_finite() && strength >= 0.0) {
            return Err(ClipperError::InvalidAdaptiveStrength(strength));
        }
        validate_points(&self.margin_curve)
    }
}

impl ShapingClipper {
    /// Build a clipper from a complete configuration.
    pub fn from_config(config: &ShapingClipperConfig) -> ClipperResult<Self> {
        config.validate()?;

        let mut clipper = Self::with_clip_level(config.sample_rate, config.fft_size, config.clip_level)?;
        clipper
            .set_iterations(config.iterations)
            .set_adaptive_distortion_strength(config.adaptive_distortion_strength);
        clipper.set_margin_curve(&config.margin_curve)?;
        Ok(clipper)
    }

    /// Retune this clipper to `config`.
    ///
    /// When the sample rate and frame size are unchanged only the
    /// parameters are updated and the signal history survives. Otherwise
    /// the clipper is rebuilt from scratch. On error nothing changes.
    pub fn apply_config(&mut self, config: &ShapingClipperConfig) -> ClipperResult<()> {
        config.validate()?;

        if config.sample_rate != self.sample_rate() || config.fft_size != self.fft_size() {
            log::debug!(
                "shaping clipper: rebuilding for fft_size={} sample_rate={}",
                config.fft_size,
                config.sample_rate
            );
            *self = Self::from_config(config)?;
            return Ok(());
        }

        // Build the curve first so a failure leaves the clipper untouched
        let curve = MarginCurve::build(&config.margin_curve, config.sample_rate, config.fft_size)?;
        self.replace_margin_curve(curve);
        self.set_clip_level(config.clip_level)
            .set_iterations(config.iterations)
            .set_adaptive_distortion_strength(config.adaptive_distortion_strength);
        Ok(())
    }

    /// Snapshot of the current parameters, including the control points
    /// of the margin curve in use.
    pub fn to_config(&self) -> ShapingClipperConfig {
        ShapingClipperConfig {
            sample_rate: self.sample_rate(),
            fft_size: self.fft_size(),
            clip_level: self.clip_level(),
            iterations: self.iterations(),
            adaptive_distortion_strength: self.adaptive_distortion_strength(),
            margin_curve: self.margin_points().to_vec(),
        }
    }
}
