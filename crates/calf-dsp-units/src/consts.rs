// SPDX-License-Identifier: LGPL-3.0-or-later

//! Gain constants and processor defaults.

// Gain constants (linear amplitude ratios for common dB values)

/// +1 dB amplitude gain (~1.122)
pub const GAIN_AMP_P_1_DB: f32 = 1.122_018_5;

/// 0 dB amplitude gain (1.0)
pub const GAIN_AMP_0_DB: f32 = 1.0;

/// +1% peak overshoot, the tolerance below which a frame counts as clipped
pub const GAIN_AMP_P_1_PCT: f32 = 1.01;

// Shaping clipper defaults

/// Default clip level, in input sample units
pub const CLIPPER_DFL_CLIP_LEVEL: f32 = 16384.0;

/// Default number of clipping iterations per frame
pub const CLIPPER_DFL_ITERATIONS: usize = 6;

/// Default adaptive distortion strength
pub const CLIPPER_DFL_ADAPTIVE_STRENGTH: f32 = 1.0;

/// Maximum sample rate at which every bin below Nyquist gets the masking spread
pub const CLIPPER_FULL_PSY_SR_MAX: f32 = 50_000.0;

/// Maximum sample rate at which the lower half of the bins gets the masking spread
pub const CLIPPER_HALF_PSY_SR_MAX: f32 = 100_000.0;

#[cfg(test)]
#[allow(clippy::assertions_on_constants)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_constants_order() {
        assert!(GAIN_AMP_P_1_DB > GAIN_AMP_P_1_PCT);
        assert!(GAIN_AMP_P_1_PCT > GAIN_AMP_0_DB);
        assert!((GAIN_AMP_P_1_DB - crate::units::db_to_gain(1.0)).abs() < 1e-5);
    }

    #[test]
    fn test_psy_thresholds_order() {
        assert!(CLIPPER_FULL_PSY_SR_MAX < CLIPPER_HALF_PSY_SR_MAX);
    }
}
