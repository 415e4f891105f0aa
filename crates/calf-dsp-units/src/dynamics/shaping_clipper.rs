// SPDX-License-Identifier: LGPL-3.0-or-later

//! Psychoacoustic shaping clipper.
//!
//! A brick-wall clipper that works on overlapping Hann-windowed frames.
//! Each frame, it computes what a hard clip would remove and turns that
//! into a correction signal. It then shapes the correction in the frequency
//! domain, so that in every bin the correction stays below a masking
//! threshold derived from the frame itself. Clipping the shaped
//! correction again, several times over, moves the output peak towards
//! the clip level while keeping the added distortion where the ear
//! cannot hear it.
//!
//! Frames are `fft_size` samples long and advance by a hop of
//! `fft_size / 4`. The output is delayed by three hops.

use calf_dsp_lib::complex::{limit_spectrum_mag, spectrum_mag};
use calf_dsp_lib::fft::{RealFft, normalize};
use calf_dsp_lib::math::horizontal::{abs_max_mul, abs_max_sum_mul};
use calf_dsp_lib::math::packed;
use num_complex::Complex32;

use crate::consts::{
    CLIPPER_DFL_ADAPTIVE_STRENGTH, CLIPPER_DFL_CLIP_LEVEL, CLIPPER_DFL_ITERATIONS,
    CLIPPER_FULL_PSY_SR_MAX, CLIPPER_HALF_PSY_SR_MAX, GAIN_AMP_0_DB, GAIN_AMP_P_1_DB,
    GAIN_AMP_P_1_PCT,
};
use crate::dynamics::margin_curve::{MarginCurve, MarginPoint};
use crate::dynamics::spread_table::SpreadTable;
use crate::error::{ClipperError, ClipperResult};
use crate::misc::windows;
use crate::util::shift_buffer::ShiftBuffer;

/// Window values at or below this are excluded from peak measurement.
const INV_WINDOW_FLOOR: f32 = 0.1;

/// Overlap-add gain of a squared Hann window at 75 % overlap.
const OLA_GAIN: f32 = 1.5;

/// What [`ShapingClipper::feed`] writes to its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Delayed input plus the clipping correction.
    #[default]
    Clipped,
    /// The clipping correction alone.
    DistortionOnly,
}

/// Number of low bins modelled with the spreading function.
///
/// At high sample rates the upper bins lie above the audible band, so
/// the spread is restricted to the lower half or quarter of the spectrum.
fn psy_bins_for(sample_rate: f32, fft_size: usize) -> usize {
    if sample_rate <= CLIPPER_FULL_PSY_SR_MAX {
        fft_size / 2
    } else if sample_rate <= CLIPPER_HALF_PSY_SR_MAX {
        fft_size / 4
    } else {
        fft_size / 8
    }
}

/// Hop-based psychoacoustic clipper.
///
/// # Examples
/// ```
/// use calf_dsp_units::dynamics::shaping_clipper::{OutputMode, ShapingClipper};
///
/// let mut clipper = ShapingClipper::with_clip_level(44100.0, 1024, 1.0).unwrap();
/// let hop = clipper.feed_size();
///
/// let input = vec![0.5f32; hop];
/// let mut output = vec![0.0f32; hop];
/// for _ in 0..8 {
///     clipper.feed(&input, &mut output, OutputMode::Clipped).unwrap();
/// }
/// // Below the clip level the input comes through untouched
/// assert!(output.iter().all(|&v| v == 0.5));
/// ```
#[derive(Debug, Clone)]
pub struct ShapingClipper {
    size: usize,
    hop: usize,
    sample_rate: f32,

    // Parameters
    clip_level: f32,
    iterations: usize,
    adaptive_distortion_strength: f32,

    // Analysis tables
    window: Vec<f32>,
    inv_window: Vec<f32>,
    margin_curve: MarginCurve,
    spread_table: SpreadTable,

    // Streaming state
    in_frame: ShiftBuffer,
    out_dist_frame: ShiftBuffer,

    // Per-frame scratch
    fft: RealFft,
    windowed_frame: Vec<f32>,
    clipping_delta: Vec<f32>,
    spectrum: Vec<Complex32>,
    magnitudes: Vec<f32>,
    mask_curve: Vec<f32>,
}

impl ShapingClipper {
    /// Create a clipper with the default clip level (16384).
    pub fn new(sample_rate: f32, fft_size: usize) -> ClipperResult<Self> {
        Self::with_clip_level(sample_rate, fft_size, CLIPPER_DFL_CLIP_LEVEL)
    }

    /// Create a clipper for frames of `fft_size` samples at `sample_rate`.
    ///
    /// # Errors
    /// - [`ClipperError::InvalidFftSize`] if `fft_size` is zero or not a
    ///   multiple of 4.
    /// - [`ClipperError::InvalidSampleRate`] if `sample_rate` is not
    ///   finite and positive.
    /// - [`ClipperError::InvalidClipLevel`] if `clip_level` is not finite
    ///   and positive.
    pub fn with_clip_level(sample_rate: f32, fft_size: usize, clip_level: f32) -> ClipperResult<Self> {
        if fft_size == 0 || fft_size % 4 != 0 {
            return Err(ClipperError::InvalidFftSize(fft_size));
        }
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(ClipperError::InvalidSampleRate(sample_rate));
        }
        if !(clip_level.is_finite() && clip_level > 0.0) {
            return Err(ClipperError::InvalidClipLevel(clip_level));
        }

        let bins = fft_size / 2 + 1;
        let num_psy_bins = psy_bins_for(sample_rate, fft_size);

        let mut window = vec![0.0f32; fft_size];
        windows::hann_periodic(&mut window);
        let mut inv_window = vec![0.0f32; fft_size];
        windows::inverse(&mut inv_window, &window, INV_WINDOW_FLOOR);

        let margin_curve = MarginCurve::default_for(sample_rate, fft_size)?;
        let spread_table = SpreadTable::new(num_psy_bins);

        log::debug!(
            "shaping clipper: fft_size={fft_size} sample_rate={sample_rate} clip_level={clip_level} \
             psy_bins={num_psy_bins} spread_entries={}",
            spread_table.entries().len()
        );

        Ok(Self {
            size: fft_size,
            hop: fft_size / 4,
            sample_rate,
            clip_level,
            iterations: CLIPPER_DFL_ITERATIONS,
            adaptive_distortion_strength: CLIPPER_DFL_ADAPTIVE_STRENGTH,
            window,
            inv_window,
            margin_curve,
            spread_table,
            in_frame: ShiftBuffer::new(fft_size),
            out_dist_frame: ShiftBuffer::new(fft_size),
            fft: RealFft::new(fft_size),
            windowed_frame: vec![0.0; fft_size],
            clipping_delta: vec![0.0; fft_size],
            spectrum: vec![Complex32::new(0.0, 0.0); bins],
            magnitudes: vec![0.0; bins],
            mask_curve: vec![0.0; bins],
        })
    }

    /// Number of samples consumed and produced by each [`feed`](Self::feed).
    pub fn feed_size(&self) -> usize {
        self.hop
    }

    /// Frame length in samples.
    pub fn fft_size(&self) -> usize {
        self.size
    }

    /// Sample rate the tables were built for.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Delay between input and output in samples (three hops).
    pub fn latency(&self) -> usize {
        3 * self.hop
    }

    /// Number of spectrum bins, DC through Nyquist.
    pub fn bins(&self) -> usize {
        self.size / 2 + 1
    }

    /// Number of low bins that use the spreading function.
    pub fn psy_bins(&self) -> usize {
        self.spread_table.num_bins()
    }

    /// Set the clip level (linear amplitude).
    ///
    /// A level that is not finite and positive disables clipping: the
    /// input is passed through with the usual delay.
    pub fn set_clip_level(&mut self, clip_level: f32) -> &mut Self {
        if !(clip_level.is_finite() && clip_level > 0.0) {
            log::warn!("shaping clipper: clip level {clip_level} disables clipping");
        }
        self.clip_level = clip_level;
        self
    }

    /// Current clip level.
    pub fn clip_level(&self) -> f32 {
        self.clip_level
    }

    /// Set the number of clipping passes per frame. Zero bypasses.
    pub fn set_iterations(&mut self, iterations: usize) -> &mut Self {
        self.iterations = iterations;
        self
    }

    /// Current number of clipping passes per frame.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Set how strongly the masking threshold is relaxed while a frame
    /// still overshoots.
    ///
    /// `0.0` keeps the threshold fixed (least distortion, peaks may remain
    /// above the clip level); `1.0` relaxes it as far as needed to reach
    /// the clip level. Negative or non-finite values are ignored and the
    /// current strength is kept.
    pub fn set_adaptive_distortion_strength(&mut self, strength: f32) -> &mut Self {
        if strength.is_finite() && strength >= 0.0 {
            self.adaptive_distortion_strength = strength;
        } else {
            log::warn!("shaping clipper: ignoring adaptive distortion strength {strength}");
        }
        self
    }

    /// Current adaptive distortion strength.
    pub fn adaptive_distortion_strength(&self) -> f32 {
        self.adaptive_distortion_strength
    }

    /// Replace the margin curve with one interpolated from `points`.
    ///
    /// On error the current curve is kept.
    pub fn set_margin_curve(&mut self, points: &[MarginPoint]) -> ClipperResult<()> {
        let curve = MarginCurve::build(points, self.sample_rate, self.size)?;
        log::debug!(
            "shaping clipper: margin curve rebuilt from {} points over {} bins",
            points.len(),
            curve.len()
        );
        self.replace_margin_curve(curve);
        Ok(())
    }

    /// Install a curve already built for this sample rate and frame size.
    pub(crate) fn replace_margin_curve(&mut self, curve: MarginCurve) {
        debug_assert_eq!(curve.len(), self.bins());
        self.margin_curve = curve;
    }

    /// Per-bin margin in linear amplitude.
    pub fn margin_curve(&self) -> &[f32] {
        self.margin_curve.ratios()
    }

    /// Control points of the margin curve in use.
    pub fn margin_points(&self) -> &[MarginPoint] {
        self.margin_curve.points()
    }

    /// Forget all history: the next output starts from silence.
    pub fn clear(&mut self) {
        self.in_frame.clear();
        self.out_dist_frame.clear();
    }

    /// Process one hop.
    ///
    /// `input` and `output` must both hold exactly
    /// [`feed_size`](Self::feed_size) samples. The output lags the input
    /// by [`latency`](Self::latency) samples.
    ///
    /// Returns the factor by which this frame had to relax its masking
    /// threshold to reach the clip level, `1.0` when it did not need to.
    ///
    /// # Errors
    /// [`ClipperError::BlockSize`] if either buffer has the wrong length,
    /// in which case no state changes.
    pub fn feed(&mut self, input: &[f32], output: &mut [f32], mode: OutputMode) -> ClipperResult<f32> {
        for actual in [input.len(), output.len()] {
            if actual != self.hop {
                return Err(ClipperError::BlockSize {
                    expected: self.hop,
                    actual,
                });
            }
        }

        self.in_frame.shift_in(input);
        self.out_dist_frame.shift_in_zeros(self.hop);

        let mut total_margin_shift = GAIN_AMP_0_DB;
        if self.clipping_enabled() {
            packed::mul(&mut self.windowed_frame, self.in_frame.data(), &self.window);

            // A frame entirely within the limit leaves the correction at zero
            if self.frame_exceeds_limit() {
                self.fft.direct(&mut self.spectrum, &self.windowed_frame)?;
                self.calculate_mask_curve();

                self.clipping_delta.fill(0.0);
                total_margin_shift = self.clip_iterations()?;
                packed::mul_add(self.out_dist_frame.data_mut(), &self.clipping_delta, &self.window);
            }
        }

        let dist = self.out_dist_frame.head(self.hop);
        match mode {
            OutputMode::Clipped => {
                let dry = self.in_frame.head(self.hop);
                for ((out, &d), &x) in output.iter_mut().zip(dist).zip(dry) {
                    *out = d / OLA_GAIN + x;
                }
            }
            OutputMode::DistortionOnly => {
                for (out, &d) in output.iter_mut().zip(dist) {
                    *out = d / OLA_GAIN;
                }
            }
        }

        Ok(total_margin_shift)
    }

    fn clipping_enabled(&self) -> bool {
        self.iterations > 0 && self.clip_level.is_finite() && self.clip_level > 0.0
    }

    fn frame_exceeds_limit(&self) -> bool {
        let clip_level = self.clip_level;
        self.windowed_frame
            .iter()
            .zip(&self.window)
            .any(|(&x, &w)| x.abs() > clip_level * w)
    }

    /// Masking threshold of the current spectrum, divided by the margin.
    fn calculate_mask_curve(&mut self) {
        spectrum_mag(&mut self.magnitudes, &self.spectrum);

        let psy_bins = self.spread_table.num_bins();
        self.mask_curve.fill(0.0);
        self.spread_table.spread_into(&self.magnitudes, &mut self.mask_curve);
        self.mask_curve[psy_bins..].copy_from_slice(&self.magnitudes[psy_bins..]);

        for (m, &ratio) in self.mask_curve.iter_mut().zip(self.margin_curve.ratios()) {
            *m /= ratio;
        }
    }

    /// Iteratively build `clipping_delta` for the current frame.
    fn clip_iterations(&mut self) -> ClipperResult<f32> {
        let iterations = self.iterations;
        // Last third of the passes overshoot the correction
        let boost_from = iterations - iterations / 3;

        let orig_peak = abs_max_mul(&self.windowed_frame, &self.inv_window) / self.clip_level;
        let mut peak = orig_peak;
        let mut total_margin_shift = GAIN_AMP_0_DB;

        for i in 0..iterations {
            let delta_boost = if i >= boost_from && peak < 2.0 { 2.0 } else { 1.0 };
            clip_to_window(
                &mut self.clipping_delta,
                &self.windowed_frame,
                &self.window,
                self.clip_level,
                delta_boost,
            );

            self.fft.direct(&mut self.spectrum, &self.clipping_delta)?;
            limit_spectrum_mag(&mut self.spectrum, &self.mask_curve);
            self.fft.reverse(&mut self.clipping_delta, &self.spectrum)?;
            normalize(&mut self.clipping_delta, self.size);

            peak = abs_max_sum_mul(&self.windowed_frame, &self.clipping_delta, &self.inv_window)
                / self.clip_level;

            let shift = mask_shift(
                orig_peak,
                peak,
                i + 1 < boost_from,
                self.adaptive_distortion_strength,
            );
            if peak > GAIN_AMP_P_1_PCT && i + 1 < iterations {
                total_margin_shift *= shift;
            }
            packed::scale(&mut self.mask_curve, shift);
        }

        Ok(total_margin_shift)
    }
}

/// Push `windowed + delta` back inside `±clip_level·window`.
///
/// The overshoot is added to `delta`, multiplied by `boost`.
fn clip_to_window(delta: &mut [f32], windowed: &[f32], window: &[f32], clip_level: f32, boost: f32) {
    for ((d, &x), &w) in delta.iter_mut().zip(windowed).zip(window) {
        let limit = clip_level * w;
        let effective = x + *d;
        if effective > limit {
            *d += (limit - effective) * boost;
        } else if effective < -limit {
            *d += (-limit - effective) * boost;
        }
    }
}

/// Factor by which to relax the mask after one clipping pass.
///
/// Never less than 1 dB. While the frame still overshoots, early passes
/// extrapolate from how much the last pass achieved, capped at the
/// remaining overshoot; late passes relax by the remaining overshoot.
fn mask_shift(orig_peak: f32, peak: f32, extrapolate: bool, strength: f32) -> f32 {
    let mut shift = GAIN_AMP_P_1_DB;
    if orig_peak > 1.0 && peak > 1.0 {
        let achieved = orig_peak - peak;
        if extrapolate && achieved > 0.0 {
            let needed = orig_peak - 1.0;
            shift = shift.max((needed / achieved).min(peak));
        } else {
            shift = shift.max(peak);
        }
    }
    1.0 + (shift - 1.0) * strength
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    const SR: f32 = 44100.0;
    const N: usize = 1024;

    fn run(clipper: &mut ShapingClipper, signal: &[f32], mode: OutputMode) -> Vec<f32> {
        let hop = clipper.feed_size();
        let mut out = vec![0.0f32; signal.len()];
        for (src, dst) in signal.chunks_exact(hop).zip(out.chunks_exact_mut(hop)) {
            clipper.feed(src, dst, mode).unwrap();
        }
        out
    }

    /// Deterministic bounded test signal with a crest well above 1.
    fn loud_signal(len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| {
                let t = i as f32 / SR;
                3.0 * (2.0 * std::f32::consts::PI * 220.0 * t).sin()
                    + 1.5 * (2.0 * std::f32::consts::PI * 3300.0 * t).sin()
            })
            .collect()
    }

    #[test]
    fn test_rejects_invalid_fft_size() {
        for size in [0usize, 2, 6, 1026] {
            assert!(matches!(
                ShapingClipper::new(SR, size),
                Err(ClipperError::InvalidFftSize(s)) if s == size
            ));
        }
        assert!(ShapingClipper::new(SR, 1000).is_ok());
    }

    #[test]
    fn test_rejects_invalid_rate_and_level() {
        assert!(matches!(
            ShapingClipper::new(0.0, N),
            Err(ClipperError::InvalidSampleRate(_))
        ));
        assert!(matches!(
            ShapingClipper::new(f32::NAN, N),
            Err(ClipperError::InvalidSampleRate(_))
        ));
        assert!(matches!(
            ShapingClipper::with_clip_level(SR, N, -1.0),
            Err(ClipperError::InvalidClipLevel(_))
        ));
        assert!(matches!(
            ShapingClipper::with_clip_level(SR, N, f32::INFINITY),
            Err(ClipperError::InvalidClipLevel(_))
        ));
    }

    #[test]
    fn test_sizes_and_defaults() {
        let clipper = ShapingClipper::new(SR, N).unwrap();
        assert_eq!(clipper.feed_size(), 256);
        assert_eq!(clipper.fft_size(), N);
        assert_eq!(clipper.latency(), 768);
        assert_eq!(clipper.bins(), 513);
        assert_eq!(clipper.margin_curve().len(), 513);
        assert_eq!(clipper.clip_level(), CLIPPER_DFL_CLIP_LEVEL);
        assert_eq!(clipper.iterations(), CLIPPER_DFL_ITERATIONS);
        assert_eq!(clipper.adaptive_distortion_strength(), 1.0);
    }

    #[test]
    fn test_psy_bins_follow_sample_rate() {
        let bins = |sr| ShapingClipper::new(sr, N).unwrap().psy_bins();
        assert_eq!(bins(44100.0), 512);
        assert_eq!(bins(50000.0), 512);
        assert_eq!(bins(96000.0), 256);
        assert_eq!(bins(192000.0), 128);
    }

    #[test]
    fn test_block_size_mismatch_leaves_state() {
        let mut clipper = ShapingClipper::with_clip_level(SR, N, 1.0).unwrap();
        let mut fresh = clipper.clone();

        let mut out = vec![0.0f32; 256];
        let err = clipper
            .feed(&[5.0; 255], &mut out, OutputMode::Clipped)
            .unwrap_err();
        assert!(matches!(
            err,
            ClipperError::BlockSize {
                expected: 256,
                actual: 255
            }
        ));
        let mut short = vec![0.0f32; 128];
        assert!(clipper.feed(&[5.0; 256], &mut short, OutputMode::Clipped).is_err());

        let signal = loud_signal(N * 3);
        assert_eq!(
            run(&mut clipper, &signal, OutputMode::Clipped),
            run(&mut fresh, &signal, OutputMode::Clipped)
        );
    }

    #[test]
    fn test_silence_in_silence_out() {
        let mut clipper = ShapingClipper::with_clip_level(SR, N, 1.0).unwrap();
        let input = vec![0.0f32; 256];
        let mut out = vec![1.0f32; 256];
        for _ in 0..10 {
            let shift = clipper.feed(&input, &mut out, OutputMode::Clipped).unwrap();
            assert_eq!(shift, 1.0);
            assert!(out.iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_zero_iterations_is_exact_delay() {
        let mut clipper = ShapingClipper::with_clip_level(SR, N, 1.0).unwrap();
        clipper.set_iterations(0);

        let signal = loud_signal(N * 4);
        let out = run(&mut clipper, &signal, OutputMode::Clipped);
        let latency = clipper.latency();

        assert!(out[..latency].iter().all(|&v| v == 0.0));
        assert_eq!(&out[latency..], &signal[..signal.len() - latency]);
    }

    #[test]
    fn test_disabled_clip_level_bypasses() {
        let mut clipper = ShapingClipper::with_clip_level(SR, N, 1.0).unwrap();
        clipper.set_clip_level(0.0);
        assert_eq!(clipper.clip_level(), 0.0);

        let signal = loud_signal(N * 4);
        let out = run(&mut clipper, &signal, OutputMode::Clipped);
        let latency = clipper.latency();
        assert_eq!(&out[latency..], &signal[..signal.len() - latency]);
    }

    #[test]
    fn test_loud_frames_report_margin_shift() {
        let mut clipper = ShapingClipper::with_clip_level(SR, N, 1.0).unwrap();
        let input = vec![2.0f32; 256];
        let mut out = vec![0.0f32; 256];

        let mut last_shift = 1.0;
        for _ in 0..8 {
            last_shift = clipper.feed(&input, &mut out, OutputMode::Clipped).unwrap();
        }
        assert!(last_shift > 1.5, "shift {last_shift}");
        // The steady state sits just under the clip level
        for &v in &out {
            assert!(v <= 1.01 && v >= 0.9, "sample {v}");
        }
    }

    #[test]
    fn test_distortion_only_is_the_correction() {
        let mut clipped = ShapingClipper::with_clip_level(SR, N, 1.0).unwrap();
        let mut dist_only = clipped.clone();

        let signal = loud_signal(N * 6);
        let wet = run(&mut clipped, &signal, OutputMode::Clipped);
        let dist = run(&mut dist_only, &signal, OutputMode::DistortionOnly);
        let latency = clipped.latency();

        for i in latency..signal.len() {
            let dry = signal[i - latency];
            assert_approx_eq!(f32, wet[i] - dry, dist[i], epsilon = 1e-5);
        }
        assert!(dist.iter().any(|&v| v.abs() > 0.1));
    }

    #[test]
    fn test_clear_forgets_history() {
        let mut clipper = ShapingClipper::with_clip_level(SR, N, 1.0).unwrap();
        run(&mut clipper, &loud_signal(N * 2), OutputMode::Clipped);
        clipper.clear();

        let out = run(&mut clipper, &vec![0.0; N], OutputMode::Clipped);
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_invalid_margin_curve_keeps_previous() {
        let mut clipper = ShapingClipper::new(SR, N).unwrap();
        let before = clipper.margin_curve().to_vec();

        let err = clipper
            .set_margin_curve(&[MarginPoint::new(100.0, 3.0)])
            .unwrap_err();
        assert!(matches!(err, ClipperError::InvalidMarginCurve(_)));
        assert_eq!(clipper.margin_curve(), &before[..]);

        clipper
            .set_margin_curve(&[MarginPoint::new(0.0, 0.0)])
            .unwrap();
        assert!(clipper.margin_curve().iter().all(|&r| r == 1.0));
    }

    #[test]
    fn test_invalid_strength_is_ignored() {
        let mut clipper = ShapingClipper::with_clip_level(SR, N, 1.0).unwrap();
        clipper.set_adaptive_distortion_strength(0.5);
        for bad in [f32::NAN, f32::INFINITY, -0.1] {
            clipper.set_adaptive_distortion_strength(bad);
            assert_eq!(clipper.adaptive_distortion_strength(), 0.5);
        }

        let input = vec![2.0f32; 256];
        let mut out = vec![0.0f32; 256];
        for _ in 0..8 {
            let shift = clipper.feed(&input, &mut out, OutputMode::Clipped).unwrap();
            assert!(shift.is_finite());
        }
        assert!(out.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_mask_shift_rules() {
        // No overshoot: the 1 dB floor
        assert_approx_eq!(f32, mask_shift(0.9, 0.8, true, 1.0), GAIN_AMP_P_1_DB);
        // Extrapolation capped by the remaining peak
        assert_approx_eq!(f32, mask_shift(2.0, 1.9, true, 1.0), 1.9);
        // Extrapolation: needed 2.0, achieved 1.2
        assert_approx_eq!(f32, mask_shift(3.0, 1.8, true, 1.0), 5.0 / 3.0, epsilon = 1e-5);
        // Late passes use the remaining peak
        assert_approx_eq!(f32, mask_shift(3.0, 1.5, false, 1.0), 1.5);
        // Strength scales the relaxation
        assert_approx_eq!(f32, mask_shift(3.0, 1.5, false, 0.5), 1.25);
        assert_approx_eq!(f32, mask_shift(3.0, 1.5, false, 0.0), 1.0);
    }

    #[test]
    fn test_clip_to_window() {
        let windowed = [2.0, -2.0, 0.5, 0.0];
        let window = [1.0, 1.0, 1.0, 0.0];
        let mut delta = [0.0f32; 4];
        clip_to_window(&mut delta, &windowed, &window, 1.0, 1.0);
        assert_eq!(delta, [-1.0, 1.0, 0.0, 0.0]);

        let mut delta = [0.0f32; 4];
        clip_to_window(&mut delta, &windowed, &window, 1.0, 2.0);
        assert_eq!(delta, [-2.0, 2.0, 0.0, 0.0]);
    }
}
