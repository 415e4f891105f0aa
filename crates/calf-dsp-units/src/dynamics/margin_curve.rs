// SPDX-License-Identifier: LGPL-3.0-or-later

//! Frequency-dependent distortion margin for the shaping clipper.
//!
//! The margin curve gives, per FFT bin, the minimum ratio between the
//! clean signal and the clipping distortion allowed at that frequency.
//! It is specified as a short list of (Hz, dB) control points, linearly
//! interpolated in the dB domain and converted to linear amplitude.

use serde::{Deserialize, Serialize};

use crate::error::{ClipperError, ClipperResult};
use crate::units::{bin_to_frequency, db_to_gain};

/// One control point of a margin curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginPoint {
    /// Frequency in Hz.
    pub freq_hz: f32,
    /// Required clean-to-distortion margin in dB.
    pub gain_db: f32,
}

impl MarginPoint {
    /// Create a control point.
    pub const fn new(freq_hz: f32, gain_db: f32) -> Self {
        Self { freq_hz, gain_db }
    }
}

impl From<(f32, f32)> for MarginPoint {
    fn from((freq_hz, gain_db): (f32, f32)) -> Self {
        Self { freq_hz, gain_db }
    }
}

/// Margin applied until a caller supplies its own curve.
///
/// Generous in the midrange where the ear is most sensitive, relaxed
/// towards the top of the audible band.
pub const DEFAULT_MARGIN_POINTS: [MarginPoint; 10] = [
    MarginPoint::new(0.0, 14.0),
    MarginPoint::new(125.0, 14.0),
    MarginPoint::new(250.0, 16.0),
    MarginPoint::new(500.0, 18.0),
    MarginPoint::new(1000.0, 20.0),
    MarginPoint::new(2000.0, 20.0),
    MarginPoint::new(4000.0, 20.0),
    MarginPoint::new(8000.0, 15.0),
    MarginPoint::new(16000.0, 5.0),
    MarginPoint::new(20000.0, -10.0),
];

/// Check that a list of control points describes a usable curve.
///
/// The list must be non-empty, start at 0 Hz, have non-decreasing
/// frequencies and contain only finite values.
pub fn validate_points(points: &[MarginPoint]) -> ClipperResult<()> {
    let first = points
        .first()
        .ok_or_else(|| ClipperError::InvalidMarginCurve("no control points".into()))?;

    if let Some(p) = points
        .iter()
        .find(|p| !p.freq_hz.is_finite() || !p.gain_db.is_finite())
    {
        return Err(ClipperError::InvalidMarginCurve(format!(
            "non-finite control point ({} Hz, {} dB)",
            p.freq_hz, p.gain_db
        )));
    }

    if first.freq_hz != 0.0 {
        return Err(ClipperError::InvalidMarginCurve(format!(
            "first point must be at 0 Hz, got {} Hz",
            first.freq_hz
        )));
    }

    if let Some(pair) = points.windows(2).find(|w| w[1].freq_hz < w[0].freq_hz) {
        return Err(ClipperError::InvalidMarginCurve(format!(
            "frequencies must not decrease ({} Hz after {} Hz)",
            pair[1].freq_hz, pair[0].freq_hz
        )));
    }

    Ok(())
}

/// Per-bin margin in linear amplitude, DC through Nyquist.
///
/// Keeps the control points it was built from, so the curve can be
/// described again later.
#[derive(Debug, Clone, PartialEq)]
pub struct MarginCurve {
    points: Vec<MarginPoint>,
    ratios: Vec<f32>,
}

impl MarginCurve {
    /// Interpolate `points` over the `fft_size / 2 + 1` bins of a
    /// transform at `sample_rate`.
    ///
    /// Bins above the last control point take the last point's value.
    ///
    /// # Examples
    /// ```
    /// use calf_dsp_units::dynamics::margin_curve::{MarginCurve, MarginPoint};
    ///
    /// let points = [MarginPoint::new(0.0, 0.0), MarginPoint::new(1000.0, 20.0)];
    /// let curve = MarginCurve::build(&points, 8000.0, 16).unwrap();
    /// assert_eq!(curve.len(), 9);
    /// assert!((curve.ratios()[0] - 1.0).abs() < 1e-6);
    /// assert!((curve.ratios()[8] - 10.0).abs() < 1e-4);
    /// ```
    pub fn build(points: &[MarginPoint], sample_rate: f32, fft_size: usize) -> ClipperResult<Self> {
        validate_points(points)?;

        let bins = fft_size / 2 + 1;
        let mut ratios = vec![0.0f32; bins];
        let mut j = 0;

        for pair in points.windows(2) {
            let (p0, p1) = (pair[0], pair[1]);
            while j < bins {
                let hz = bin_to_frequency(sample_rate, fft_size, j);
                if hz >= p1.freq_hz {
                    break;
                }
                ratios[j] =
                    p0.gain_db + (hz - p0.freq_hz) * (p1.gain_db - p0.gain_db) / (p1.freq_hz - p0.freq_hz);
                j += 1;
            }
        }

        // validate_points guarantees at least one point
        let last_db = points[points.len() - 1].gain_db;
        ratios[j..].fill(last_db);

        for r in ratios.iter_mut() {
            *r = db_to_gain(*r);
        }

        Ok(Self {
            points: points.to_vec(),
            ratios,
        })
    }

    /// The default curve for a transform of `fft_size` at `sample_rate`.
    pub fn default_for(sample_rate: f32, fft_size: usize) -> ClipperResult<Self> {
        Self::build(&DEFAULT_MARGIN_POINTS, sample_rate, fft_size)
    }

    /// Control points the curve was interpolated from.
    pub fn points(&self) -> &[MarginPoint] {
        &self.points
    }

    /// Linear margin per bin.
    pub fn ratios(&self) -> &[f32] {
        &self.ratios
    }

    /// Number of bins covered.
    pub fn len(&self) -> usize {
        self.ratios.len()
    }

    /// True when the curve covers no bins.
    pub fn is_empty(&self) -> bool {
        self.ratios.is_empty()
    }
}
