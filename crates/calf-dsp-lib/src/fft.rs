// SPDX-License-Identifier: LGPL-3.0-or-later

//! Real-input FFT using `realfft` (the real-valued front end of `rustfft`).
//!
//! Conventions:
//! - Any even transform length is accepted, not only powers of two.
//! - A length-`n` time-domain buffer maps to `n / 2 + 1` complex bins,
//!   from DC up to and including Nyquist.
//! - Neither direction is normalized. A forward/reverse round trip scales
//!   the signal by `n`; call [`normalize`] to undo it.

use crate::math::packed::scale;
use num_complex::Complex32;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use std::sync::Arc;

pub use realfft::FftError;

/// Cached real FFT state for allocation-free repeated transforms.
///
/// Holds the forward and inverse plans together with every scratch
/// buffer they need, so the hot path never allocates.
///
/// # Examples
/// ```
/// use calf_dsp_lib::fft::RealFft;
/// use num_complex::Complex32;
///
/// let mut fft = RealFft::new(1024);
/// let src = vec![0.0f32; 1024];
/// let mut spectrum = vec![Complex32::new(0.0, 0.0); fft.bins()];
/// fft.direct(&mut spectrum, &src).unwrap();
/// ```
#[derive(Clone)]
pub struct RealFft {
    n: usize,
    fwd: Arc<dyn RealToComplex<f32>>,
    inv: Arc<dyn ComplexToReal<f32>>,
    /// Time-domain copy of the forward input (realfft uses it as scratch).
    time_buf: Vec<f32>,
    /// Spectrum copy of the inverse input (realfft uses it as scratch).
    freq_buf: Vec<Complex32>,
    scratch: Vec<Complex32>,
}

impl std::fmt::Debug for RealFft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealFft")
            .field("n", &self.n)
            .finish_non_exhaustive()
    }
}

impl RealFft {
    /// Plan forward and inverse real transforms of length `n`.
    ///
    /// # Panics
    /// Panics if `n` is zero or odd.
    pub fn new(n: usize) -> Self {
        assert!(
            n > 0 && n % 2 == 0,
            "real FFT length must be even and non-zero, got {n}"
        );

        let mut planner = RealFftPlanner::<f32>::new();
        let fwd = planner.plan_fft_forward(n);
        let inv = planner.plan_fft_inverse(n);
        let scratch_len = fwd.get_scratch_len().max(inv.get_scratch_len());

        Self {
            n,
            fwd,
            inv,
            time_buf: vec![0.0; n],
            freq_buf: vec![Complex32::new(0.0, 0.0); n / 2 + 1],
            scratch: vec![Complex32::new(0.0, 0.0); scratch_len],
        }
    }

    /// Return the transform length.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always false: zero-length plans cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Return the number of complex bins (`n / 2 + 1`).
    pub fn bins(&self) -> usize {
        self.n / 2 + 1
    }

    /// Forward transform of `src` (length `n`) into `dst` (length `n / 2 + 1`).
    ///
    /// `src` is left untouched.
    pub fn direct(&mut self, dst: &mut [Complex32], src: &[f32]) -> Result<(), FftError> {
        if src.len() != self.n {
            return Err(FftError::InputBuffer(self.n, src.len()));
        }
        self.time_buf.copy_from_slice(src);
        self.fwd
            .process_with_scratch(&mut self.time_buf, dst, &mut self.scratch)
    }

    /// Inverse transform of `src` (length `n / 2 + 1`) into `dst` (length `n`).
    ///
    /// The imaginary parts of the DC and Nyquist bins cannot be represented
    /// by a real signal and are dropped. The output is **not** normalized.
    pub fn reverse(&mut self, dst: &mut [f32], src: &[Complex32]) -> Result<(), FftError> {
        if src.len() != self.freq_buf.len() {
            return Err(FftError::InputBuffer(self.freq_buf.len(), src.len()));
        }
        self.freq_buf.copy_from_slice(src);
        let last = self.freq_buf.len() - 1;
        self.freq_buf[0].im = 0.0;
        self.freq_buf[last].im = 0.0;
        self.inv
            .process_with_scratch(&mut self.freq_buf, dst, &mut self.scratch)
    }
}

/// Scale a buffer by `1 / n`, undoing the gain of an unnormalized
/// forward/reverse round trip of length `n`.
pub fn normalize(buf: &mut [f32], n: usize) {
    scale(buf, 1.0 / n as f32);
}
