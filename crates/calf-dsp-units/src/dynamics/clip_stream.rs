// SPDX-License-Identifier: LGPL-3.0-or-later

//! Block-size agnostic front end for the shaping clipper.
//!
//! Hosts rarely deliver audio in hops of exactly `fft_size / 4`. A
//! [`ClipStream`] stages incoming samples until a full hop is available,
//! feeds it to the clipper and plays out the previous hop's result, so
//! any block length works at the cost of one extra hop of latency.

use crate::dynamics::shaping_clipper::{OutputMode, ShapingClipper};
use crate::error::ClipperResult;

/// Streaming wrapper around a [`ShapingClipper`].
///
/// # Examples
/// ```
/// use calf_dsp_units::dynamics::clip_stream::ClipStream;
/// use calf_dsp_units::dynamics::shaping_clipper::ShapingClipper;
///
/// let clipper = ShapingClipper::with_clip_level(48000.0, 1024, 1.0).unwrap();
/// let mut stream = ClipStream::new(clipper);
/// assert_eq!(stream.latency(), 1024);
///
/// let input = vec![0.25f32; 300];
/// let mut output = vec![0.0f32; 300];
/// stream.process(&mut output, &input).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ClipStream {
    clipper: ShapingClipper,
    mode: OutputMode,
    /// Input collected towards the next hop.
    in_hop: Vec<f32>,
    /// Result of the last hop, being played out.
    out_hop: Vec<f32>,
    pos: usize,
    margin_shift: f32,
}

impl ClipStream {
    /// Wrap `clipper`, starting from silence in [`OutputMode::Clipped`].
    pub fn new(clipper: ShapingClipper) -> Self {
        let hop = clipper.feed_size();
        Self {
            clipper,
            mode: OutputMode::Clipped,
            in_hop: vec![0.0; hop],
            out_hop: vec![0.0; hop],
            pos: 0,
            margin_shift: 1.0,
        }
    }

    /// Total delay in samples: the clipper's latency plus one staging hop.
    pub fn latency(&self) -> usize {
        self.clipper.latency() + self.clipper.feed_size()
    }

    /// Select what the stream outputs, from the next hop on.
    pub fn set_output_mode(&mut self, mode: OutputMode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// Current output mode.
    pub fn output_mode(&self) -> OutputMode {
        self.mode
    }

    /// Margin shift reported by the most recently completed hop.
    pub fn margin_shift(&self) -> f32 {
        self.margin_shift
    }

    /// The wrapped clipper.
    pub fn clipper(&self) -> &ShapingClipper {
        &self.clipper
    }

    /// Mutable access for retuning the clipper's parameters.
    pub fn clipper_mut(&mut self) -> &mut ShapingClipper {
        &mut self.clipper
    }

    /// Unwrap the inner clipper.
    pub fn into_inner(self) -> ShapingClipper {
        self.clipper
    }

    /// Reset the clipper and any partially staged hop.
    pub fn clear(&mut self) {
        self.clipper.clear();
        self.in_hop.fill(0.0);
        self.out_hop.fill(0.0);
        self.pos = 0;
        self.margin_shift = 1.0;
    }

    /// Clip `src` into `dst`.
    ///
    /// Processes `min(dst.len(), src.len())` samples.
    pub fn process(&mut self, dst: &mut [f32], src: &[f32]) -> ClipperResult<()> {
        let count = dst.len().min(src.len());
        let hop = self.in_hop.len();
        let mut done = 0;

        while done < count {
            let chunk = (hop - self.pos).min(count - done);
            let staged = self.pos..self.pos + chunk;

            dst[done..done + chunk].copy_from_slice(&self.out_hop[staged.clone()]);
            self.in_hop[staged].copy_from_slice(&src[done..done + chunk]);

            done += chunk;
            self.advance(chunk)?;
        }

        Ok(())
    }

    /// Clip `buf` in place.
    pub fn process_in_place(&mut self, buf: &mut [f32]) -> ClipperResult<()> {
        let hop = self.in_hop.len();
        let mut done = 0;

        while done < buf.len() {
            let chunk = (hop - self.pos).min(buf.len() - done);
            let staged = self.pos..self.pos + chunk;

            for ((sample, staged_in), &staged_out) in buf[done..done + chunk]
                .iter_mut()
                .zip(&mut self.in_hop[staged.clone()])
                .zip(&self.out_hop[staged])
            {
                *staged_in = *sample;
                *sample = staged_out;
            }

            done += chunk;
            self.advance(chunk)?;
        }

        Ok(())
    }

    fn advance(&mut self, count: usize) -> ClipperResult<()> {
        self.pos += count;
        if self.pos == self.in_hop.len() {
            self.margin_shift = self
                .clipper
                .feed(&self.in_hop, &mut self.out_hop, self.mode)?;
            self.pos = 0;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(clip_level: f32) -> ClipStream {
        ClipStream::new(ShapingClipper::with_clip_level(44100.0, 256, clip_level).unwrap())
    }

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| ((i % 97) as f32 - 48.0) / 64.0).collect()
    }

    #[test]
    fn test_latency_is_one_frame() {
        let s = stream(1.0);
        assert_eq!(s.latency(), 256);
    }

    #[test]
    fn test_compliant_input_is_delayed_exactly() {
        let mut s = stream(1.0);
        let input = ramp(2000);
        let mut output = vec![0.0f32; input.len()];

        // Awkward block sizes on purpose
        let mut pos = 0;
        for block in [1usize, 63, 64, 65, 200, 7, 600].iter().cycle() {
            if pos >= input.len() {
                break;
            }
            let end = (pos + block).min(input.len());
            s.process(&mut output[pos..end], &input[pos..end]).unwrap();
            pos = end;
        }

        let latency = s.latency();
        assert!(output[..latency].iter().all(|&v| v == 0.0));
        assert_eq!(&output[latency..], &input[..input.len() - latency]);
    }

    #[test]
    fn test_in_place_matches_copying() {
        let input: Vec<f32> = ramp(1500).iter().map(|v| v * 4.0).collect();

        let mut a = stream(1.0);
        let mut copied = vec![0.0f32; input.len()];
        for (dst, src) in copied.chunks_mut(100).zip(input.chunks(100)) {
            a.process(dst, src).unwrap();
        }

        let mut b = stream(1.0);
        let mut in_place = input.clone();
        for block in in_place.chunks_mut(37) {
            b.process_in_place(block).unwrap();
        }

        assert_eq!(copied, in_place);
        assert!(a.margin_shift() > 1.0);
    }

    #[test]
    fn test_mismatched_lengths_use_shorter() {
        let mut s = stream(1.0);
        let mut dst = vec![9.0f32; 10];
        s.process(&mut dst, &[0.5; 4]).unwrap();
        assert!(dst[..4].iter().all(|&v| v == 0.0));
        assert!(dst[4..].iter().all(|&v| v == 9.0));
    }

    #[test]
    fn test_clear_resets_staging() {
        let mut s = stream(1.0);
        let mut out = vec![0.0f32; 100];
        s.process(&mut out, &vec![3.0; 100]).unwrap();
        s.clear();
        assert_eq!(s.margin_shift(), 1.0);

        let mut out = vec![1.0f32; 512];
        s.process(&mut out, &vec![0.0; 512]).unwrap();
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_distortion_only_mode() {
        let mut s = stream(1.0);
        s.set_output_mode(OutputMode::DistortionOnly);
        assert_eq!(s.output_mode(), OutputMode::DistortionOnly);

        let input = ramp(1024);
        let mut out = vec![0.0f32; 1024];
        s.process(&mut out, &input).unwrap();
        // Compliant input: no correction at all
        assert!(out.iter().all(|&v| v == 0.0));
        assert_eq!(s.into_inner().fft_size(), 256);
    }
}
