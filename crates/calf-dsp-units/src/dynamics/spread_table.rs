// SPDX-License-Identifier: LGPL-3.0-or-later

//! Compact psychoacoustic spreading table.
//!
//! Energy at one frequency masks distortion at nearby frequencies, more
//! so upwards than downwards. The table approximates this with a tent
//! shaped function in log-frequency, truncated to the bins within
//! roughly a third of an octave where the contribution is not negligible.
//!
//! A full bin-by-bin matrix would be O(n²) in memory. Instead only two
//! spreading functions are stored per octave (plus one each for bins 0
//! to 3), and every bin reuses the function of the nearest base bin at
//! or below it, shifted to be centred on itself.

use std::ops::Range;

/// One spreading function, centred on its base bin.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadEntry {
    /// Offset of the first non-zero weight relative to the centre bin (<= 0).
    start: isize,
    /// Weights for bins `centre + start ..`, normalized to sum to 1.
    weights: Vec<f32>,
}

impl SpreadEntry {
    /// Bin offsets, relative to the centre bin, covered by this entry.
    pub fn range(&self) -> Range<isize> {
        self.start..self.start + self.weights.len() as isize
    }

    /// Non-zero weights, first one at offset `range().start`.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Weight at a bin offset relative to the centre, zero outside the range.
    pub fn weight_at(&self, offset: isize) -> f32 {
        let idx = offset - self.start;
        if idx < 0 {
            return 0.0;
        }
        self.weights.get(idx as usize).copied().unwrap_or(0.0)
    }
}

/// Spreading functions for the lowest `num_bins` bins of a spectrum.
#[derive(Debug, Clone)]
pub struct SpreadTable {
    num_bins: usize,
    entries: Vec<SpreadEntry>,
    /// For each bin, which entry it uses.
    index: Vec<usize>,
}

impl SpreadTable {
    /// Build the table for bins `0..num_bins`.
    pub fn new(num_bins: usize) -> Self {
        let mut entries = Vec::new();
        let mut index = vec![0usize; num_bins];

        let mut bin = 0;
        let mut increment = 1;
        while bin < num_bins {
            let start_bin = bin * 3 / 4;
            let end_bin = num_bins.min(((bin + 1) * 4 + 2) / 3);
            let centre = bin as f32 + 0.5;

            let mut weights: Vec<f32> = (start_bin..end_bin)
                .map(|j| {
                    // +0.5 keeps bin 0 away from ln(0)
                    let rel = ((j as f32 + 0.5) / centre).ln().abs();
                    if j >= bin {
                        (-rel * 40.0).exp() // mask up
                    } else {
                        (-rel * 80.0).exp() // mask down
                    }
                })
                .collect();
            let sum: f32 = weights.iter().sum();
            for w in weights.iter_mut() {
                *w /= sum;
            }

            entries.push(SpreadEntry {
                start: start_bin as isize - bin as isize,
                weights,
            });

            let next_bin = if bin <= 1 {
                bin + 1
            } else {
                if bin.is_power_of_two() {
                    increment = bin / 2;
                }
                bin + increment
            };

            index[bin..next_bin.min(num_bins)].fill(entries.len() - 1);
            bin = next_bin;
        }

        Self {
            num_bins,
            entries,
            index,
        }
    }

    /// Number of bins the table covers.
    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    /// All stored spreading functions, lowest base bin first.
    pub fn entries(&self) -> &[SpreadEntry] {
        &self.entries
    }

    /// The spreading function used by `bin`, or `None` past `num_bins()`.
    pub fn entry_for(&self, bin: usize) -> Option<&SpreadEntry> {
        self.index.get(bin).map(|&e| &self.entries[e])
    }

    /// Accumulate the spread of `magnitudes` into `mask`.
    ///
    /// Only bins below `num_bins()` are spread and only bins below
    /// `num_bins()` of `mask` are written; contributions falling outside
    /// that range are dropped.
    pub fn spread_into(&self, magnitudes: &[f32], mask: &mut [f32]) {
        let n = self.num_bins.min(mask.len()) as isize;

        for (i, &mag) in magnitudes.iter().enumerate().take(self.num_bins) {
            let entry = &self.entries[self.index[i]];
            let range = entry.range();
            let i = i as isize;

            let lo = (i + range.start).max(0);
            let hi = (i + range.end).min(n);
            if hi <= lo {
                continue;
            }

            let offset = (lo - i - range.start) as usize;
            for (m, &w) in mask[lo as usize..hi as usize]
                .iter_mut()
                .zip(&entry.weights[offset..])
            {
                *m += w * mag;
            }
        }
    }
}
