//! Detection of direct-product palettes and derivation of their
//! independent-channel tables.
//!
//! A palette is a direct product when entry `k` has, on every channel `c`,
//! the level `levels[c][(k / stride[c]) % levels[c].len()]`, with channel 0
//! varying slowest. Such a palette can be searched channel by channel.

use crate::color::Sample;

/// Per-channel levels and index strides of a product palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductLayout {
    pub levels: Vec<Vec<i32>>,
    pub strides: Vec<usize>,
}

impl ProductLayout {
    /// Detect the product layout of an interleaved palette, if any.
    pub fn detect<S: Sample>(palette: &[S], channels: usize) -> Option<Self> {
        let entries = palette.len() / channels;
        if entries == 0 {
            return None;
        }

        let mut counts = Vec::with_capacity(channels);
        for c in 0..channels {
            let mut column: Vec<i32> = palette
                .iter()
                .skip(c)
                .step_by(channels)
                .map(|s| s.to_i32())
                .collect();
            column.sort_unstable();
            column.dedup();
            counts.push(column.len());
        }
        let product = counts.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n));
        if product != Some(entries) {
            return None;
        }

        let mut strides = vec![1usize; channels];
        for c in (0..channels - 1).rev() {
            strides[c] = strides[c + 1] * counts[c + 1];
        }

        let levels: Vec<Vec<i32>> = (0..channels)
            .map(|c| {
                (0..counts[c])
                    .map(|j| palette[j * strides[c] * channels + c].to_i32())
                    .collect()
            })
            .collect();

        let consistent = palette.chunks_exact(channels).enumerate().all(|(k, entry)| {
            entry
                .iter()
                .enumerate()
                .all(|(c, s)| s.to_i32() == levels[c][(k / strides[c]) % counts[c]])
        });
        consistent.then_some(Self { levels, strides })
    }

    /// Independent-channel tables for sample type `S`: row `r` of channel
    /// `c` holds `stride[c]` times the level nearest the row's
    /// representative sample. The offset is folded into channel 0.
    pub fn tables<S: Sample>(&self, offset: u32) -> Vec<Vec<i32>> {
        self.levels
            .iter()
            .zip(&self.strides)
            .enumerate()
            .map(|(c, (levels, &stride))| {
                let base = if c == 0 { offset as i32 } else { 0 };
                (0..S::DIMENSION_LEN)
                    .map(|row| {
                        let value = S::from_dimension_index(row).to_i32();
                        base + (stride * nearest_level(levels, value)) as i32
                    })
                    .collect()
            })
            .collect()
    }
}

/// Position of the level closest to `value`, first one on ties.
fn nearest_level(levels: &[i32], value: i32) -> usize {
    let mut best = 0;
    let mut best_distance = u32::MAX;
    for (j, &level) in levels.iter().enumerate() {
        let d = level.abs_diff(value);
        if d < best_distance {
            best = j;
            best_distance = d;
        }
    }
    best
}
