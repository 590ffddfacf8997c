//! Independent-channel lookup: the index is the sum of one table lookup per
//! channel. Only meaningful for colormaps whose palette is a direct product
//! of per-channel levels.

use crate::color::Sample;

/// Sum of `tables[i][samples[i].dimension_index()]` over the channels.
#[inline]
pub fn dimension_lookup<S: Sample>(tables: &[Vec<i32>], samples: &[S]) -> i32 {
    debug_assert!(samples.len() >= tables.len());
    tables
        .iter()
        .zip(samples)
        .fold(0i32, |acc, (table, &s)| acc.wrapping_add(table[s.dimension_index()]))
}
