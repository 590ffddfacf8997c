//! One-row scratch buffer for interpolated samples.

use super::error::ResampleError;
use crate::color::Sample;

/// Rows up to this many samples stay inline.
pub const INLINE_SAMPLES: usize = 1024;

/// Scratch row: inline storage for narrow images, a fallibly allocated heap
/// buffer for wide ones. Dropped (and freed) when the conversion returns.
#[derive(Debug)]
pub enum RowScratch<S> {
    Inline([S; INLINE_SAMPLES], usize),
    Heap(Vec<S>),
}

impl<S: Sample> RowScratch<S> {
    pub fn new(samples: usize) -> Result<Self, ResampleError> {
        if samples <= INLINE_SAMPLES {
            return Ok(RowScratch::Inline([S::default(); INLINE_SAMPLES], samples));
        }
        let mut row = Vec::new();
        row.try_reserve_exact(samples)
            .map_err(|_| ResampleError::OutOfMemory { samples })?;
        row.resize(samples, S::default());
        Ok(RowScratch::Heap(row))
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [S] {
        match self {
            RowScratch::Inline(row, len) => &mut row[..*len],
            RowScratch::Heap(row) => row,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, RowScratch::Inline(..))
    }
}
