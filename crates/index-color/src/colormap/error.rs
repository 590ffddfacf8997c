//! Errors raised while building a [`Colormap`](super::Colormap).

use super::SearchMethod;
use crate::color::SampleType;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColormapError {
    #[error("palette has no entries")]
    EmptyPalette,

    #[error("unsupported channel count {0} (expected 3 or 4)")]
    UnsupportedChannels(usize),

    #[error("palette length {len} is not a multiple of {channels} channels")]
    RaggedPalette { len: usize, channels: usize },

    #[error("{0} cannot hold palette indices")]
    UnsupportedIndexType(SampleType),

    #[error("{entries} entries at offset {offset} do not fit {index_type} indices")]
    TooManyEntries {
        entries: usize,
        offset: u32,
        index_type: SampleType,
    },

    #[error("bits {bits} out of range 1..={max} for {method}")]
    BitsOutOfRange {
        bits: u32,
        max: u32,
        method: SearchMethod,
    },

    #[error("color cube table has {actual} entries, expected {expected}")]
    CubeTableSize { expected: usize, actual: usize },

    #[error("color cube table of {entries} entries does not fit in memory")]
    CubeTableAllocation { entries: usize },

    #[error("expected {channels} dimension tables of {len} entries")]
    DimensionTableShape { channels: usize, len: usize },

    #[error("palette is not a direct product of per-channel levels")]
    NotProductPalette,
}
