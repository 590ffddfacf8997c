//! Affine resampling with bilinear and bicubic interpolation, pipelined per
//! scanline into the quantizer for indexed destinations.

mod affine;
mod error;
mod filter;
mod kernel;
mod pipeline;
mod scratch;

pub use affine::{AffineTransform, RowSpan, SpanWalker};
pub use error::ResampleError;
pub use filter::{Filter, FilterTable, COORD_SHIFT, FILTER_SHIFT};
pub use kernel::{
    bicubic_row, bilinear_row, convolve_row, IndexedSource, SourceRows, TrueColorSource,
};
pub use pipeline::affine_resample;
pub use scratch::{RowScratch, INLINE_SAMPLES};
