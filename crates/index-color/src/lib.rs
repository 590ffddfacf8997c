#![allow(clippy::needless_range_loop, clippy::module_inception)]

//! index-color: true-color to palette-index quantization and affine
//! resampling
//!
//! This library maps 8-bit or signed 16-bit RGB/RGBA pixels onto a fixed
//! palette, and resamples images under affine transforms with bilinear or
//! bicubic interpolation, quantizing each resampled row on the fly when the
//! destination is indexed.
//!
//! # Quick Start
//!
//! Build a [`Colormap`] once with [`ColormapBuilder`], then convert images
//! with [`color_true_to_index`]:
//!
//! ```
//! use index_color::{color_true_to_index, ColormapBuilder, ImageView, ImageViewMut};
//!
//! let palette = [0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
//! let colormap = ColormapBuilder::from_u8(3, &palette).build().unwrap();
//!
//! let rgb = [250u8, 10, 10, 20, 20, 240, 200, 210, 220, 5, 5, 5];
//! let mut indices = [0u8; 4];
//! let src = ImageView::new(&rgb[..], 2, 2, 3).unwrap();
//! let mut dst = ImageViewMut::new(&mut indices[..], 2, 2, 1).unwrap();
//! color_true_to_index(&mut dst, &src, &colormap).unwrap();
//!
//! assert_eq!(indices, [1, 3, 4, 0]);
//! ```
//!
//! # Search Methods
//!
//! Four interchangeable strategies resolve a color to an index, selected by
//! [`SearchMethod`]:
//!
//! | Method | Cost per pixel | Result |
//! |--------|----------------|--------|
//! | [`SearchMethod::ColorCube`] | one table lookup | nearest entry to the centre of the pixel's cube cell |
//! | [`SearchMethod::OctTree`] | logarithmic (expected) | exact nearest entry |
//! | [`SearchMethod::BruteForce`] | linear in palette size | exact nearest entry |
//! | [`SearchMethod::IndependentChannel`] | one lookup per channel | exact for product palettes |
//!
//! Distances are squared Euclidean over bias-shifted channels. Signed
//! 16-bit samples are shifted into `0..65536` and every squared channel
//! difference is shifted right by 2 so that four-channel sums fit in `u32`.
//! Brute force works on raw samples in double precision and scales 16-bit
//! distances by `0.125` before truncation. Ties resolve to the lowest
//! palette index in every exact method.
//!
//! # Resampling
//!
//! [`affine_resample`] walks every destination row in 16.16 fixed point and
//! convolves the source with Q14 filter coefficients:
//!
//! ```text
//! source row(s) --> [horizontal taps] --> [vertical taps] --> scratch row
//!                                                               |
//!                          true-color destination <-- copy -----+
//!                          indexed destination   <-- quantize --+
//! ```
//!
//! Pixels whose filter neighbourhood would leave the source are not
//! written.
//!
//! ```
//! use index_color::{
//!     affine_resample, AffineTransform, ColormapBuilder, Filter, ImageView, ImageViewMut,
//! };
//!
//! let greys: Vec<u8> = (0..16u8).flat_map(|i| [i * 17; 3]).collect();
//! let colormap = ColormapBuilder::from_u8(3, &greys).build().unwrap();
//!
//! let src_px = vec![170u8; 8 * 8 * 3];
//! let mut dst_px = vec![0u8; 12 * 12];
//! let src = ImageView::new(&src_px[..], 8, 8, 3).unwrap();
//! let mut dst = ImageViewMut::new(&mut dst_px[..], 12, 12, 1).unwrap();
//!
//! let t = AffineTransform::scale(1.5, 1.5);
//! affine_resample(&mut dst, &src, &t, Filter::Bicubic, Some(&colormap)).unwrap();
//! assert_eq!(dst_px[6 * 12 + 6], 10);
//! ```

pub mod api;
pub mod color;
pub mod colormap;
pub mod dispatch;
pub mod image;
pub mod resample;
pub mod search;

#[cfg(test)]
mod domain_tests;

pub use api::{ColormapBuilder, IndexColorError};
pub use color::{distance, IndexSample, Sample, SampleType};
pub use colormap::{Colormap, ColormapError, SearchMethod, SearchTables};
pub use dispatch::{color_true_to_index, quantize_line, QuantizeError};
pub use image::{ChannelLayout, ImageError, ImageView, ImageViewMut, Pixels, PixelsMut};
pub use resample::{affine_resample, AffineTransform, Filter, ResampleError};
