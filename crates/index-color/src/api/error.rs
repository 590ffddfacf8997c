//! Unified error type for the index-color public API.

use thiserror::Error;

use crate::colormap::ColormapError;
use crate::dispatch::QuantizeError;
use crate::image::ImageError;
use crate::resample::ResampleError;

/// Wraps every error type of the crate for `?` propagation in application
/// code.
///
/// # Example
///
/// ```
/// use index_color::{
///     color_true_to_index, ColormapBuilder, ImageView, ImageViewMut, IndexColorError,
/// };
///
/// fn to_indices(rgb: &[u8], out: &mut [u8], width: usize) -> Result<(), IndexColorError> {
///     let colormap = ColormapBuilder::from_u8(3, &[0, 0, 0, 255, 255, 255]).build()?;
///     let height = rgb.len() / (width * 3);
///     let src = ImageView::new(rgb, width, height, 3)?;
///     let mut dst = ImageViewMut::new(out, width, height, 1)?;
///     color_true_to_index(&mut dst, &src, &colormap)?;
///     Ok(())
/// }
///
/// let mut out = [0u8; 2];
/// to_indices(&[0, 0, 0, 255, 255, 255], &mut out, 2).unwrap();
/// assert_eq!(out, [0, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexColorError {
    #[error("colormap error: {0}")]
    Colormap(#[from] ColormapError),

    #[error("image error: {0}")]
    Image(#[from] ImageError),

    #[error("quantization error: {0}")]
    Quantize(#[from] QuantizeError),

    #[error("resampling error: {0}")]
    Resample(#[from] ResampleError),
}
