//! Whole-image quantization.

use crate::color::{IndexSample, Sample, SampleType};
use crate::colormap::Colormap;
use crate::image::{Geometry, ImageView, ImageViewMut, Pixels, PixelsMut};

use super::error::QuantizeError;
use super::line::convert_row;

/// Convert a true-color image to palette indices.
///
/// `src` must carry the colormap's input sample type and channel count
/// (a 4-channel [three-in-four](crate::ChannelLayout::ThreeInFour) view
/// counts as 3), `dst` must be a single-channel image of the same size in
/// the colormap's output type. Every check runs before the first write, so
/// on error `dst` is untouched.
///
/// # Example
///
/// ```
/// use index_color::{color_true_to_index, ColormapBuilder, ImageView, ImageViewMut};
///
/// let colormap = ColormapBuilder::from_u8(3, &[0, 0, 0, 255, 255, 255]).build().unwrap();
/// let rgb = [0u8, 0, 0, 255, 255, 255, 200, 200, 200, 30, 30, 30];
/// let mut indices = [0u8; 4];
///
/// let src = ImageView::new(&rgb[..], 2, 2, 3).unwrap();
/// let mut dst = ImageViewMut::new(&mut indices[..], 2, 2, 1).unwrap();
/// color_true_to_index(&mut dst, &src, &colormap).unwrap();
///
/// assert_eq!(indices, [0, 1, 1, 0]);
/// ```
pub fn color_true_to_index(
    dst: &mut ImageViewMut<'_>,
    src: &ImageView<'_>,
    colormap: &Colormap,
) -> Result<(), QuantizeError> {
    let sg = *src.geometry();
    let dg = *dst.geometry();
    validate(&sg, src.sample_type(), &dg, dst.sample_type(), colormap)?;

    match (src.pixels(), dst.pixels_mut()) {
        (Pixels::U8(s), PixelsMut::U8(d)) => convert_image(s, d, &sg, &dg, colormap),
        (Pixels::U8(s), PixelsMut::U16(d)) => convert_image(s, d, &sg, &dg, colormap),
        (Pixels::S16(s), PixelsMut::U8(d)) => convert_image(s, d, &sg, &dg, colormap),
        (Pixels::S16(s), PixelsMut::U16(d)) => convert_image(s, d, &sg, &dg, colormap),
        (s, d) => {
            return Err(QuantizeError::UnsupportedType {
                input: s.sample_type(),
                output: d.sample_type(),
            })
        }
    }

    tracing::trace!(
        width = sg.width,
        height = sg.height,
        method = %colormap.method(),
        "quantized image"
    );
    Ok(())
}

/// Checks run before any destination row is written.
fn validate(
    src: &Geometry,
    src_type: SampleType,
    dst: &Geometry,
    dst_type: SampleType,
    colormap: &Colormap,
) -> Result<(), QuantizeError> {
    if src.width != dst.width || src.height != dst.height {
        return Err(QuantizeError::SizeMismatch {
            src_width: src.width,
            src_height: src.height,
            dst_width: dst.width,
            dst_height: dst.height,
        });
    }
    if dst.channels != 1 {
        return Err(QuantizeError::DestinationChannels(dst.channels));
    }
    if src_type != colormap.input_type() {
        return Err(QuantizeError::InputTypeMismatch {
            expected: colormap.input_type(),
            actual: src_type,
        });
    }
    if dst_type != colormap.output_type() {
        return Err(QuantizeError::OutputTypeMismatch {
            expected: colormap.output_type(),
            actual: dst_type,
        });
    }
    if src.color_channels() != colormap.channels() {
        return Err(QuantizeError::ChannelMismatch {
            expected: colormap.channels(),
            actual: src.color_channels(),
        });
    }
    Ok(())
}

fn convert_image<S: Sample, D: IndexSample>(
    src: &[S],
    dst: &mut [D],
    sg: &Geometry,
    dg: &Geometry,
    colormap: &Colormap,
) {
    for y in 0..sg.height {
        let src_row = &src[y * sg.stride..][..sg.row_len()];
        let dst_row = &mut dst[y * dg.stride..][..dg.width];
        convert_row(src_row, dst_row, sg.layout, colormap);
    }
}
