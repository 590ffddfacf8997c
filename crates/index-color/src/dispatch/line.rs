//! Per-scanline conversion of true-color samples to palette indices.

use crate::color::{unsigned_color, IndexSample, Sample};
use crate::colormap::{Colormap, SearchTables};
use crate::image::ChannelLayout;
use crate::search::{cube_index, dimension_lookup, nearest_brute_force, TreeSearch};

use super::error::QuantizeError;

/// Quantize one scanline.
///
/// `dst.len()` is the line width. `src` holds the interleaved pixels in
/// `layout`: `colormap.channels()` samples per pixel, or four slots with
/// color in slots 1..4 for [`ChannelLayout::ThreeInFour`].
///
/// # Example
///
/// ```
/// use index_color::{quantize_line, ChannelLayout, ColormapBuilder};
///
/// let colormap = ColormapBuilder::from_u8(3, &[0, 0, 0, 255, 255, 255]).build().unwrap();
/// let src = [10u8, 20, 30, 250, 240, 230];
/// let mut dst = [0u8; 2];
/// quantize_line(&src, &mut dst, ChannelLayout::Packed, &colormap).unwrap();
/// assert_eq!(dst, [0, 1]);
/// ```
pub fn quantize_line<S: Sample, D: IndexSample>(
    src: &[S],
    dst: &mut [D],
    layout: ChannelLayout,
    colormap: &Colormap,
) -> Result<(), QuantizeError> {
    if S::TYPE != colormap.input_type() {
        return Err(QuantizeError::InputTypeMismatch {
            expected: colormap.input_type(),
            actual: S::TYPE,
        });
    }
    if D::TYPE != colormap.output_type() {
        return Err(QuantizeError::OutputTypeMismatch {
            expected: colormap.output_type(),
            actual: D::TYPE,
        });
    }
    let (channels, step) = match layout {
        ChannelLayout::Packed => (colormap.channels(), colormap.channels()),
        ChannelLayout::ThreeInFour => (3, 4),
    };
    if channels != colormap.channels() {
        return Err(QuantizeError::ChannelMismatch {
            expected: colormap.channels(),
            actual: channels,
        });
    }
    let required = dst.len() * step;
    if src.len() < required {
        return Err(QuantizeError::LineTooShort {
            required,
            actual: src.len(),
        });
    }
    convert_row(src, dst, layout, colormap);
    Ok(())
}

/// Unchecked variant used once the whole image has been validated.
pub(crate) fn convert_row<S: Sample, D: IndexSample>(
    src: &[S],
    dst: &mut [D],
    layout: ChannelLayout,
    colormap: &Colormap,
) {
    match (layout, colormap.channels()) {
        (ChannelLayout::ThreeInFour, _) => convert::<S, D, 3>(&src[1..], dst, 4, colormap),
        (ChannelLayout::Packed, 3) => convert::<S, D, 3>(src, dst, 3, colormap),
        (ChannelLayout::Packed, _) => convert::<S, D, 4>(src, dst, 4, colormap),
    }
}

fn convert<S: Sample, D: IndexSample, const N: usize>(
    src: &[S],
    dst: &mut [D],
    step: usize,
    colormap: &Colormap,
) {
    let pixels = src.chunks(step);
    let offset = colormap.offset();

    match colormap.search() {
        SearchTables::ColorCube { bits, table } => {
            for (d, px) in dst.iter_mut().zip(pixels) {
                let c = unsigned_color::<S, N>(px);
                *d = D::from_index(table[cube_index(&c, S::BITS, *bits)]);
            }
        }
        SearchTables::OctTree { tree } => {
            let search = TreeSearch::<N>::new(tree, colormap.unsigned_palette(), S::SHIFT);
            for (d, px) in dst.iter_mut().zip(pixels) {
                let c = unsigned_color::<S, N>(px);
                *d = D::from_index(search.nearest(&c).index + offset);
            }
        }
        SearchTables::BruteForce => {
            let palette = colormap.double_palette();
            for (d, px) in dst.iter_mut().zip(pixels) {
                let mut c = [0f64; N];
                for (v, s) in c.iter_mut().zip(px) {
                    *v = s.to_i32() as f64;
                }
                let k = nearest_brute_force(palette, &c, S::BRUTE_FORCE_SCALE);
                *d = D::from_index(k as u32 + offset);
            }
        }
        SearchTables::IndependentChannel { tables } => {
            for (d, px) in dst.iter_mut().zip(pixels) {
                *d = D::from_index(dimension_lookup(tables, &px[..N]) as u32);
            }
        }
    }
}
