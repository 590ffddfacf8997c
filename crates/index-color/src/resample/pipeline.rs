//! Affine resampling driver.
//!
//! Rows are produced one at a time into a scratch row and then either
//! copied into a true-color destination or quantized straight into an
//! indexed one, so scratch memory never exceeds one destination row.

use super::affine::{AffineTransform, RowSpan, SpanWalker};
use super::error::ResampleError;
use super::filter::{Filter, FilterTable};
use super::kernel::{convolve_row, IndexedSource, SourceRows, TrueColorSource};
use super::scratch::RowScratch;
use crate::color::{IndexSample, Sample, SampleType};
use crate::colormap::Colormap;
use crate::dispatch::convert_row;
use crate::image::{ChannelLayout, Geometry, ImageView, ImageViewMut, Pixels, PixelsMut};

/// Resample `src` into `dst` under `transform` (source to destination
/// coordinates).
///
/// With a colormap, a single-channel source is read as palette indices and
/// a single-channel destination receives palette indices; otherwise both
/// images are true color of the same type and channel count. Destination
/// pixels whose filter neighbourhood leaves the source are not written.
///
/// # Example
///
/// ```
/// use index_color::{affine_resample, AffineTransform, Filter, ImageView, ImageViewMut};
///
/// let src_px = vec![80u8; 8 * 8 * 3];
/// let mut dst_px = vec![0u8; 16 * 16 * 3];
/// let src = ImageView::new(&src_px[..], 8, 8, 3).unwrap();
/// let mut dst = ImageViewMut::new(&mut dst_px[..], 16, 16, 3).unwrap();
///
/// let zoom = AffineTransform::scale(2.0, 2.0);
/// affine_resample(&mut dst, &src, &zoom, Filter::Bicubic, None).unwrap();
/// assert_eq!(dst_px[(8 * 16 + 8) * 3], 80);
/// ```
pub fn affine_resample(
    dst: &mut ImageViewMut<'_>,
    src: &ImageView<'_>,
    transform: &AffineTransform,
    filter: Filter,
    colormap: Option<&Colormap>,
) -> Result<(), ResampleError> {
    let inverse = transform
        .inverse()
        .ok_or(ResampleError::DegenerateTransform)?;
    let sg = *src.geometry();
    let dg = *dst.geometry();
    let walker = SpanWalker::new(inverse, sg.width, sg.height, dg.width, dg.height, filter)
        .ok_or(ResampleError::DegenerateTransform)?;

    let as_indexed = |g: &Geometry| colormap.filter(|_| g.channels == 1);
    match (as_indexed(&sg), as_indexed(&dg)) {
        (None, None) => true_to_true(dst, src, &walker, filter)?,
        (None, Some(cm)) => true_to_indexed(dst, src, &walker, filter, cm)?,
        (Some(cm), None) => indexed_to_true(dst, src, &walker, filter, cm)?,
        (Some(cm), Some(_)) => indexed_to_indexed(dst, src, &walker, filter, cm)?,
    }

    tracing::trace!(
        src_width = sg.width,
        src_height = sg.height,
        dst_width = dg.width,
        dst_height = dg.height,
        %filter,
        indexed = colormap.is_some(),
        "resampled image"
    );
    Ok(())
}

fn true_to_true(
    dst: &mut ImageViewMut<'_>,
    src: &ImageView<'_>,
    walker: &SpanWalker,
    filter: Filter,
) -> Result<(), ResampleError> {
    let (sg, dg) = (*src.geometry(), *dst.geometry());
    if !src.sample_type().is_color() {
        return Err(ResampleError::MissingColormap);
    }
    if sg.channels != dg.channels {
        return Err(ResampleError::ChannelMismatch {
            expected: sg.channels,
            actual: dg.channels,
        });
    }
    if sg.layout != dg.layout {
        return Err(ResampleError::UnsupportedLayout);
    }

    match (src.pixels(), dst.pixels_mut()) {
        (Pixels::U8(s), PixelsMut::U8(d)) => {
            write_true(&true_color(s, &sg), d, &dg, walker, filter)
        }
        (Pixels::S16(s), PixelsMut::S16(d)) => {
            write_true(&true_color(s, &sg), d, &dg, walker, filter)
        }
        (s, d) => Err(ResampleError::TypeMismatch {
            input: s.sample_type(),
            output: d.sample_type(),
        }),
    }
}

fn true_to_indexed(
    dst: &mut ImageViewMut<'_>,
    src: &ImageView<'_>,
    walker: &SpanWalker,
    filter: Filter,
    colormap: &Colormap,
) -> Result<(), ResampleError> {
    let (sg, dg) = (*src.geometry(), *dst.geometry());
    check_types(src.sample_type(), colormap.input_type())?;
    check_types(colormap.output_type(), dst.sample_type())?;
    if sg.color_channels() != colormap.channels() {
        return Err(ResampleError::ChannelMismatch {
            expected: colormap.channels(),
            actual: sg.color_channels(),
        });
    }

    match (src.pixels(), dst.pixels_mut()) {
        (Pixels::U8(s), PixelsMut::U8(d)) => {
            write_indexed::<u8, _, _>(
                &true_color(s, &sg),
                d,
                &dg,
                walker,
                filter,
                sg.layout,
                colormap,
            )
        }
        (Pixels::U8(s), PixelsMut::U16(d)) => {
            write_indexed::<u8, _, _>(
                &true_color(s, &sg),
                d,
                &dg,
                walker,
                filter,
                sg.layout,
                colormap,
            )
        }
        (Pixels::S16(s), PixelsMut::U8(d)) => {
            write_indexed::<i16, _, _>(
                &true_color(s, &sg),
                d,
                &dg,
                walker,
                filter,
                sg.layout,
                colormap,
            )
        }
        (Pixels::S16(s), PixelsMut::U16(d)) => {
            write_indexed::<i16, _, _>(
                &true_color(s, &sg),
                d,
                &dg,
                walker,
                filter,
                sg.layout,
                colormap,
            )
        }
        (s, d) => Err(ResampleError::TypeMismatch {
            input: s.sample_type(),
            output: d.sample_type(),
        }),
    }
}

fn indexed_to_true(
    dst: &mut ImageViewMut<'_>,
    src: &ImageView<'_>,
    walker: &SpanWalker,
    filter: Filter,
    colormap: &Colormap,
) -> Result<(), ResampleError> {
    let (sg, dg) = (*src.geometry(), *dst.geometry());
    check_types(colormap.input_type(), dst.sample_type())?;
    if dg.layout != ChannelLayout::Packed {
        return Err(ResampleError::UnsupportedLayout);
    }
    if dg.channels != colormap.channels() {
        return Err(ResampleError::ChannelMismatch {
            expected: colormap.channels(),
            actual: dg.channels,
        });
    }

    match (src.pixels(), dst.pixels_mut()) {
        (Pixels::U8(s), PixelsMut::U8(d)) => {
            write_true(&indexed(s, &sg, colormap), d, &dg, walker, filter)
        }
        (Pixels::U8(s), PixelsMut::S16(d)) => {
            write_true(&indexed(s, &sg, colormap), d, &dg, walker, filter)
        }
        (Pixels::U16(s), PixelsMut::U8(d)) => {
            write_true(&indexed(s, &sg, colormap), d, &dg, walker, filter)
        }
        (Pixels::U16(s), PixelsMut::S16(d)) => {
            write_true(&indexed(s, &sg, colormap), d, &dg, walker, filter)
        }
        (s, d) => Err(ResampleError::TypeMismatch {
            input: s.sample_type(),
            output: d.sample_type(),
        }),
    }
}

fn indexed_to_indexed(
    dst: &mut ImageViewMut<'_>,
    src: &ImageView<'_>,
    walker: &SpanWalker,
    filter: Filter,
    colormap: &Colormap,
) -> Result<(), ResampleError> {
    let (sg, dg) = (*src.geometry(), *dst.geometry());
    check_types(colormap.output_type(), dst.sample_type())?;
    let layout = ChannelLayout::Packed;

    match (src.pixels(), colormap.input_type(), dst.pixels_mut()) {
        (Pixels::U8(s), SampleType::U8, PixelsMut::U8(d)) => write_indexed::<u8, _, _>(
            &indexed(s, &sg, colormap),
            d,
            &dg,
            walker,
            filter,
            layout,
            colormap,
        ),
        (Pixels::U8(s), SampleType::U8, PixelsMut::U16(d)) => write_indexed::<u8, _, _>(
            &indexed(s, &sg, colormap),
            d,
            &dg,
            walker,
            filter,
            layout,
            colormap,
        ),
        (Pixels::U8(s), SampleType::S16, PixelsMut::U8(d)) => write_indexed::<i16, _, _>(
            &indexed(s, &sg, colormap),
            d,
            &dg,
            walker,
            filter,
            layout,
            colormap,
        ),
        (Pixels::U8(s), SampleType::S16, PixelsMut::U16(d)) => write_indexed::<i16, _, _>(
            &indexed(s, &sg, colormap),
            d,
            &dg,
            walker,
            filter,
            layout,
            colormap,
        ),
        (Pixels::U16(s), SampleType::U8, PixelsMut::U8(d)) => write_indexed::<u8, _, _>(
            &indexed(s, &sg, colormap),
            d,
            &dg,
            walker,
            filter,
            layout,
            colormap,
        ),
        (Pixels::U16(s), SampleType::U8, PixelsMut::U16(d)) => write_indexed::<u8, _, _>(
            &indexed(s, &sg, colormap),
            d,
            &dg,
            walker,
            filter,
            layout,
            colormap,
        ),
        (Pixels::U16(s), SampleType::S16, PixelsMut::U8(d)) => write_indexed::<i16, _, _>(
            &indexed(s, &sg, colormap),
            d,
            &dg,
            walker,
            filter,
            layout,
            colormap,
        ),
        (Pixels::U16(s), SampleType::S16, PixelsMut::U16(d)) => write_indexed::<i16, _, _>(
            &indexed(s, &sg, colormap),
            d,
            &dg,
            walker,
            filter,
            layout,
            colormap,
        ),
        (s, _, d) => Err(ResampleError::TypeMismatch {
            input: s.sample_type(),
            output: d.sample_type(),
        }),
    }
}

fn check_types(input: SampleType, output: SampleType) -> Result<(), ResampleError> {
    if input != output {
        return Err(ResampleError::TypeMismatch { input, output });
    }
    Ok(())
}

fn true_color<'a, S>(pixels: &'a [S], g: &Geometry) -> TrueColorSource<'a, S> {
    TrueColorSource {
        pixels,
        stride: g.stride,
        channels: g.channels,
    }
}

fn indexed<'a, D>(pixels: &'a [D], g: &Geometry, colormap: &'a Colormap) -> IndexedSource<'a, D> {
    IndexedSource {
        pixels,
        stride: g.stride,
        lut: colormap.normal_table(),
        offset: colormap.offset(),
    }
}

/// Interpolate every row into scratch and hand the computed span to `emit`.
/// The scratch row is allocated before the first call to `emit`.
fn run<S: Sample, R: SourceRows>(
    src: &R,
    walker: &SpanWalker,
    filter: Filter,
    height: usize,
    mut emit: impl FnMut(usize, &RowSpan, &[S]),
) -> Result<(), ResampleError> {
    let channels = src.channels();
    let table = FilterTable::for_sample::<S>(filter);
    let mut scratch = RowScratch::<S>::new(walker.dst_width() * channels)?;
    let row = scratch.as_mut_slice();

    for y in 0..height {
        let Some(span) = walker.row(y) else {
            continue;
        };
        let out = &mut row[..span.len() * channels];
        convolve_row(src, &span, &table, out);
        emit(y, &span, out);
    }
    Ok(())
}

fn write_true<S: Sample, R: SourceRows>(
    src: &R,
    dst: &mut [S],
    dg: &Geometry,
    walker: &SpanWalker,
    filter: Filter,
) -> Result<(), ResampleError> {
    let channels = src.channels();
    run(src, walker, filter, dg.height, |y, span, row: &[S]| {
        dst[y * dg.stride + span.x_left * channels..][..row.len()].copy_from_slice(row);
    })
}

fn write_indexed<S: Sample, D: IndexSample, R: SourceRows>(
    src: &R,
    dst: &mut [D],
    dg: &Geometry,
    walker: &SpanWalker,
    filter: Filter,
    layout: ChannelLayout,
    colormap: &Colormap,
) -> Result<(), ResampleError> {
    run(src, walker, filter, dg.height, |y, span, row: &[S]| {
        let out = &mut dst[y * dg.stride + span.x_left..][..span.len()];
        convert_row(row, out, layout, colormap);
    })
}
