//! Separable convolution kernels.
//!
//! Each output channel is the 4x4 (bicubic) or 2x2 (bilinear) neighbourhood
//! convolved horizontally with the x-phase coefficients, then vertically
//! with the y-phase coefficients. Both passes accumulate in `i64` at full
//! precision and the result is rounded once.

use super::affine::RowSpan;
use super::filter::{FilterTable, COORD_SHIFT, FILTER_SHIFT};
use crate::color::{IndexSample, Sample};

/// Source of interpolation input: one channel value at a sample position.
pub trait SourceRows {
    /// Channel values produced per pixel.
    fn channels(&self) -> usize;

    fn sample(&self, x: usize, y: usize, channel: usize) -> i32;
}

/// Interleaved true-color samples.
pub struct TrueColorSource<'a, S> {
    pub pixels: &'a [S],
    pub stride: usize,
    pub channels: usize,
}

impl<S: Sample> SourceRows for TrueColorSource<'_, S> {
    #[inline]
    fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    fn sample(&self, x: usize, y: usize, channel: usize) -> i32 {
        self.pixels[y * self.stride + x * self.channels + channel].to_i32()
    }
}

/// Palette indices expanded through per-channel palette arrays.
///
/// Indices outside `offset..offset + entries` read as zero.
pub struct IndexedSource<'a, D> {
    pub pixels: &'a [D],
    pub stride: usize,
    pub lut: &'a [Vec<i32>],
    pub offset: u32,
}

impl<D: IndexSample> SourceRows for IndexedSource<'_, D> {
    #[inline]
    fn channels(&self) -> usize {
        self.lut.len()
    }

    #[inline]
    fn sample(&self, x: usize, y: usize, channel: usize) -> i32 {
        let index = self.pixels[y * self.stride + x].to_index();
        index
            .checked_sub(self.offset)
            .and_then(|k| self.lut[channel].get(k as usize))
            .copied()
            .unwrap_or(0)
    }
}

/// Rounding of the combined `2 * FILTER_SHIFT` fixed-point product.
const ROUND: i64 = 1 << (2 * FILTER_SHIFT - 1);

/// Convolve one channel around the neighbourhood whose top-left tap is
/// `(bx, by)`.
#[inline]
fn convolve<R: SourceRows>(
    src: &R,
    bx: usize,
    by: usize,
    fx: &[i16],
    fy: &[i16],
    channel: usize,
) -> i64 {
    let mut acc = 0i64;
    for (j, &wy) in fy.iter().enumerate() {
        let mut row = 0i64;
        for (i, &wx) in fx.iter().enumerate() {
            row += wx as i64 * src.sample(bx + i, by + j, channel) as i64;
        }
        acc += row * wy as i64;
    }
    acc
}

/// Interpolate the pixels of `span` into `out`, `src.channels()` samples
/// per pixel.
///
/// Every neighbourhood addressed by the span must lie inside the source;
/// [`SpanWalker`](super::SpanWalker) only produces such spans.
pub fn convolve_row<S: Sample, R: SourceRows>(
    src: &R,
    span: &RowSpan,
    table: &FilterTable,
    out: &mut [S],
) {
    let channels = src.channels();
    let origin = table.filter().origin();
    debug_assert!(out.len() >= span.len() * channels);

    let mut x = span.x;
    let mut y = span.y;
    for px in out.chunks_exact_mut(channels).take(span.len()) {
        let bx = ((x >> COORD_SHIFT) + origin) as usize;
        let by = ((y >> COORD_SHIFT) + origin) as usize;
        let fx = table.phase(x);
        let fy = table.phase(y);
        for (channel, v) in px.iter_mut().enumerate() {
            let acc = convolve(src, bx, by, fx, fy, channel);
            *v = S::saturate((acc + ROUND) >> (2 * FILTER_SHIFT));
        }
        x += span.dx;
        y += span.dy;
    }
}

/// Two-tap variant of [`convolve_row`].
#[inline]
pub fn bilinear_row<S: Sample, R: SourceRows>(
    src: &R,
    span: &RowSpan,
    table: &FilterTable,
    out: &mut [S],
) {
    debug_assert_eq!(table.taps(), 2);
    convolve_row(src, span, table, out)
}

/// Four-tap variant of [`convolve_row`].
#[inline]
pub fn bicubic_row<S: Sample, R: SourceRows>(
    src: &R,
    span: &RowSpan,
    table: &FilterTable,
    out: &mut [S],
) {
    debug_assert_eq!(table.taps(), 4);
    convolve_row(src, span, table, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resample::Filter;
    use pretty_assertions::assert_eq;

    fn span(x: i64, y: i64, dx: i64, len: usize) -> RowSpan {
        RowSpan {
            x_left: 0,
            x_right: len,
            x,
            y,
            dx,
            dy: 0,
        }
    }

    #[test]
    fn test_bilinear_midpoint() {
        // 2x2 grey: 0 10 / 20 30
        let pixels = [0u8, 10, 20, 30];
        let src = TrueColorSource {
            pixels: &pixels[..],
            stride: 2,
            channels: 1,
        };
        let table = FilterTable::for_sample::<u8>(Filter::Bilinear);
        let mut out = [0u8; 1];
        bilinear_row(&src, &span(1 << 15, 1 << 15, 0, 1), &table, &mut out);
        assert_eq!(out, [15]);
    }

    #[test]
    fn test_integer_positions_copy_source() {
        let pixels: Vec<u8> = (0..36).map(|v| v * 7).collect();
        let src = TrueColorSource {
            pixels: &pixels[..],
            stride: 6,
            channels: 1,
        };
        let table = FilterTable::for_sample::<u8>(Filter::Bicubic);
        let mut out = [0u8; 3];
        bicubic_row(&src, &span(1 << 16, 2 << 16, 1 << 16, 3), &table, &mut out);
        assert_eq!(out, [pixels[13], pixels[14], pixels[15]]);
    }

    #[test]
    fn test_overshoot_saturates() {
        // The sharp cubic rings past 255 just right of a hard edge
        let mut pixels = [0u8; 24];
        for row in pixels.chunks_exact_mut(6) {
            row[3..].fill(255);
        }
        let src = TrueColorSource {
            pixels: &pixels[..],
            stride: 6,
            channels: 1,
        };
        let table = FilterTable::for_sample::<u8>(Filter::Bicubic2);
        let mut out = [0u8; 2];
        // x = 3.25 overshoots, x = 1.75 undershoots
        let walk = RowSpan {
            dx: -0x1_8000,
            ..span(0x3_4000, 1 << 16, 0, 2)
        };
        bicubic_row(&src, &walk, &table, &mut out);
        assert_eq!(out, [255, 0]);
    }

    #[test]
    fn test_signed_samples_round_symmetrically() {
        let pixels = [-100i16, -100, -100, -100];
        let src = TrueColorSource {
            pixels: &pixels[..],
            stride: 2,
            channels: 1,
        };
        let table = FilterTable::for_sample::<i16>(Filter::Bilinear);
        let mut out = [0i16; 1];
        bilinear_row(&src, &span(0x8123, 0x4567, 0, 1), &table, &mut out);
        assert_eq!(out, [-100]);
    }

    #[test]
    fn test_indexed_source_expands_through_palette() {
        let lut = vec![vec![0, 200], vec![10, 20], vec![5, 5]];
        let pixels = [3u8, 4, 4, 3];
        let src = IndexedSource {
            pixels: &pixels[..],
            stride: 2,
            lut: &lut,
            offset: 3,
        };
        assert_eq!(src.channels(), 3);
        assert_eq!(src.sample(1, 0, 0), 200);
        assert_eq!(src.sample(0, 1, 1), 20);

        let table = FilterTable::for_sample::<u8>(Filter::Bilinear);
        let mut out = [0u8; 3];
        bilinear_row(&src, &span(1 << 15, 0, 0, 1), &table, &mut out);
        assert_eq!(out, [100, 15, 5]);
    }

    #[test]
    fn test_out_of_range_index_reads_zero() {
        let lut = vec![vec![9], vec![9], vec![9]];
        let pixels = [0u16, 5];
        let src = IndexedSource {
            pixels: &pixels[..],
            stride: 2,
            lut: &lut,
            offset: 1,
        };
        assert_eq!(src.sample(0, 0, 0), 0);
        assert_eq!(src.sample(1, 0, 2), 0);
    }
}
