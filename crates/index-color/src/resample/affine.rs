//! Affine transforms and their per-row fixed-point source spans.
//!
//! Pixel centres sit at half-integer coordinates. A destination pixel
//! `(xd, yd)` samples the source at the inverse image of its centre, shifted
//! by half a pixel so that the integer part addresses the sample to the left
//! of the point. Coordinates are stepped across a row in 16.16 fixed point.

use super::filter::{Filter, COORD_SHIFT};

/// 2x3 affine matrix mapping source coordinates to destination
/// coordinates: `x' = a*x + b*y + tx`, `y' = c*x + d*y + ty`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    pub const fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Counter-clockwise rotation by `radians` (y axis pointing down, so it
    /// appears clockwise on screen).
    pub fn rotate(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(cos, -sin, sin, cos, 0.0, 0.0)
    }

    /// Apply `self`, then `next`.
    ///
    /// # Example
    ///
    /// ```
    /// use index_color::AffineTransform;
    ///
    /// let t = AffineTransform::scale(2.0, 2.0).then(&AffineTransform::translate(1.0, 0.0));
    /// assert_eq!(t.apply(3.0, 4.0), (7.0, 8.0));
    /// ```
    pub fn then(&self, next: &Self) -> Self {
        Self {
            a: next.a * self.a + next.b * self.c,
            b: next.a * self.b + next.b * self.d,
            c: next.c * self.a + next.d * self.c,
            d: next.c * self.b + next.d * self.d,
            tx: next.a * self.tx + next.b * self.ty + next.tx,
            ty: next.c * self.tx + next.d * self.ty + next.ty,
        }
    }

    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.b * y + self.tx,
            self.c * x + self.d * y + self.ty,
        )
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// `None` when the matrix is singular or not finite.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < f64::EPSILON {
            return None;
        }
        let a = self.d / det;
        let b = -self.b / det;
        let c = -self.c / det;
        let d = self.a / det;
        let inv = Self {
            a,
            b,
            c,
            d,
            tx: -(a * self.tx + b * self.ty),
            ty: -(c * self.tx + d * self.ty),
        };
        [inv.a, inv.b, inv.c, inv.d, inv.tx, inv.ty]
            .iter()
            .all(|v| v.is_finite())
            .then_some(inv)
    }
}

/// Fixed-point source walk of one destination row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    /// First destination column written.
    pub x_left: usize,
    /// One past the last destination column written.
    pub x_right: usize,
    /// Source coordinates of `x_left`, 16.16.
    pub x: i64,
    pub y: i64,
    /// Source step per destination column, 16.16.
    pub dx: i64,
    pub dy: i64,
}

impl RowSpan {
    #[inline]
    pub fn len(&self) -> usize {
        self.x_right - self.x_left
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x_right <= self.x_left
    }
}

/// Computes the [`RowSpan`] of every destination row for one source size
/// and filter.
#[derive(Debug, Clone)]
pub struct SpanWalker {
    inverse: AffineTransform,
    src_width: i64,
    src_height: i64,
    dst_width: usize,
    taps: i64,
    origin: i64,
    dx: i64,
    dy: i64,
}

/// Bound on 16.16 magnitudes so that `inside` has headroom.
const FIXED_LIMIT: f64 = (1i64 << 62) as f64;

#[inline]
fn fixed(v: f64) -> Option<i64> {
    let scaled = (v * (1i64 << COORD_SHIFT) as f64).round();
    (scaled.is_finite() && scaled.abs() < FIXED_LIMIT).then_some(scaled as i64)
}

impl SpanWalker {
    /// `inverse` maps destination coordinates back to the source.
    ///
    /// Returns `None` when stepping across a `dst_width` by `dst_height`
    /// destination would leave the 16.16 range.
    pub fn new(
        inverse: AffineTransform,
        src_width: usize,
        src_height: usize,
        dst_width: usize,
        dst_height: usize,
        filter: Filter,
    ) -> Option<Self> {
        let walker = Self {
            inverse,
            src_width: i64::try_from(src_width).ok()?,
            src_height: i64::try_from(src_height).ok()?,
            dst_width,
            taps: filter.taps() as i64,
            origin: filter.origin(),
            dx: fixed(inverse.a)?,
            dy: fixed(inverse.c)?,
        };

        // Coordinates are linear in (k, yd), so the four corners bound every step
        let width = i64::try_from(dst_width).ok()?;
        for yd in [0, dst_height.saturating_sub(1)] {
            let (x0, y0) = walker.row_origin(yd)?;
            for (start, step) in [(x0, walker.dx), (y0, walker.dy)] {
                let end = step.checked_mul(width)?.checked_add(start)?;
                if (end as f64).abs() >= FIXED_LIMIT {
                    return None;
                }
            }
        }
        Some(walker)
    }

    #[inline]
    pub fn dst_width(&self) -> usize {
        self.dst_width
    }

    /// 16.16 source position of the first pixel of row `yd`.
    fn row_origin(&self, yd: usize) -> Option<(i64, i64)> {
        let inv = &self.inverse;
        let yc = yd as f64 + 0.5;
        Some((
            fixed(inv.a * 0.5 + inv.b * yc + inv.tx - 0.5)?,
            fixed(inv.c * 0.5 + inv.d * yc + inv.ty - 0.5)?,
        ))
    }

    /// Whether the whole filter neighbourhood of a 16.16 coordinate pair
    /// lies inside the source.
    #[inline]
    fn inside(&self, x: i64, y: i64) -> bool {
        let bx = (x >> COORD_SHIFT) + self.origin;
        let by = (y >> COORD_SHIFT) + self.origin;
        bx >= 0 && by >= 0 && bx + self.taps <= self.src_width && by + self.taps <= self.src_height
    }

    /// Span of destination row `yd`, or `None` when no pixel of the row can
    /// be computed.
    pub fn row(&self, yd: usize) -> Option<RowSpan> {
        let (x0, y0) = self.row_origin(yd)?;
        let (dx, dy) = (self.dx, self.dy);

        let at = |k: usize| (x0 + k as i64 * dx, y0 + k as i64 * dy);
        let x_left = (0..self.dst_width).find(|&k| {
            let (x, y) = at(k);
            self.inside(x, y)
        })?;
        let x_right = (x_left..self.dst_width)
            .find(|&k| {
                let (x, y) = at(k);
                !self.inside(x, y)
            })
            .unwrap_or(self.dst_width);

        let (x, y) = at(x_left);
        Some(RowSpan {
            x_left,
            x_right,
            x,
            y,
            dx,
            dy,
        })
    }
}
