//! Interpolation filters and their fixed-point coefficient tables.
//!
//! The tables are generated at compile time by build.rs. Each phase holds
//! Q14 coefficients that sum to exactly 16384, so a constant source stays
//! constant after convolution.

use std::fmt;

use crate::color::Sample;

include!(concat!(env!("OUT_DIR"), "/filter_tables.rs"));

/// Fractional bits of every coefficient.
pub const FILTER_SHIFT: u32 = 14;

/// Fractional bits of source coordinates.
pub const COORD_SHIFT: u32 = 16;

/// Interpolation kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    /// 2x2 neighbourhood.
    Bilinear,
    /// 4x4 Keys cubic with a = -0.5 (smooth).
    #[default]
    Bicubic,
    /// 4x4 Keys cubic with a = -1.0 (sharp).
    Bicubic2,
}

impl Filter {
    /// Taps per axis.
    #[inline]
    pub fn taps(self) -> usize {
        match self {
            Filter::Bilinear => 2,
            Filter::Bicubic | Filter::Bicubic2 => 4,
        }
    }

    /// Position of the first tap relative to the sample left of (or at) the
    /// source coordinate.
    #[inline]
    pub fn origin(self) -> i64 {
        match self {
            Filter::Bilinear => 0,
            Filter::Bicubic | Filter::Bicubic2 => -1,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Bilinear => write!(f, "bilinear"),
            Filter::Bicubic => write!(f, "bicubic"),
            Filter::Bicubic2 => write!(f, "bicubic2"),
        }
    }
}

/// Coefficient table of one filter at the phase resolution of one sample
/// type.
#[derive(Debug, Clone, Copy)]
pub struct FilterTable {
    filter: Filter,
    coeffs: &'static [i16],
    phase_bits: u32,
}

impl FilterTable {
    pub fn for_sample<S: Sample>(filter: Filter) -> Self {
        let coeffs: &'static [i16] = match (filter, S::FILTER_BITS) {
            (Filter::Bilinear, 8) => &BILINEAR_U8,
            (Filter::Bicubic, 8) => &BICUBIC_U8,
            (Filter::Bicubic2, 8) => &BICUBIC2_U8,
            (Filter::Bilinear, _) => &BILINEAR_S16,
            (Filter::Bicubic, _) => &BICUBIC_S16,
            (Filter::Bicubic2, _) => &BICUBIC2_S16,
        };
        Self {
            filter,
            coeffs,
            phase_bits: S::FILTER_BITS,
        }
    }

    #[inline]
    pub fn filter(&self) -> Filter {
        self.filter
    }

    #[inline]
    pub fn taps(&self) -> usize {
        self.filter.taps()
    }

    #[inline]
    pub fn phases(&self) -> usize {
        1 << self.phase_bits
    }

    /// Coefficients for the fractional part of a 16.16 coordinate.
    #[inline]
    pub fn phase(&self, coord: i64) -> &'static [i16] {
        let mask = (1i64 << self.phase_bits) - 1;
        let phase = ((coord >> (COORD_SHIFT - self.phase_bits)) & mask) as usize;
        let taps = self.taps();
        &self.coeffs[phase * taps..][..taps]
    }
}
