//! Channel sample types and the per-type numeric constants used by every
//! search strategy and resampling kernel.
//!
//! True-color images carry either `u8` or `i16` samples. Signed 16-bit
//! samples are bias-shifted into `0..65536` before any distance arithmetic so
//! that both widths can share unsigned integer math. Index images carry `u8`
//! or `u16` palette indices.

use std::fmt;

/// Storage type tag of an image or colormap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleType {
    /// Unsigned 8-bit samples (true color or index).
    U8,
    /// Signed 16-bit samples (true color only).
    S16,
    /// Unsigned 16-bit samples (index only).
    U16,
}

impl SampleType {
    /// True for types a true-color source may use.
    #[inline]
    pub fn is_color(self) -> bool {
        matches!(self, SampleType::U8 | SampleType::S16)
    }

    /// True for types an index image may use.
    #[inline]
    pub fn is_index(self) -> bool {
        matches!(self, SampleType::U8 | SampleType::U16)
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleType::U8 => write!(f, "u8"),
            SampleType::S16 => write!(f, "s16"),
            SampleType::U16 => write!(f, "u16"),
        }
    }
}

/// A true-color channel sample.
pub trait Sample: Copy + Default + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Storage tag.
    const TYPE: SampleType;
    /// Significant bits per channel.
    const BITS: u32;
    /// Right shift applied to each squared channel difference.
    const SHIFT: u32;
    /// Exclusive upper bound of the bias-shifted channel range.
    const COLOR_MAX: u32;
    /// Entries in an independent-channel lookup table.
    const DIMENSION_LEN: usize;
    /// Fractional bits used to pick a resampling filter phase.
    const FILTER_BITS: u32;
    /// Smallest representable sample.
    const MIN: i32;
    /// Largest representable sample.
    const MAX: i32;
    /// Factor applied to brute-force double distances before truncation.
    const BRUTE_FORCE_SCALE: f64;

    /// Bias-shift into `0..COLOR_MAX`.
    fn to_unsigned(self) -> u32;

    /// Inverse of [`to_unsigned`](Self::to_unsigned).
    fn from_unsigned(value: u32) -> Self;

    fn to_i32(self) -> i32;

    /// Clamp an interpolated value into the representable range.
    fn saturate(value: i64) -> Self;

    /// Row of an independent-channel table addressed by this sample.
    fn dimension_index(self) -> usize;

    /// Representative sample for an independent-channel table row.
    fn from_dimension_index(index: usize) -> Self;

    /// Largest color-cube `bits` for the given channel count.
    fn max_cube_bits(channels: usize) -> u32;

    /// Color-cube `bits` used when none is configured.
    fn default_cube_bits() -> u32;
}

impl Sample for u8 {
    const TYPE: SampleType = SampleType::U8;
    const BITS: u32 = 8;
    const SHIFT: u32 = 0;
    const COLOR_MAX: u32 = 256;
    const DIMENSION_LEN: usize = 256;
    const FILTER_BITS: u32 = 8;
    const MIN: i32 = 0;
    const MAX: i32 = u8::MAX as i32;
    const BRUTE_FORCE_SCALE: f64 = 1.0;

    #[inline]
    fn to_unsigned(self) -> u32 {
        self as u32
    }

    #[inline]
    fn from_unsigned(value: u32) -> Self {
        debug_assert!(value < Self::COLOR_MAX);
        value as u8
    }

    #[inline]
    fn to_i32(self) -> i32 {
        self as i32
    }

    #[inline]
    fn saturate(value: i64) -> Self {
        value.clamp(<Self as Sample>::MIN as i64, <Self as Sample>::MAX as i64) as u8
    }

    #[inline]
    fn dimension_index(self) -> usize {
        self as usize
    }

    #[inline]
    fn from_dimension_index(index: usize) -> Self {
        index as u8
    }

    fn max_cube_bits(_channels: usize) -> u32 {
        8
    }

    fn default_cube_bits() -> u32 {
        4
    }
}

impl Sample for i16 {
    const TYPE: SampleType = SampleType::S16;
    const BITS: u32 = 16;
    const SHIFT: u32 = 2;
    const COLOR_MAX: u32 = 65536;
    const DIMENSION_LEN: usize = 1024;
    const FILTER_BITS: u32 = 9;
    const MIN: i32 = i16::MIN as i32;
    const MAX: i32 = i16::MAX as i32;
    const BRUTE_FORCE_SCALE: f64 = 0.125;

    #[inline]
    fn to_unsigned(self) -> u32 {
        (self as i32 - <Self as Sample>::MIN) as u32
    }

    #[inline]
    fn from_unsigned(value: u32) -> Self {
        debug_assert!(value < Self::COLOR_MAX);
        (value as i32 + <Self as Sample>::MIN) as i16
    }

    #[inline]
    fn to_i32(self) -> i32 {
        self as i32
    }

    #[inline]
    fn saturate(value: i64) -> Self {
        value.clamp(<Self as Sample>::MIN as i64, <Self as Sample>::MAX as i64) as i16
    }

    /// Raw bit pattern reduced to 10 bits, no bias.
    #[inline]
    fn dimension_index(self) -> usize {
        ((self as u16) >> 6) as usize
    }

    #[inline]
    fn from_dimension_index(index: usize) -> Self {
        (((index as u16) << 6) | 32) as i16
    }

    fn max_cube_bits(channels: usize) -> u32 {
        if channels == 3 {
            10
        } else {
            8
        }
    }

    fn default_cube_bits() -> u32 {
        5
    }
}

/// A palette index sample of an index image.
pub trait IndexSample: Copy + Default + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Storage tag.
    const TYPE: SampleType;
    /// Number of distinct indices the type can hold.
    const CAPACITY: usize;

    /// Store an index, truncating to the type's width.
    fn from_index(index: u32) -> Self;

    fn to_index(self) -> u32;
}

impl IndexSample for u8 {
    const TYPE: SampleType = SampleType::U8;
    const CAPACITY: usize = 256;

    #[inline]
    fn from_index(index: u32) -> Self {
        index as u8
    }

    #[inline]
    fn to_index(self) -> u32 {
        self as u32
    }
}

impl IndexSample for u16 {
    const TYPE: SampleType = SampleType::U16;
    const CAPACITY: usize = 65536;

    #[inline]
    fn from_index(index: u32) -> Self {
        index as u16
    }

    #[inline]
    fn to_index(self) -> u32 {
        self as u32
    }
}

/// Capacity of an index type tag, `None` for color-only types.
pub fn index_capacity(index_type: SampleType) -> Option<usize> {
    match index_type {
        SampleType::U8 => Some(<u8 as IndexSample>::CAPACITY),
        SampleType::U16 => Some(<u16 as IndexSample>::CAPACITY),
        SampleType::S16 => None,
    }
}

/// Bias-shift `N` consecutive samples.
#[inline]
pub fn unsigned_color<S: Sample, const N: usize>(samples: &[S]) -> [u32; N] {
    debug_assert!(samples.len() >= N);
    let mut color = [0u32; N];
    for (dst, &src) in color.iter_mut().zip(samples) {
        *dst = src.to_unsigned();
    }
    color
}
