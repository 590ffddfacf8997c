//! Borrowed image descriptors.
//!
//! A view pairs a typed sample buffer with its geometry. Rows start every
//! `stride` samples; only the first `width * channels` samples of a row are
//! pixels.

use super::error::ImageError;
use crate::color::SampleType;

/// How the channels of a pixel are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelLayout {
    /// Every channel is a color channel.
    #[default]
    Packed,
    /// Four slots per pixel, color in slots 1..4, slot 0 ignored.
    ThreeInFour,
}

/// Read-only sample storage.
#[derive(Debug, Clone, Copy)]
pub enum Pixels<'a> {
    U8(&'a [u8]),
    S16(&'a [i16]),
    U16(&'a [u16]),
}

impl Pixels<'_> {
    pub fn sample_type(&self) -> SampleType {
        match self {
            Pixels::U8(_) => SampleType::U8,
            Pixels::S16(_) => SampleType::S16,
            Pixels::U16(_) => SampleType::U16,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Pixels::U8(p) => p.len(),
            Pixels::S16(p) => p.len(),
            Pixels::U16(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> From<&'a [u8]> for Pixels<'a> {
    fn from(p: &'a [u8]) -> Self {
        Pixels::U8(p)
    }
}

impl<'a> From<&'a [i16]> for Pixels<'a> {
    fn from(p: &'a [i16]) -> Self {
        Pixels::S16(p)
    }
}

impl<'a> From<&'a [u16]> for Pixels<'a> {
    fn from(p: &'a [u16]) -> Self {
        Pixels::U16(p)
    }
}

/// Writable sample storage.
#[derive(Debug)]
pub enum PixelsMut<'a> {
    U8(&'a mut [u8]),
    S16(&'a mut [i16]),
    U16(&'a mut [u16]),
}

impl PixelsMut<'_> {
    pub fn sample_type(&self) -> SampleType {
        match self {
            PixelsMut::U8(_) => SampleType::U8,
            PixelsMut::S16(_) => SampleType::S16,
            PixelsMut::U16(_) => SampleType::U16,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PixelsMut::U8(p) => p.len(),
            PixelsMut::S16(p) => p.len(),
            PixelsMut::U16(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> From<&'a mut [u8]> for PixelsMut<'a> {
    fn from(p: &'a mut [u8]) -> Self {
        PixelsMut::U8(p)
    }
}

impl<'a> From<&'a mut [i16]> for PixelsMut<'a> {
    fn from(p: &'a mut [i16]) -> Self {
        PixelsMut::S16(p)
    }
}

impl<'a> From<&'a mut [u16]> for PixelsMut<'a> {
    fn from(p: &'a mut [u16]) -> Self {
        PixelsMut::U16(p)
    }
}

/// Dimensions and row layout shared by both view kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    /// Samples from the start of one row to the start of the next.
    pub stride: usize,
    pub layout: ChannelLayout,
}

impl Geometry {
    fn validate(
        width: usize,
        height: usize,
        channels: usize,
        stride: usize,
        len: usize,
    ) -> Result<Self, ImageError> {
        if channels == 0 {
            return Err(ImageError::NoChannels);
        }
        let row = width * channels;
        if stride < row {
            return Err(ImageError::StrideTooSmall { stride, row });
        }
        let required = if height == 0 {
            0
        } else {
            stride * (height - 1) + row
        };
        if len < required {
            return Err(ImageError::BufferTooSmall {
                required,
                actual: len,
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            stride,
            layout: ChannelLayout::Packed,
        })
    }

    fn three_in_four(mut self) -> Result<Self, ImageError> {
        if self.channels != 4 {
            return Err(ImageError::LayoutChannels(self.channels));
        }
        self.layout = ChannelLayout::ThreeInFour;
        Ok(self)
    }

    /// Color channels per pixel once the layout is applied.
    #[inline]
    pub fn color_channels(&self) -> usize {
        match self.layout {
            ChannelLayout::Packed => self.channels,
            ChannelLayout::ThreeInFour => 3,
        }
    }

    /// Samples per row that hold pixels.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.width * self.channels
    }
}

/// Read-only image descriptor.
///
/// # Example
///
/// ```
/// use index_color::{ImageView, SampleType};
///
/// let rgb = vec![0u8; 4 * 3 * 2];
/// let view = ImageView::new(&rgb[..], 4, 2, 3).unwrap();
/// assert_eq!(view.sample_type(), SampleType::U8);
/// assert_eq!(view.stride(), 12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a> {
    pixels: Pixels<'a>,
    geometry: Geometry,
}

impl<'a> ImageView<'a> {
    /// Tightly packed image.
    pub fn new(
        pixels: impl Into<Pixels<'a>>,
        width: usize,
        height: usize,
        channels: usize,
    ) -> Result<Self, ImageError> {
        Self::with_stride(pixels, width, height, channels, width * channels)
    }

    /// Image whose rows start every `stride` samples.
    pub fn with_stride(
        pixels: impl Into<Pixels<'a>>,
        width: usize,
        height: usize,
        channels: usize,
        stride: usize,
    ) -> Result<Self, ImageError> {
        let pixels = pixels.into();
        let geometry = Geometry::validate(width, height, channels, stride, pixels.len())?;
        Ok(Self { pixels, geometry })
    }

    /// Treat a 4-channel view as three color channels in slots 1..4.
    pub fn three_in_four(self) -> Result<Self, ImageError> {
        Ok(Self {
            geometry: self.geometry.three_in_four()?,
            ..self
        })
    }

    #[inline]
    pub fn pixels(&self) -> Pixels<'a> {
        self.pixels
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    pub fn sample_type(&self) -> SampleType {
        self.pixels.sample_type()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.geometry.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.geometry.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.geometry.channels
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.geometry.stride
    }

    #[inline]
    pub fn layout(&self) -> ChannelLayout {
        self.geometry.layout
    }
}

/// Writable image descriptor.
#[derive(Debug)]
pub struct ImageViewMut<'a> {
    pixels: PixelsMut<'a>,
    geometry: Geometry,
}

impl<'a> ImageViewMut<'a> {
    /// Tightly packed image.
    pub fn new(
        pixels: impl Into<PixelsMut<'a>>,
        width: usize,
        height: usize,
        channels: usize,
    ) -> Result<Self, ImageError> {
        Self::with_stride(pixels, width, height, channels, width * channels)
    }

    /// Image whose rows start every `stride` samples.
    pub fn with_stride(
        pixels: impl Into<PixelsMut<'a>>,
        width: usize,
        height: usize,
        channels: usize,
        stride: usize,
    ) -> Result<Self, ImageError> {
        let pixels = pixels.into();
        let geometry = Geometry::validate(width, height, channels, stride, pixels.len())?;
        Ok(Self { pixels, geometry })
    }

    /// Treat a 4-channel view as three color channels in slots 1..4.
    pub fn three_in_four(self) -> Result<Self, ImageError> {
        Ok(Self {
            geometry: self.geometry.three_in_four()?,
            ..self
        })
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut PixelsMut<'a> {
        &mut self.pixels
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    pub fn sample_type(&self) -> SampleType {
        self.pixels.sample_type()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.geometry.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.geometry.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.geometry.channels
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.geometry.stride
    }

    #[inline]
    pub fn layout(&self) -> ChannelLayout {
        self.geometry.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_packed_view() {
        let data = [0i16; 24];
        let view = ImageView::new(&data[..], 2, 3, 4).unwrap();
        assert_eq!(view.sample_type(), SampleType::S16);
        assert_eq!(view.stride(), 8);
        assert_eq!(view.geometry().color_channels(), 4);
    }

    #[test]
    fn test_padded_rows_need_no_trailing_padding() {
        // 2 rows of 3 samples, stride 5: last row ends at sample 8
        let data = [0u8; 8];
        let view = ImageView::with_stride(&data[..], 1, 2, 3, 5).unwrap();
        assert_eq!(view.height(), 2);
        assert_eq!(
            ImageView::with_stride(&data[..7], 1, 2, 3, 5).unwrap_err(),
            ImageError::BufferTooSmall {
                required: 8,
                actual: 7
            }
        );
    }

    #[test]
    fn test_rejects_short_stride() {
        let data = [0u8; 64];
        assert_eq!(
            ImageView::with_stride(&data[..], 4, 2, 3, 11).unwrap_err(),
            ImageError::StrideTooSmall { stride: 11, row: 12 }
        );
        assert_eq!(
            ImageView::new(&data[..], 4, 2, 0).unwrap_err(),
            ImageError::NoChannels
        );
    }

    #[test]
    fn test_three_in_four_layout() {
        let data = [0u8; 16];
        let view = ImageView::new(&data[..], 4, 1, 4).unwrap().three_in_four().unwrap();
        assert_eq!(view.layout(), ChannelLayout::ThreeInFour);
        assert_eq!(view.geometry().color_channels(), 3);

        let rgb = ImageView::new(&data[..12], 4, 1, 3).unwrap();
        assert_eq!(rgb.three_in_four().unwrap_err(), ImageError::LayoutChannels(3));
    }

    #[test]
    fn test_mutable_view() {
        let mut data = vec![0u16; 6];
        let mut view = ImageViewMut::new(&mut data[..], 3, 2, 1).unwrap();
        assert_eq!(view.sample_type(), SampleType::U16);
        if let PixelsMut::U16(p) = view.pixels_mut() {
            p[5] = 9;
        }
        assert_eq!(data[5], 9);
    }

    #[test]
    fn test_empty_image_is_valid() {
        let view = ImageView::new(&[] as &[u8], 0, 0, 3).unwrap();
        assert!(view.pixels().is_empty());
    }
}
