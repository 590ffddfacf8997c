//! PNG decoding into true-color sample buffers and encoding of the results.
//!
//! 8-bit PNGs decode to `u8` samples. 16-bit PNGs decode to the biased `i16`
//! representation the quantizer works on. Grayscale inputs are widened to
//! RGB so every image has 3 or 4 channels.

use std::io::Cursor;
use std::path::Path;

use index_color::{ImageError, ImageView, ImageViewMut, SampleType};

use crate::error::CliError;
use crate::palette::{s16_to_u16, u16_to_s16, Rgba};

/// Decoded pixel samples.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    U8(Vec<u8>),
    S16(Vec<i16>),
}

/// A tightly packed true-color image.
#[derive(Debug, Clone, PartialEq)]
pub struct TrueColorImage {
    pub width: usize,
    pub height: usize,
    /// 3 (RGB) or 4 (RGBA).
    pub channels: usize,
    pub samples: Samples,
}

impl TrueColorImage {
    /// Black image of the given shape.
    pub fn blank(width: usize, height: usize, channels: usize, sample_type: SampleType) -> Self {
        let len = width * height * channels;
        let samples = match sample_type {
            SampleType::S16 => Samples::S16(vec![i16::MIN; len]),
            _ => Samples::U8(vec![0; len]),
        };
        Self {
            width,
            height,
            channels,
            samples,
        }
    }

    pub fn sample_type(&self) -> SampleType {
        match self.samples {
            Samples::U8(_) => SampleType::U8,
            Samples::S16(_) => SampleType::S16,
        }
    }

    pub fn view(&self) -> Result<ImageView<'_>, ImageError> {
        match &self.samples {
            Samples::U8(px) => ImageView::new(&px[..], self.width, self.height, self.channels),
            Samples::S16(px) => ImageView::new(&px[..], self.width, self.height, self.channels),
        }
    }

    pub fn view_mut(&mut self) -> Result<ImageViewMut<'_>, ImageError> {
        let (width, height, channels) = (self.width, self.height, self.channels);
        match &mut self.samples {
            Samples::U8(px) => ImageViewMut::new(&mut px[..], width, height, channels),
            Samples::S16(px) => ImageViewMut::new(&mut px[..], width, height, channels),
        }
    }
}

/// Read and decode a PNG file.
pub fn read_png(path: &Path) -> Result<TrueColorImage, CliError> {
    let bytes = std::fs::read(path)?;
    decode_png(&bytes)
}

/// Decode PNG bytes. Palette images and sub-byte depths are expanded to
/// 8-bit RGB(A) by the decoder.
pub fn decode_png(bytes: &[u8]) -> Result<TrueColorImage, CliError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let data = &buf[..info.buffer_size()];

    let (source_channels, channels) = match info.color_type {
        png::ColorType::Grayscale => (1, 3),
        png::ColorType::GrayscaleAlpha => (2, 4),
        png::ColorType::Rgb => (3, 3),
        png::ColorType::Rgba => (4, 4),
        color => {
            return Err(CliError::UnsupportedPng {
                color,
                depth: info.bit_depth as u8,
            })
        }
    };

    let samples = match info.bit_depth {
        png::BitDepth::Eight => Samples::U8(widen_gray(data, source_channels)),
        png::BitDepth::Sixteen => {
            let values: Vec<i16> = data
                .chunks_exact(2)
                .map(|b| u16_to_s16(u16::from_be_bytes([b[0], b[1]])))
                .collect();
            Samples::S16(widen_gray(&values, source_channels))
        }
        depth => {
            return Err(CliError::UnsupportedPng {
                color: info.color_type,
                depth: depth as u8,
            })
        }
    };

    tracing::debug!(
        width = info.width,
        height = info.height,
        channels,
        depth = info.bit_depth as u8,
        "decoded PNG"
    );
    Ok(TrueColorImage {
        width: info.width as usize,
        height: info.height as usize,
        channels,
        samples,
    })
}

/// Replicate the gray channel of 1- and 2-channel pixels into RGB.
fn widen_gray<T: Copy>(data: &[T], source_channels: usize) -> Vec<T> {
    match source_channels {
        1 => data.iter().flat_map(|&v| [v, v, v]).collect(),
        2 => data
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        _ => data.to_vec(),
    }
}

/// Smallest PNG index depth that holds `entries` colors.
pub fn index_depth(entries: usize) -> u8 {
    match entries {
        0..=2 => 1,
        3..=4 => 2,
        5..=16 => 4,
        _ => 8,
    }
}

/// Encode palette indices as an indexed PNG.
///
/// `palette[i]` becomes PLTE entry `i`; a tRNS chunk is written when any
/// entry is not opaque.
pub fn encode_indexed(
    width: usize,
    height: usize,
    indices: &[u8],
    palette: &[Rgba],
) -> Result<Vec<u8>, CliError> {
    if palette.len() > 256 {
        return Err(CliError::PaletteTooLarge(palette.len()));
    }
    let plte: Vec<u8> = palette.iter().flat_map(|c| [c.r, c.g, c.b]).collect();
    let trns: Option<Vec<u8>> = palette
        .iter()
        .any(|c| c.a != 255)
        .then(|| palette.iter().map(|c| c.a).collect());

    let bits = index_depth(palette.len());
    let packed = if bits == 8 {
        indices.to_vec()
    } else {
        pack_nbits(indices, width, bits)
    };
    let depth = png::BitDepth::from_u8(bits).unwrap_or(png::BitDepth::Eight);

    encode_png(
        width,
        height,
        png::ColorType::Indexed,
        depth,
        Some((plte.as_slice(), trns.as_deref())),
        &packed,
    )
}

/// Encode a true-color image at its own sample depth.
pub fn encode_true_color(image: &TrueColorImage) -> Result<Vec<u8>, CliError> {
    let color = if image.channels == 4 {
        png::ColorType::Rgba
    } else {
        png::ColorType::Rgb
    };
    let (depth, data) = match &image.samples {
        Samples::U8(px) => (png::BitDepth::Eight, px.clone()),
        Samples::S16(px) => (
            png::BitDepth::Sixteen,
            px.iter().flat_map(|&v| s16_to_u16(v).to_be_bytes()).collect(),
        ),
    };
    encode_png(image.width, image.height, color, depth, None, &data)
}

fn encode_png(
    width: usize,
    height: usize,
    color_type: png::ColorType,
    bit_depth: png::BitDepth,
    plte: Option<(&[u8], Option<&[u8]>)>,
    packed: &[u8],
) -> Result<Vec<u8>, CliError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width as u32, height as u32);
        encoder.set_color(color_type);
        encoder.set_depth(bit_depth);
        encoder.set_compression(png::Compression::Fast);
        if let Some((plte, trns)) = plte {
            encoder.set_palette(plte.to_vec());
            if let Some(trns) = trns {
                encoder.set_trns(trns.to_vec());
            }
        }
        let mut writer = encoder.write_header()?;
        writer.write_image_data(packed)?;
    }
    Ok(buf.into_inner())
}

/// Pack pixel values into N-bit PNG row data (1, 2, or 4 bits per pixel).
fn pack_nbits(indices: &[u8], width: usize, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = width.div_ceil(pixels_per_byte);
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * (indices.len() / width.max(1)));

    for row in indices.chunks(width.max(1)) {
        let mut byte = 0u8;
        for (i, &idx) in row.iter().enumerate() {
            let shift = (8 - bits) - (i % pixels_per_byte) as u8 * bits;
            byte |= (idx & mask) << shift;

            if (i % pixels_per_byte) == pixels_per_byte - 1 || i == row.len() - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
    }

    packed
}

/// Re-compress with oxipng, keeping the input when optimization fails.
pub fn optimize(png_bytes: Vec<u8>) -> Vec<u8> {
    oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    )
    .unwrap_or(png_bytes)
}
