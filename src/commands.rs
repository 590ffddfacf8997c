//! File-level operations behind the `palettize` subcommands.

use std::path::Path;

use index_color::{
    affine_resample, color_true_to_index, AffineTransform, Colormap, ColormapBuilder,
    ImageViewMut, SampleType,
};
use serde::Serialize;

use crate::config::Settings;
use crate::error::CliError;
use crate::palette::{self, Rgba};
use crate::png_io::{self, TrueColorImage};

/// Colormap over `settings.palette` for images of the given sample type and
/// channel count.
pub fn build_colormap(
    settings: &Settings,
    sample_type: SampleType,
    channels: usize,
) -> Result<Colormap, CliError> {
    let mut builder = match sample_type {
        SampleType::S16 => ColormapBuilder::from_s16(
            channels,
            &palette::samples_s16(&settings.palette, channels),
        ),
        _ => ColormapBuilder::from_u8(channels, &palette::samples_u8(&settings.palette, channels)),
    }
    .offset(settings.offset)
    .index_type(settings.index_type);
    if let Some(method) = settings.method {
        builder = builder.method(method);
    }
    if let Some(bits) = settings.bits {
        builder = builder.bits(bits);
    }
    Ok(builder.build()?)
}

/// PLTE entries for indices produced with `settings`: `offset` black
/// entries followed by the palette.
pub fn png_palette(settings: &Settings) -> Result<Vec<Rgba>, CliError> {
    let len = settings.offset as usize + settings.palette.len();
    if len > 256 {
        return Err(CliError::PaletteTooLarge(len));
    }
    let mut plte = vec![Rgba::opaque(0, 0, 0); settings.offset as usize];
    plte.extend_from_slice(&settings.palette);
    Ok(plte)
}

/// Quantize `image` to one 8-bit index per pixel.
///
/// A 16-bit index colormap is run as such and narrowed afterwards, which
/// [`png_palette`] guarantees is lossless.
pub fn quantize_image(image: &TrueColorImage, colormap: &Colormap) -> Result<Vec<u8>, CliError> {
    let src = image.view()?;
    let (width, height) = (image.width, image.height);
    match colormap.output_type() {
        SampleType::U16 => {
            let mut wide = vec![0u16; width * height];
            let mut dst = ImageViewMut::new(&mut wide[..], width, height, 1)?;
            color_true_to_index(&mut dst, &src, colormap)?;
            Ok(wide.into_iter().map(|v| v as u8).collect())
        }
        _ => {
            let mut indices = vec![0u8; width * height];
            let mut dst = ImageViewMut::new(&mut indices[..], width, height, 1)?;
            color_true_to_index(&mut dst, &src, colormap)?;
            Ok(indices)
        }
    }
}

/// Summary of one finished command.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Report {
    pub width: usize,
    pub height: usize,
    pub colormap: Option<ColormapSummary>,
    pub bytes: usize,
}

/// Shape of a built colormap.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColormapSummary {
    pub entries: usize,
    pub channels: usize,
    pub input_type: String,
    pub output_type: String,
    pub method: String,
    pub bits: Option<u32>,
    pub offset: u32,
    pub tree_nodes: Option<usize>,
}

impl From<&Colormap> for ColormapSummary {
    fn from(colormap: &Colormap) -> Self {
        Self {
            entries: colormap.entries(),
            channels: colormap.channels(),
            input_type: colormap.input_type().to_string(),
            output_type: colormap.output_type().to_string(),
            method: colormap.method().to_string(),
            bits: colormap.bits(),
            offset: colormap.offset(),
            tree_nodes: colormap.tree().map(|t| t.node_count()),
        }
    }
}

/// Quantize the PNG at `input` and write an indexed PNG to `output`.
pub fn quantize_file(
    input: &Path,
    output: &Path,
    settings: &Settings,
    optimize: bool,
) -> Result<Report, CliError> {
    let image = png_io::read_png(input)?;
    let plte = png_palette(settings)?;
    let colormap = build_colormap(settings, image.sample_type(), image.channels)?;
    let indices = quantize_image(&image, &colormap)?;

    let mut bytes = png_io::encode_indexed(image.width, image.height, &indices, &plte)?;
    if optimize {
        bytes = png_io::optimize(bytes);
    }
    std::fs::write(output, &bytes)?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        method = %colormap.method(),
        "Quantized image"
    );
    Ok(Report {
        width: image.width,
        height: image.height,
        colormap: Some(ColormapSummary::from(&colormap)),
        bytes: bytes.len(),
    })
}

/// Transform scaling by `scale` and rotating by `degrees` about the image
/// centre, translated so the result fits a destination of the returned size.
pub fn fit_transform(
    width: usize,
    height: usize,
    scale: f64,
    degrees: f64,
) -> (AffineTransform, usize, usize) {
    let (w, h) = (width as f64, height as f64);
    let t = AffineTransform::translate(-w / 2.0, -h / 2.0)
        .then(&AffineTransform::scale(scale, scale))
        .then(&AffineTransform::rotate(degrees.to_radians()));

    let corners = [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)].map(|(x, y)| t.apply(x, y));
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for (x, y) in corners {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    // Rounding slack, so exact scales do not grow by a pixel
    let extent = |lo: f64, hi: f64| ((hi - lo - 1e-6).ceil().max(1.0)) as usize;
    let t = t.then(&AffineTransform::translate(-min_x, -min_y));
    (t, extent(min_x, max_x), extent(min_y, max_y))
}

/// Result of a resample run.
#[derive(Debug, Clone, PartialEq)]
pub enum Resampled {
    TrueColor(TrueColorImage),
    Indexed {
        width: usize,
        height: usize,
        indices: Vec<u8>,
    },
}

/// Resample `image` under `transform` into a `width` x `height` image.
///
/// With a colormap the destination is indexed and each row is quantized as
/// it is produced. Destination pixels whose neighbourhood leaves the source
/// keep their initial value (black, or index 0).
pub fn resample_image(
    image: &TrueColorImage,
    transform: &AffineTransform,
    width: usize,
    height: usize,
    settings: &Settings,
    colormap: Option<&Colormap>,
) -> Result<Resampled, CliError> {
    let src = image.view()?;
    match colormap {
        None => {
            let mut out = TrueColorImage::blank(width, height, image.channels, image.sample_type());
            affine_resample(&mut out.view_mut()?, &src, transform, settings.filter, None)?;
            Ok(Resampled::TrueColor(out))
        }
        Some(colormap) => {
            let indices = match colormap.output_type() {
                SampleType::U16 => {
                    let mut wide = vec![0u16; width * height];
                    let mut dst = ImageViewMut::new(&mut wide[..], width, height, 1)?;
                    affine_resample(&mut dst, &src, transform, settings.filter, Some(colormap))?;
                    wide.into_iter().map(|v| v as u8).collect()
                }
                _ => {
                    let mut indices = vec![0u8; width * height];
                    let mut dst = ImageViewMut::new(&mut indices[..], width, height, 1)?;
                    affine_resample(&mut dst, &src, transform, settings.filter, Some(colormap))?;
                    indices
                }
            };
            Ok(Resampled::Indexed {
                width,
                height,
                indices,
            })
        }
    }
}

/// Scale and rotate the PNG at `input`; with `indexed` the result is
/// quantized to the configured palette.
pub fn resample_file(
    input: &Path,
    output: &Path,
    settings: &Settings,
    scale: f64,
    degrees: f64,
    indexed: bool,
    optimize: bool,
) -> Result<Report, CliError> {
    let image = png_io::read_png(input)?;
    let (transform, width, height) = fit_transform(image.width, image.height, scale, degrees);
    let plte = indexed.then(|| png_palette(settings)).transpose()?;
    let colormap = indexed
        .then(|| build_colormap(settings, image.sample_type(), image.channels))
        .transpose()?;

    let resampled = resample_image(
        &image,
        &transform,
        width,
        height,
        settings,
        colormap.as_ref(),
    )?;
    let mut bytes = match resampled {
        Resampled::TrueColor(out) => png_io::encode_true_color(&out)?,
        Resampled::Indexed {
            width,
            height,
            indices,
        } => png_io::encode_indexed(width, height, &indices, plte.as_deref().unwrap_or(&[]))?,
    };
    if optimize {
        bytes = png_io::optimize(bytes);
    }
    std::fs::write(output, &bytes)?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        width,
        height,
        filter = %settings.filter,
        "Resampled image"
    );
    Ok(Report {
        width,
        height,
        colormap: colormap.as_ref().map(ColormapSummary::from),
        bytes: bytes.len(),
    })
}

/// Build the colormap `settings` describe for 8- or 16-bit RGB images.
pub fn inspect(settings: &Settings, sixteen_bit: bool) -> Result<ColormapSummary, CliError> {
    let sample_type = if sixteen_bit {
        SampleType::S16
    } else {
        SampleType::U8
    };
    let colormap = build_colormap(settings, sample_type, 3)?;
    Ok(ColormapSummary::from(&colormap))
}
