//! Palette descriptions given on the command line or in a config file.
//!
//! Colors are hex strings (`#RGB`, `#RRGGBB` or `#RRGGBBAA`). They are turned
//! into the interleaved sample arrays the colormap builder takes, at the
//! sample depth and channel count of the image being quantized.

use std::fmt;
use std::str::FromStr;

use index_color::{Filter, SampleType, SearchMethod};

use crate::error::CliError;

/// One palette color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Samples in R, G, B, A order.
    #[inline]
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Rgba {
    type Err = CliError;

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`; the `#` is optional, case is
    /// ignored and surrounding whitespace is trimmed.
    ///
    /// # Examples
    ///
    /// ```
    /// use palettize::palette::Rgba;
    ///
    /// let red: Rgba = "#F00".parse().unwrap();
    /// assert_eq!(red, Rgba::opaque(255, 0, 0));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CliError::InvalidColor(s.to_string());
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let nibble = |i: usize| {
            // Shorthand: 0xF -> 0xFF
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|v| v * 17)
                .map_err(|_| invalid())
        };

        match hex.len() {
            3 => Ok(Self::opaque(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Ok(Self::opaque(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: byte(6)?,
            }),
            _ => Err(invalid()),
        }
    }
}

/// Parse a comma-separated color list.
pub fn parse_palette(list: &str) -> Result<Vec<Rgba>, CliError> {
    let colors = list
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(str::parse)
        .collect::<Result<Vec<Rgba>, _>>()?;
    if colors.is_empty() {
        return Err(CliError::EmptyPalette);
    }
    Ok(colors)
}

/// The 216-color web-safe cube, red varying slowest.
///
/// It is a direct product of six levels per channel, so the automatic method
/// choice resolves it with per-channel tables.
pub fn web_safe_palette() -> Vec<Rgba> {
    const LEVELS: [u8; 6] = [0x00, 0x33, 0x66, 0x99, 0xcc, 0xff];
    LEVELS
        .iter()
        .flat_map(|&r| {
            LEVELS
                .iter()
                .flat_map(move |&g| LEVELS.iter().map(move |&b| Rgba::opaque(r, g, b)))
        })
        .collect()
}

/// Interleaved 8-bit samples for a colormap over `channels`-channel images.
pub fn samples_u8(colors: &[Rgba], channels: usize) -> Vec<u8> {
    colors
        .iter()
        .flat_map(|c| c.to_array().into_iter().take(channels))
        .collect()
}

/// Interleaved signed 16-bit samples: each 8-bit value is widened by
/// replication and biased by -32768.
pub fn samples_s16(colors: &[Rgba], channels: usize) -> Vec<i16> {
    samples_u8(colors, channels)
        .into_iter()
        .map(|v| u16_to_s16(v as u16 * 257))
        .collect()
}

/// Unsigned 16-bit sample to the biased signed representation.
#[inline]
pub fn u16_to_s16(v: u16) -> i16 {
    (v ^ 0x8000) as i16
}

/// Inverse of [`u16_to_s16`].
#[inline]
pub fn s16_to_u16(v: i16) -> u16 {
    (v as u16) ^ 0x8000
}

/// Search method by CLI name; `auto` leaves the choice to the builder.
pub fn parse_method(name: &str) -> Result<Option<SearchMethod>, CliError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "auto" => Ok(None),
        "cube" => Ok(Some(SearchMethod::ColorCube)),
        "octree" => Ok(Some(SearchMethod::OctTree)),
        "brute-force" => Ok(Some(SearchMethod::BruteForce)),
        "independent" => Ok(Some(SearchMethod::IndependentChannel)),
        _ => Err(CliError::UnknownMethod(name.to_string())),
    }
}

pub fn parse_filter(name: &str) -> Result<Filter, CliError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "bilinear" => Ok(Filter::Bilinear),
        "bicubic" => Ok(Filter::Bicubic),
        "bicubic2" => Ok(Filter::Bicubic2),
        _ => Err(CliError::UnknownFilter(name.to_string())),
    }
}

pub fn parse_index_type(name: &str) -> Result<SampleType, CliError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "u8" => Ok(SampleType::U8),
        "u16" => Ok(SampleType::U16),
        _ => Err(CliError::UnknownIndexType(name.to_string())),
    }
}
