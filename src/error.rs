use thiserror::Error;

/// Failures of the file-facing layer around the quantizer.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("PNG decode error: {0}")]
    PngDecode(#[from] png::DecodingError),

    #[error("PNG encode error: {0}")]
    PngEncode(#[from] png::EncodingError),

    #[error("Unsupported PNG format: {color:?} at {depth} bits")]
    UnsupportedPng { color: png::ColorType, depth: u8 },

    #[error("Invalid color '{0}': expected #RGB, #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),

    #[error("Palette is empty")]
    EmptyPalette,

    #[error("Unknown search method '{0}': expected auto, cube, octree, brute-force or independent")]
    UnknownMethod(String),

    #[error("Unknown filter '{0}': expected bilinear, bicubic or bicubic2")]
    UnknownFilter(String),

    #[error("Unknown index type '{0}': expected u8 or u16")]
    UnknownIndexType(String),

    #[error("Palette has {0} entries, an indexed PNG holds at most 256")]
    PaletteTooLarge(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    IndexColor(#[from] index_color::IndexColorError),
}

impl From<index_color::ColormapError> for CliError {
    fn from(e: index_color::ColormapError) -> Self {
        CliError::IndexColor(e.into())
    }
}

impl From<index_color::ImageError> for CliError {
    fn from(e: index_color::ImageError) -> Self {
        CliError::IndexColor(e.into())
    }
}

impl From<index_color::QuantizeError> for CliError {
    fn from(e: index_color::QuantizeError) -> Self {
        CliError::IndexColor(e.into())
    }
}

impl From<index_color::ResampleError> for CliError {
    fn from(e: index_color::ResampleError) -> Self {
        CliError::IndexColor(e.into())
    }
}
