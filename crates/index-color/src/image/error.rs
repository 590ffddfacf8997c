use thiserror::Error;

/// Errors raised while describing an image buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("image must have at least one channel")]
    NoChannels,

    #[error("row stride {stride} is shorter than a row of {row} samples")]
    StrideTooSmall { stride: usize, row: usize },

    #[error("buffer holds {actual} samples, image needs {required}")]
    BufferTooSmall { required: usize, actual: usize },

    #[error("3-in-4 layout needs 4 channels, image has {0}")]
    LayoutChannels(usize),
}
