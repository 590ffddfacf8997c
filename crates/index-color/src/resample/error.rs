use crate::color::SampleType;
use thiserror::Error;

/// Reasons an affine resampling is refused. Raised before any destination
/// write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResampleError {
    #[error("cannot resample {input} samples into {output} samples")]
    TypeMismatch { input: SampleType, output: SampleType },

    #[error("expected {expected} channels, found {actual}")]
    ChannelMismatch { expected: usize, actual: usize },

    #[error("indexed images need a colormap")]
    MissingColormap,

    #[error("source and destination channel layouts differ")]
    UnsupportedLayout,

    #[error("transform cannot be inverted within fixed-point range")]
    DegenerateTransform,

    #[error("cannot allocate a scratch row of {samples} samples")]
    OutOfMemory { samples: usize },
}
