use crate::color::SampleType;
use thiserror::Error;

/// Reasons the dispatcher refuses a conversion. Always raised before the
/// destination is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantizeError {
    #[error("source is {src_width}x{src_height}, destination is {dst_width}x{dst_height}")]
    SizeMismatch {
        src_width: usize,
        src_height: usize,
        dst_width: usize,
        dst_height: usize,
    },

    #[error("destination must have 1 channel, has {0}")]
    DestinationChannels(usize),

    #[error("colormap expects {expected} samples, source is {actual}")]
    InputTypeMismatch {
        expected: SampleType,
        actual: SampleType,
    },

    #[error("colormap produces {expected} indices, destination is {actual}")]
    OutputTypeMismatch {
        expected: SampleType,
        actual: SampleType,
    },

    #[error("colormap has {expected} channels, source has {actual}")]
    ChannelMismatch { expected: usize, actual: usize },

    #[error("source line holds {actual} samples, {required} needed")]
    LineTooShort { required: usize, actual: usize },

    #[error("unsupported conversion from {input} to {output}")]
    UnsupportedType { input: SampleType, output: SampleType },
}
