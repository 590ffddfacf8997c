//! Quantization dispatcher: validates a conversion, then drives the
//! colormap's search method over every scanline.

mod error;
mod line;
mod true_to_index;

pub use error::QuantizeError;
pub use line::quantize_line;
pub use true_to_index::color_true_to_index;

pub(crate) use line::convert_row;
