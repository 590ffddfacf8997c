//! Image descriptors handed to the dispatcher and the resampler.

mod error;
mod view;

pub use error::ImageError;
pub use view::{ChannelLayout, Geometry, ImageView, ImageViewMut, Pixels, PixelsMut};
