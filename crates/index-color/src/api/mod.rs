//! Public API: the [`ColormapBuilder`] and the unified [`IndexColorError`].

mod builder;
mod error;

pub use builder::ColormapBuilder;
pub use error::IndexColorError;
