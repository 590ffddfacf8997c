//! Colormap: palette, configuration and prebuilt search structures.

mod colormap;
mod error;
mod product;

pub(crate) use colormap::ColormapSettings;
pub use colormap::{Colormap, SearchMethod, SearchTables, BRUTE_FORCE_MAX_ENTRIES};
pub use error::ColormapError;
pub use product::ProductLayout;
