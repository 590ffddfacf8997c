//! Palettize
//!
//! PNG front end for the `index_color` quantizer and resampler.
//! This library exposes modules for integration testing.

pub mod commands;
pub mod config;
pub mod error;
pub mod palette;
pub mod png_io;
