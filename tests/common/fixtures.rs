//! Test fixtures: generated PNG inputs in a temporary directory.

use std::path::PathBuf;

use palettize::config::Settings;
use palettize::palette;
use palettize::png_io::{self, Samples, TrueColorImage};
use tempfile::TempDir;

/// Palettes used across tests
pub mod palettes {
    /// Black and white
    pub const MONO: &str = "#000000,#ffffff";

    /// Four primaries plus black and white
    pub const PRIMARIES: &str = "#000,#fff,#f00,#0f0,#00f,#ff0";
}

/// A temporary directory that holds test inputs and outputs.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write `image` as a PNG named `name` and return its path.
    pub fn write_png(&self, name: &str, image: &TrueColorImage) -> PathBuf {
        let path = self.path(name);
        let bytes = png_io::encode_true_color(image).expect("Failed to encode fixture");
        std::fs::write(&path, bytes).expect("Failed to write fixture");
        path
    }

    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }
}

/// Horizontal black-to-white ramp, 8-bit RGB.
pub fn gray_ramp(width: usize, height: usize) -> TrueColorImage {
    let mut px = Vec::with_capacity(width * height * 3);
    for _ in 0..height {
        for x in 0..width {
            let v = (x * 255 / (width - 1).max(1)) as u8;
            px.extend_from_slice(&[v, v, v]);
        }
    }
    TrueColorImage {
        width,
        height,
        channels: 3,
        samples: Samples::U8(px),
    }
}

/// Image filled with one color, 8-bit RGB or RGBA.
pub fn solid(width: usize, height: usize, color: &[u8]) -> TrueColorImage {
    TrueColorImage {
        width,
        height,
        channels: color.len(),
        samples: Samples::U8(color.repeat(width * height)),
    }
}

/// Image filled with one color, 16-bit RGB (unsigned sample values).
pub fn solid_16(width: usize, height: usize, color: [u16; 3]) -> TrueColorImage {
    let px = color.map(palette::u16_to_s16);
    TrueColorImage {
        width,
        height,
        channels: 3,
        samples: Samples::S16(px.repeat(width * height)),
    }
}

/// Settings for `palette` with every other field at its default.
pub fn settings(palette: &str) -> Settings {
    palettize::config::ToolConfig::default()
        .resolve(&palettize::config::Overrides {
            palette: Some(palette.to_string()),
            ..Default::default()
        })
        .expect("Invalid test palette")
}
