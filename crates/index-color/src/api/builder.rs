//! ColormapBuilder -- the entry point for constructing a [`Colormap`].

use crate::color::SampleType;
use crate::colormap::{Colormap, ColormapError, ColormapSettings, SearchMethod};

#[derive(Debug, Clone)]
enum PaletteSamples {
    U8(Vec<u8>),
    S16(Vec<i16>),
}

/// Builder for [`Colormap`].
///
/// # Design
///
/// - The constructor fixes the sample type and channel count of the palette
/// - Configuration methods consume and return `self`
/// - [`build()`](Self::build) takes `&self`, so one builder can produce
///   several colormaps
/// - Without [`.method()`](Self::method) the search method is picked from
///   the palette: product palettes use independent-channel lookup, palettes
///   of up to 32 entries use brute force, larger ones the oct-tree
///
/// # Example
///
/// ```
/// use index_color::{ColormapBuilder, SampleType, SearchMethod};
///
/// let palette: Vec<u8> = (0..=255).flat_map(|i| [i, i, i]).collect();
/// let colormap = ColormapBuilder::from_u8(3, &palette)
///     .index_type(SampleType::U8)
///     .build()
///     .unwrap();
///
/// assert_eq!(colormap.method(), SearchMethod::OctTree);
/// assert_eq!(colormap.entries(), 256);
/// ```
#[derive(Debug, Clone)]
pub struct ColormapBuilder {
    palette: PaletteSamples,
    settings: ColormapSettings,
}

impl ColormapBuilder {
    fn with_palette(channels: usize, palette: PaletteSamples) -> Self {
        Self {
            palette,
            settings: ColormapSettings {
                channels,
                method: None,
                bits: None,
                offset: 0,
                index_type: SampleType::U8,
                cube_table: None,
                dimension_tables: None,
            },
        }
    }

    /// Palette of 8-bit samples, `channels` per entry.
    pub fn from_u8(channels: usize, palette: &[u8]) -> Self {
        Self::with_palette(channels, PaletteSamples::U8(palette.to_vec()))
    }

    /// Palette of signed 16-bit samples, `channels` per entry.
    pub fn from_s16(channels: usize, palette: &[i16]) -> Self {
        Self::with_palette(channels, PaletteSamples::S16(palette.to_vec()))
    }

    /// Force a search method instead of picking one from the palette.
    #[inline]
    pub fn method(mut self, method: SearchMethod) -> Self {
        self.settings.method = Some(method);
        self
    }

    /// Color-cube bits per channel, or oct-tree depth.
    #[inline]
    pub fn bits(mut self, bits: u32) -> Self {
        self.settings.bits = Some(bits);
        self
    }

    /// Constant added to every resolved index.
    #[inline]
    pub fn offset(mut self, offset: u32) -> Self {
        self.settings.offset = offset;
        self
    }

    /// Sample type of the index images (`U8` by default, or `U16`).
    #[inline]
    pub fn index_type(mut self, index_type: SampleType) -> Self {
        self.settings.index_type = index_type;
        self
    }

    /// Use a precomputed color-cube table instead of deriving one. Entries
    /// are final output indices, offset included.
    #[inline]
    pub fn cube_table(mut self, table: Vec<u32>) -> Self {
        self.settings.cube_table = Some(table);
        self
    }

    /// Use precomputed per-channel tables for independent-channel lookup.
    /// Their per-pixel sums are final output indices, offset included.
    #[inline]
    pub fn dimension_tables(mut self, tables: Vec<Vec<i32>>) -> Self {
        self.settings.dimension_tables = Some(tables);
        self
    }

    /// Validate the configuration and build the search structures.
    pub fn build(&self) -> Result<Colormap, ColormapError> {
        match &self.palette {
            PaletteSamples::U8(palette) => Colormap::from_palette(palette, &self.settings),
            PaletteSamples::S16(palette) => Colormap::from_palette(palette, &self.settings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_is_reusable() {
        let builder = ColormapBuilder::from_u8(3, &[0, 0, 0, 255, 255, 255]);
        let a = builder.build().unwrap();
        let b = builder.clone().method(SearchMethod::OctTree).build().unwrap();
        assert_eq!(a.method(), SearchMethod::BruteForce);
        assert_eq!(b.method(), SearchMethod::OctTree);
    }

    #[test]
    fn test_settings_reach_colormap() {
        let cm = ColormapBuilder::from_s16(4, &[0; 8])
            .method(SearchMethod::ColorCube)
            .bits(3)
            .offset(7)
            .index_type(SampleType::U16)
            .build()
            .unwrap();
        assert_eq!(cm.input_type(), SampleType::S16);
        assert_eq!(cm.output_type(), SampleType::U16);
        assert_eq!(cm.channels(), 4);
        assert_eq!(cm.bits(), Some(3));
        assert_eq!(cm.offset(), 7);
    }

    #[test]
    fn test_explicit_dimension_tables_select_independent_lookup() {
        let tables = vec![(0..256).collect(), vec![0; 256], vec![0; 256]];
        let cm = ColormapBuilder::from_u8(3, &[0u8; 768])
            .dimension_tables(tables)
            .build()
            .unwrap();
        assert_eq!(cm.method(), SearchMethod::IndependentChannel);
    }

    #[test]
    fn test_explicit_cube_table_is_used() {
        let table: Vec<u32> = (0..8).map(|cell| cell % 2).collect();
        let cm = ColormapBuilder::from_u8(3, &[0, 0, 0, 255, 255, 255])
            .method(SearchMethod::ColorCube)
            .bits(1)
            .cube_table(table.clone())
            .build()
            .unwrap();
        let crate::SearchTables::ColorCube { table: stored, .. } = cm.search() else {
            panic!("expected a color cube");
        };
        assert_eq!(stored, &table);
    }
}
