//! The immutable quantization configuration shared by the dispatcher and
//! the resampling pipeline.

use std::fmt;

use super::error::ColormapError;
use super::product::ProductLayout;
use crate::color::{index_capacity, Sample, SampleType};
use crate::search::{build_cube_table, cube_table_len, OctTree, TreeSearch};

/// Palettes up to this size pick brute force when no method is requested.
pub const BRUTE_FORCE_MAX_ENTRIES: usize = 32;

/// Strategy used to resolve a true color to a palette index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchMethod {
    /// Direct lookup of truncated channel bits in a precomputed table.
    ColorCube,
    /// Exact nearest-neighbor search through an oct-tree.
    OctTree,
    /// Linear scan of the whole palette.
    BruteForce,
    /// Sum of per-channel table lookups for product palettes.
    IndependentChannel,
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMethod::ColorCube => write!(f, "color cube"),
            SearchMethod::OctTree => write!(f, "oct-tree"),
            SearchMethod::BruteForce => write!(f, "brute force"),
            SearchMethod::IndependentChannel => write!(f, "independent channel"),
        }
    }
}

/// Method-specific search structures.
#[derive(Debug, Clone)]
pub enum SearchTables {
    /// `2^(channels * bits)` indices, offset included.
    ColorCube { bits: u32, table: Vec<u32> },
    OctTree { tree: OctTree },
    /// Uses the double-precision palette only.
    BruteForce,
    /// One table per channel, offset included.
    IndependentChannel { tables: Vec<Vec<i32>> },
}

/// Everything a colormap is built from besides the palette samples.
#[derive(Debug, Clone)]
pub(crate) struct ColormapSettings {
    pub channels: usize,
    pub method: Option<SearchMethod>,
    pub bits: Option<u32>,
    pub offset: u32,
    pub index_type: SampleType,
    pub cube_table: Option<Vec<u32>>,
    pub dimension_tables: Option<Vec<Vec<i32>>>,
}

/// Palette plus the search structures needed to quantize against it.
///
/// Built once by [`ColormapBuilder`](crate::ColormapBuilder) and read-only
/// afterwards, so one colormap can serve any number of conversions,
/// including concurrent ones.
#[derive(Debug, Clone)]
pub struct Colormap {
    channels: usize,
    input_type: SampleType,
    output_type: SampleType,
    offset: u32,
    entries: usize,
    method: SearchMethod,
    /// Interleaved bias-shifted palette.
    unsigned: Vec<u32>,
    /// Interleaved raw palette for brute force.
    double: Vec<f64>,
    /// Per-channel raw palette, indexed by `index - offset`.
    normal: Vec<Vec<i32>>,
    search: SearchTables,
}

impl Colormap {
    pub(crate) fn from_palette<S: Sample>(
        palette: &[S],
        settings: &ColormapSettings,
    ) -> Result<Self, ColormapError> {
        let channels = settings.channels;
        if channels != 3 && channels != 4 {
            return Err(ColormapError::UnsupportedChannels(channels));
        }
        if palette.is_empty() {
            return Err(ColormapError::EmptyPalette);
        }
        if palette.len() % channels != 0 {
            return Err(ColormapError::RaggedPalette {
                len: palette.len(),
                channels,
            });
        }
        let capacity = index_capacity(settings.index_type)
            .ok_or(ColormapError::UnsupportedIndexType(settings.index_type))?;
        let entries = palette.len() / channels;
        if entries + settings.offset as usize > capacity {
            return Err(ColormapError::TooManyEntries {
                entries,
                offset: settings.offset,
                index_type: settings.index_type,
            });
        }

        let unsigned: Vec<u32> = palette.iter().map(|s| s.to_unsigned()).collect();
        let double: Vec<f64> = palette.iter().map(|s| s.to_i32() as f64).collect();
        let normal: Vec<Vec<i32>> = (0..channels)
            .map(|c| {
                palette
                    .iter()
                    .skip(c)
                    .step_by(channels)
                    .map(|s| s.to_i32())
                    .collect()
            })
            .collect();

        let product = match (&settings.method, &settings.dimension_tables) {
            (None, None) | (Some(SearchMethod::IndependentChannel), None) => {
                ProductLayout::detect(palette, channels)
            }
            _ => None,
        };
        let method = settings.method.unwrap_or_else(|| {
            if settings.dimension_tables.is_some() || product.is_some() {
                SearchMethod::IndependentChannel
            } else if entries <= BRUTE_FORCE_MAX_ENTRIES {
                SearchMethod::BruteForce
            } else {
                SearchMethod::OctTree
            }
        });

        let search = match method {
            SearchMethod::ColorCube => {
                let max = S::max_cube_bits(channels);
                let bits = checked_bits(settings.bits, S::default_cube_bits(), max, method)?;
                let expected = cube_table_len(channels, bits);
                let table = match &settings.cube_table {
                    Some(table) if table.len() != expected => {
                        return Err(ColormapError::CubeTableSize {
                            expected,
                            actual: table.len(),
                        });
                    }
                    Some(table) => table.clone(),
                    None => {
                        let tree = OctTree::build(&unsigned, channels, S::BITS, S::BITS);
                        let offset = settings.offset;
                        let table = if channels == 3 {
                            cube_table::<3>(&tree, &unsigned, S::BITS, S::SHIFT, bits, offset)
                        } else {
                            cube_table::<4>(&tree, &unsigned, S::BITS, S::SHIFT, bits, offset)
                        };
                        table.ok_or(ColormapError::CubeTableAllocation { entries: expected })?
                    }
                };
                SearchTables::ColorCube { bits, table }
            }
            SearchMethod::OctTree => {
                let depth = checked_bits(settings.bits, S::BITS, S::BITS, method)?;
                SearchTables::OctTree {
                    tree: OctTree::build(&unsigned, channels, S::BITS, depth),
                }
            }
            SearchMethod::BruteForce => SearchTables::BruteForce,
            SearchMethod::IndependentChannel => {
                let tables = match (&settings.dimension_tables, product) {
                    (Some(tables), _) => {
                        let well_formed = tables.len() == channels
                            && tables.iter().all(|t| t.len() == S::DIMENSION_LEN);
                        if !well_formed {
                            return Err(ColormapError::DimensionTableShape {
                                channels,
                                len: S::DIMENSION_LEN,
                            });
                        }
                        tables.clone()
                    }
                    (None, Some(layout)) => layout.tables::<S>(settings.offset),
                    (None, None) => return Err(ColormapError::NotProductPalette),
                };
                SearchTables::IndependentChannel { tables }
            }
        };

        let colormap = Self {
            channels,
            input_type: S::TYPE,
            output_type: settings.index_type,
            offset: settings.offset,
            entries,
            method,
            unsigned,
            double,
            normal,
            search,
        };
        tracing::debug!(
            entries,
            channels,
            input = %colormap.input_type,
            output = %colormap.output_type,
            method = %method,
            bits = ?colormap.bits(),
            tree_nodes = ?colormap.tree().map(OctTree::node_count),
            "built colormap"
        );
        Ok(colormap)
    }

    /// Channels per palette entry (3 or 4).
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Sample type of the true-color images this colormap accepts.
    #[inline]
    pub fn input_type(&self) -> SampleType {
        self.input_type
    }

    /// Sample type of the index images this colormap produces.
    #[inline]
    pub fn output_type(&self) -> SampleType {
        self.output_type
    }

    /// Added to every resolved palette index.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    #[inline]
    pub fn entries(&self) -> usize {
        self.entries
    }

    #[inline]
    pub fn method(&self) -> SearchMethod {
        self.method
    }

    /// Cube bits per channel or tree depth; `None` for the other methods.
    pub fn bits(&self) -> Option<u32> {
        match &self.search {
            SearchTables::ColorCube { bits, .. } => Some(*bits),
            SearchTables::OctTree { tree } => Some(tree.depth()),
            _ => None,
        }
    }

    #[inline]
    pub fn search(&self) -> &SearchTables {
        &self.search
    }

    pub fn tree(&self) -> Option<&OctTree> {
        match &self.search {
            SearchTables::OctTree { tree } => Some(tree),
            _ => None,
        }
    }

    /// Interleaved bias-shifted palette the tree and cube were built from.
    #[inline]
    pub fn unsigned_palette(&self) -> &[u32] {
        &self.unsigned
    }

    /// Interleaved raw palette in double precision.
    #[inline]
    pub fn double_palette(&self) -> &[f64] {
        &self.double
    }

    /// Per-channel raw palette values.
    #[inline]
    pub fn normal_table(&self) -> &[Vec<i32>] {
        &self.normal
    }

    /// Raw channel values of the entry written as `index`, or `None` when
    /// `index` is below the offset or past the last entry.
    pub fn color(&self, index: u32) -> Option<Vec<i32>> {
        let k = index.checked_sub(self.offset)? as usize;
        (k < self.entries).then(|| self.normal.iter().map(|channel| channel[k]).collect())
    }
}

fn checked_bits(
    bits: Option<u32>,
    default: u32,
    max: u32,
    method: SearchMethod,
) -> Result<u32, ColormapError> {
    let bits = bits.unwrap_or(default);
    if bits == 0 || bits > max {
        return Err(ColormapError::BitsOutOfRange { bits, max, method });
    }
    Ok(bits)
}

fn cube_table<const N: usize>(
    tree: &OctTree,
    unsigned: &[u32],
    sample_bits: u32,
    shift: u32,
    bits: u32,
    offset: u32,
) -> Option<Vec<u32>> {
    let search = TreeSearch::<N>::new(tree, unsigned, shift);
    build_cube_table::<N>(sample_bits, bits, offset, |centre| search.nearest(centre).index).ok()
}
