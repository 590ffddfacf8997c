use std::path::Path;

use index_color::{Filter, SampleType, SearchMethod};
use serde::Deserialize;

use crate::error::CliError;
use crate::palette::{self, Rgba};

/// Tool configuration loaded from a YAML file.
///
/// ```yaml
/// palette: ["#000", "#fff", "#f00"]
/// method: octree
/// index_type: u8
/// filter: bicubic2
/// ```
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ToolConfig {
    /// Hex colors; empty selects the web-safe cube
    #[serde(default)]
    pub palette: Vec<String>,

    /// auto, cube, octree, brute-force or independent
    #[serde(default = "default_method")]
    pub method: String,

    /// Cube bits or tree depth; unset uses the method default
    #[serde(default)]
    pub bits: Option<u32>,

    /// Added to every palette index
    #[serde(default)]
    pub offset: u32,

    /// u8 or u16
    #[serde(default = "default_index_type")]
    pub index_type: String,

    /// bilinear, bicubic or bicubic2
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_method() -> String {
    "auto".to_string()
}

fn default_index_type() -> String {
    "u8".to_string()
}

fn default_filter() -> String {
    "bicubic".to_string()
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            palette: Vec::new(),
            method: default_method(),
            bits: None,
            offset: 0,
            index_type: default_index_type(),
            filter: default_filter(),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub palette: Option<String>,
    pub method: Option<String>,
    pub bits: Option<u32>,
    pub filter: Option<String>,
}

/// Validated settings for building a colormap and resampling.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub palette: Vec<Rgba>,
    pub method: Option<SearchMethod>,
    pub bits: Option<u32>,
    pub offset: u32,
    pub index_type: SampleType,
    pub filter: Filter,
}

impl ToolConfig {
    /// Load configuration from `path`, falling back to defaults when the file
    /// is missing or malformed.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        colors = config.palette.len(),
                        method = %config.method,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(
                        %e,
                        path = %path.display(),
                        "Failed to parse config, using defaults"
                    );
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Load from `path` when given, otherwise use defaults.
    pub fn load_optional(path: Option<&Path>) -> Self {
        path.map(Self::load).unwrap_or_default()
    }

    /// Apply `overrides` and parse every field.
    pub fn resolve(&self, overrides: &Overrides) -> Result<Settings, CliError> {
        let palette = match &overrides.palette {
            Some(list) => palette::parse_palette(list)?,
            None if self.palette.is_empty() => palette::web_safe_palette(),
            None => self
                .palette
                .iter()
                .map(|s| s.parse())
                .collect::<Result<Vec<Rgba>, _>>()?,
        };
        let method = palette::parse_method(overrides.method.as_deref().unwrap_or(&self.method))?;
        let filter = palette::parse_filter(overrides.filter.as_deref().unwrap_or(&self.filter))?;

        Ok(Settings {
            palette,
            method,
            bits: overrides.bits.or(self.bits),
            offset: self.offset,
            index_type: palette::parse_index_type(&self.index_type)?,
            filter,
        })
    }
}
