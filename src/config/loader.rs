// src/config/loader.rs

use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFormat, PlotConfig};
use crate::errors::{PlotvisorError, Result};
use crate::fs::{FileSystem, RealFileSystem};

/// Load a configuration file from a given path.
///
/// The format is picked by [`ConfigFormat::from_path`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<PlotConfig> {
    load_with(&RealFileSystem, path.as_ref())
}

/// Same as [`load_from_path`] but reads through the given filesystem.
pub fn load_with(fs: &dyn FileSystem, path: &Path) -> Result<PlotConfig> {
    let contents = fs.read_to_string(path)?;
    parse_str(&contents, ConfigFormat::from_path(path))
}

/// Parse a document that is already in memory.
pub fn parse_str(contents: &str, format: ConfigFormat) -> Result<PlotConfig> {
    let config = match format {
        ConfigFormat::Toml => toml::from_str(contents)?,
        ConfigFormat::Json => serde_json::from_str(contents)?,
    };
    Ok(config)
}

/// Helper to resolve a default config path.
///
/// Honors `PLOTVISOR_CONFIG` when set, otherwise `plotvisor.toml` in the
/// current working directory.
pub fn default_config_path() -> PathBuf {
    std::env::var_os("PLOTVISOR_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("plotvisor.toml"))
}

impl std::str::FromStr for PlotConfig {
    type Err = PlotvisorError;

    /// Parses TOML.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        parse_str(s, ConfigFormat::Toml)
    }
}
