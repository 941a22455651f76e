// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// One published configuration snapshot.
///
/// ```toml
/// target_directory = ["/mnt/farm1", "/mnt/farm2"]
/// temp_directory = ["/mnt/nvme0"]
/// number_of_plots = 4
/// fingerprint = "1234567890"
/// ```
///
/// Snapshots are never edited after parsing. The store replaces the whole
/// value when the file changes, and readers hold it through an `Arc`.
///
/// The PascalCase names used by older JSON configs (`TargetDirectory`,
/// `TempDirectory`, `NumberOfPlots`, `Fingerprint`) are accepted as aliases.
/// Missing fields default to empty / zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlotConfig {
    /// Where finished plots are meant to land.
    #[serde(default, alias = "TargetDirectory")]
    pub target_directory: Vec<PathBuf>,

    /// Scratch space for running plots.
    #[serde(default, alias = "TempDirectory")]
    pub temp_directory: Vec<PathBuf>,

    /// How many plots the process manager should keep going.
    #[serde(default, alias = "NumberOfPlots")]
    pub number_of_plots: u32,

    /// Key passed to the plotter as `-a<fingerprint>`.
    #[serde(default, alias = "Fingerprint")]
    pub fingerprint: String,
}

/// On-disk document format, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// `.json` files are JSON; everything else is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}
