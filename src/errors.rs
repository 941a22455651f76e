// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlotvisorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Not enough space in {dir:?}: {available_gib} GiB available")]
    InsufficientSpace { dir: PathBuf, available_gib: u64 },

    #[error("Failed to query free space of {dir:?}: {reason}")]
    SpaceQuery { dir: PathBuf, reason: String },

    #[error("Failed to start plotter: {0}")]
    Spawn(std::io::Error),

    #[error("Plotter {0} pipe unavailable")]
    MissingPipe(&'static str),

    #[error("Plotter exited with status {0}")]
    ExitStatus(i32),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PlotvisorError>;
