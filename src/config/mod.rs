// src/config/mod.rs

//! Configuration loading and hot reload.
//!
//! Responsibilities:
//! - Define the snapshot data model (`model.rs`).
//! - Parse a config document from disk (`loader.rs`).
//! - Publish fresh snapshots as the file changes (`store.rs`).
//! - Describe configured directories as table rows (`row.rs`).

pub mod loader;
pub mod model;
pub mod row;
pub mod store;

pub use loader::{default_config_path, load_from_path, load_with, parse_str};
pub use model::{ConfigFormat, PlotConfig};
pub use row::{directory_rows, DirectoryRole, DirectoryRow};
pub use store::{ConfigStore, PollOutcome, DEFAULT_POLL_INTERVAL};
