// src/lib.rs

//! Supervision of plot jobs on a single host.
//!
//! - [`config`]: hot-reloaded configuration snapshots.
//! - [`job`]: one supervised plotter process per [`job::PlotJob`].
//! - [`table`]: sortable, key-addressed table model for the dashboard.
//!
//! Deciding when to start jobs, and drawing the dashboard, is left to the
//! embedding binary.

pub mod config;
pub mod errors;
pub mod format;
pub mod fs;
pub mod job;
pub mod logging;
pub mod table;

pub use config::{ConfigStore, PlotConfig};
pub use errors::{PlotvisorError, Result};
pub use job::{JobRow, JobState, PlotJob};
pub use table::{SchemaError, SortedTable};
