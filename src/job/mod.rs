// src/job/mod.rs

//! Plot job supervision.
//!
//! - [`supervisor`] owns one plotter process: admission check, launch,
//!   output scraping, rendering.
//! - [`state`] holds the lock-protected status and the log-line parsing.
//! - [`plotter`] is the argument contract with the external plotter.
//! - [`row`] is the dashboard table row for a job.

pub mod plotter;
pub mod row;
pub mod state;
pub mod supervisor;

pub use plotter::PlotterCommand;
pub use row::JobRow;
pub use state::{parse_id, parse_phase, JobState, JobStatus, TAIL_CAPACITY};
pub use supervisor::{PlotJob, MIN_FREE_BYTES, SCRAPER_DRAIN_TIMEOUT};
