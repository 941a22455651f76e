// src/job/plotter.rs

//! Argument contract with the external plotting program.

use std::ffi::{OsStr, OsString};
use std::path::Path;

pub const DEFAULT_PROGRAM: &str = "chia";

/// Plot size (`-k`).
pub const K_SIZE: u32 = 32;
/// Plots per invocation (`-n`).
pub const PLOTS_PER_RUN: u32 = 1;
/// Sort buffer in MiB (`-b`).
pub const BUFFER_MIB: u32 = 6000;
/// Bucket count (`-u`).
pub const BUCKETS: u32 = 128;

/// Program plus the fixed leading arguments.
///
/// The per-job arguments (`-t`, `-d`, `-a`) are appended by
/// [`PlotterCommand::args_for`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotterCommand {
    program: OsString,
    base_args: Vec<OsString>,
}

impl Default for PlotterCommand {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.into(),
            base_args: vec![
                "plots".into(),
                "create".into(),
                format!("-k{K_SIZE}").into(),
                format!("-n{PLOTS_PER_RUN}").into(),
                format!("-b{BUFFER_MIB}").into(),
                format!("-u{BUCKETS}").into(),
            ],
        }
    }
}

impl PlotterCommand {
    /// A different program, e.g. a wrapper script or a test double.
    pub fn new<I, S>(program: impl Into<OsString>, base_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            base_args: base_args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Full argument list for one job.
    ///
    /// The working directory is passed as both the temporary (`-t`) and the
    /// destination (`-d`) directory.
    pub fn args_for(&self, plot_dir: &Path, fingerprint: &str) -> Vec<OsString> {
        let mut args = self.base_args.clone();
        args.push(prefixed("-t", plot_dir.as_os_str()));
        args.push(prefixed("-d", plot_dir.as_os_str()));
        args.push(prefixed("-a", OsStr::new(fingerprint)));
        args
    }
}

fn prefixed(flag: &str, value: &OsStr) -> OsString {
    let mut arg = OsString::from(flag);
    arg.push(value);
    arg
}
