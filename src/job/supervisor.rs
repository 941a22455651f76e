// src/job/supervisor.rs

//! Supervision of a single plotter process.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, error, info, warn};

use crate::config::PlotConfig;
use crate::errors::{PlotvisorError, Result};
use crate::format::{bytes_to_gib, format_elapsed, format_timestamp, GIB};
use crate::fs::{FileSystem, RealFileSystem};
use crate::job::plotter::PlotterCommand;
use crate::job::row::JobRow;
use crate::job::state::{JobState, JobStatus};

/// Free space required on both the working and the target directory.
pub const MIN_FREE_BYTES: u64 = 360 * GIB;

/// How long `run` waits for output streams to close once the plotter exited.
pub const SCRAPER_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// One plot job and its process.
///
/// Shared as `Arc<PlotJob>` between the task running [`PlotJob::run`], its
/// two output scrapers and whoever renders it. All mutable state sits behind
/// one `RwLock`.
///
/// A clean exit leaves the job `Running`: the caller decides when a job is
/// done and calls [`PlotJob::mark_finished`] after `run` returns `Ok`.
pub struct PlotJob {
    plot_id: u64,
    plot_dir: PathBuf,
    target_dir: PathBuf,
    fingerprint: String,
    plotter: PlotterCommand,
    fs: Arc<dyn FileSystem>,
    status: RwLock<JobStatus>,
}

impl fmt::Debug for PlotJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlotJob")
            .field("plot_id", &self.plot_id)
            .field("plot_dir", &self.plot_dir)
            .field("target_dir", &self.target_dir)
            .field("state", &self.state())
            .finish()
    }
}

impl PlotJob {
    pub fn new(
        plot_id: u64,
        plot_dir: impl Into<PathBuf>,
        target_dir: impl Into<PathBuf>,
        fingerprint: impl Into<String>,
    ) -> Self {
        Self {
            plot_id,
            plot_dir: plot_dir.into(),
            target_dir: target_dir.into(),
            fingerprint: fingerprint.into(),
            plotter: PlotterCommand::default(),
            fs: Arc::new(RealFileSystem),
            status: RwLock::new(JobStatus::default()),
        }
    }

    /// A job for the given directories using the snapshot's fingerprint.
    pub fn from_config(
        plot_id: u64,
        config: &PlotConfig,
        plot_dir: impl Into<PathBuf>,
        target_dir: impl Into<PathBuf>,
    ) -> Self {
        Self::new(plot_id, plot_dir, target_dir, config.fingerprint.clone())
    }

    pub fn with_plotter(mut self, plotter: PlotterCommand) -> Self {
        self.plotter = plotter;
        self
    }

    pub fn with_filesystem(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn plot_id(&self) -> u64 {
        self.plot_id
    }

    /// Table key for this job.
    pub fn key(&self) -> String {
        self.plot_id.to_string()
    }

    pub fn plot_dir(&self) -> &Path {
        &self.plot_dir
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    fn read(&self) -> RwLockReadGuard<'_, JobStatus> {
        self.status.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, JobStatus> {
        self.status.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Identifier reported by the plotter; empty until announced.
    pub fn id(&self) -> String {
        self.read().id.clone()
    }

    pub fn phase(&self) -> String {
        self.read().phase.clone()
    }

    pub fn state(&self) -> JobState {
        self.read().state
    }

    pub fn start_time(&self) -> Option<DateTime<Local>> {
        self.read().start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Local>> {
        self.read().end_time
    }

    pub fn tail(&self) -> Vec<String> {
        self.read().tail().map(str::to_owned).collect()
    }

    /// Check that both directories have at least [`MIN_FREE_BYTES`] free.
    ///
    /// The job must not be started when this fails.
    pub fn check_capacity(&self) -> Result<()> {
        for (role, dir) in [("plot", &self.plot_dir), ("target", &self.target_dir)] {
            let available = self.fs.available_space(dir).map_err(|err| {
                warn!(plot_id = self.plot_id, role, ?dir, error = %err, "failed to query free space");
                PlotvisorError::SpaceQuery {
                    dir: dir.clone(),
                    reason: format!("{err:#}"),
                }
            })?;

            if available < MIN_FREE_BYTES {
                let available_gib = bytes_to_gib(available);
                warn!(
                    plot_id = self.plot_id,
                    role,
                    ?dir,
                    available_gib,
                    "not enough free space"
                );
                return Err(PlotvisorError::InsufficientSpace {
                    dir: dir.clone(),
                    available_gib,
                });
            }
        }

        debug!(plot_id = self.plot_id, "capacity check passed");
        Ok(())
    }

    /// Launch the plotter and wait for it to exit.
    ///
    /// Start and end times are recorded on every path; the end time is the
    /// moment the plotter exited, not when its output streams closed. Any
    /// failure moves the job to `Errored`; a zero exit returns `Ok` and
    /// leaves it `Running`.
    ///
    /// With tokio the stdio pipes only exist once the child has been spawned.
    pub async fn run(self: &Arc<Self>) -> Result<()> {
        {
            let mut status = self.write();
            status.start_time = Some(Local::now());
            status.end_time = None;
            status.transition(JobState::Running);
        }

        let result = self.run_inner().await;

        let mut status = self.write();
        if status.end_time.is_none() {
            status.end_time = Some(Local::now());
        }
        if let Err(err) = &result {
            status.transition(JobState::Errored);
            error!(plot_id = self.plot_id, error = %err, "plotting failed");
        }
        result
    }

    async fn run_inner(self: &Arc<Self>) -> Result<()> {
        let args = self.plotter.args_for(&self.plot_dir, &self.fingerprint);
        info!(
            plot_id = self.plot_id,
            program = ?self.plotter.program(),
            ?args,
            "starting plotter process"
        );

        let mut cmd = Command::new(self.plotter.program());
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(PlotvisorError::Spawn)?;

        // The child is killed on drop if either pipe is missing.
        let stderr = child.stderr.take().ok_or(PlotvisorError::MissingPipe("stderr"))?;
        let stdout = child.stdout.take().ok_or(PlotvisorError::MissingPipe("stdout"))?;

        let scrapers = [
            tokio::spawn({
                let job = Arc::clone(self);
                async move { job.scrape(stderr).await }
            }),
            tokio::spawn({
                let job = Arc::clone(self);
                async move { job.scrape(stdout).await }
            }),
        ];

        let status = child.wait().await?;
        self.write().end_time = Some(Local::now());

        // Let the scrapers drain whatever the process wrote before exiting.
        // Descendants can keep the pipes open, so the wait is bounded.
        let deadline = Instant::now() + SCRAPER_DRAIN_TIMEOUT;
        for mut scraper in scrapers {
            match timeout_at(deadline, &mut scraper).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    warn!(plot_id = self.plot_id, error = %err, "log scraper task failed");
                }
                Err(_) => {
                    scraper.abort();
                    warn!(
                        plot_id = self.plot_id,
                        "output stream still open after plotter exit; scraper aborted"
                    );
                }
            }
        }

        let code = status.code().unwrap_or(-1);
        info!(
            plot_id = self.plot_id,
            exit_code = code,
            success = status.success(),
            "plotter process exited"
        );

        if status.success() {
            Ok(())
        } else {
            Err(PlotvisorError::ExitStatus(code))
        }
    }

    /// Read `stream` line by line into the tail until end-of-stream or a read
    /// error. Phase and id announcements are picked up on the way.
    pub async fn scrape<S>(&self, stream: S)
    where
        S: AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches(['\n', '\r']).to_string();
                    self.write().observe_line(line);
                }
                Err(err) => {
                    debug!(plot_id = self.plot_id, error = %err, "log stream read failed");
                    break;
                }
            }
        }

        debug!(plot_id = self.plot_id, "log scraper ended");
    }

    /// Caller-side completion: `Running` -> `Finished`.
    ///
    /// Returns false if the job was already terminal.
    pub fn mark_finished(&self) -> bool {
        let changed = self.write().transition(JobState::Finished);
        if changed {
            info!(plot_id = self.plot_id, "plot finished");
        }
        changed
    }

    /// Multi-line human readable summary followed by the tail.
    pub fn describe(&self) -> String {
        let status = self.read();
        let now = Local::now();

        let start = status
            .start_time
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_default();
        let elapsed = status
            .start_time
            .map(|t| format_elapsed(now - t))
            .unwrap_or_else(|| format_elapsed(chrono::TimeDelta::zero()));

        let mut out = format!(
            "Plot [{}] - {}, Phase: {}, Start Time: {}, Duration: {}, Tmp Dir: {}, Dst Dir: {}\n",
            status.id,
            status.state,
            status.phase,
            start,
            elapsed,
            self.plot_dir.display(),
            self.target_dir.display(),
        );
        for line in status.tail() {
            out.push('\t');
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Table row for this job, or `None` before it has been started.
    pub fn snapshot(&self) -> Option<JobRow> {
        let status = self.read();
        let start_time = status.start_time?;

        Some(JobRow {
            plot_id: self.plot_id,
            id: status.id.clone(),
            state: status.state,
            phase: status.phase.clone(),
            start_time,
            elapsed_secs: (Local::now() - start_time).num_seconds(),
            plot_dir: self.plot_dir.display().to_string(),
            target_dir: self.target_dir.display().to_string(),
        })
    }
}

impl fmt::Display for PlotJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
