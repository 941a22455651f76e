// src/job/state.rs

//! Mutable per-job status and the log-line parsing that drives it.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Local};

/// Number of output lines kept per job.
pub const TAIL_CAPACITY: usize = 10;

/// Prefix of the plotter's phase announcements, e.g. `Starting phase 2/4: ...`.
pub const PHASE_PREFIX: &str = "Starting phase ";

/// Prefix of the plotter's identifier announcement, e.g. `ID: 1f2e...`.
pub const ID_PREFIX: &str = "ID: ";

const PHASE_LEN: usize = 3;

/// Lifecycle state of a plot job.
///
/// `Errored` and `Finished` are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JobState {
    #[default]
    Running,
    Errored,
    Finished,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobState::Running)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Running => "Running",
            JobState::Errored => "Errored",
            JobState::Finished => "Finished",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything about a job that changes while it runs.
///
/// Lives behind the job's `RwLock`; nothing here is touched without it.
#[derive(Debug, Clone, Default)]
pub struct JobStatus {
    pub id: String,
    pub phase: String,
    pub state: JobState,
    pub start_time: Option<DateTime<Local>>,
    pub end_time: Option<DateTime<Local>>,
    tail: VecDeque<String>,
}

impl JobStatus {
    pub fn tail(&self) -> impl Iterator<Item = &str> {
        self.tail.iter().map(String::as_str)
    }

    pub fn tail_len(&self) -> usize {
        self.tail.len()
    }

    /// Move to `to` unless the current state is terminal.
    pub fn transition(&mut self, to: JobState) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = to;
        true
    }

    /// Record one output line: update phase/id if it announces one, then
    /// append it to the tail.
    pub fn observe_line(&mut self, line: String) {
        if let Some(phase) = parse_phase(&line) {
            self.phase = phase.to_string();
        }
        if let Some(id) = parse_id(&line) {
            self.id = id.to_string();
        }
        self.push_tail(line);
    }

    fn push_tail(&mut self, line: String) {
        self.tail.push_back(line);
        while self.tail.len() > TAIL_CAPACITY {
            self.tail.pop_front();
        }
    }
}

/// `"Starting phase 2/4: ..."` -> `"2/4"`.
///
/// Lines too short to hold a full code are ignored.
pub fn parse_phase(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(PHASE_PREFIX)?;
    rest.get(..PHASE_LEN)
}

/// `"ID: abc123"` -> `"abc123"`.
pub fn parse_id(line: &str) -> Option<&str> {
    line.strip_prefix(ID_PREFIX)
}
