// src/job/row.rs

use chrono::{DateTime, Local};

use crate::format::{format_elapsed, format_timestamp};
use crate::job::state::JobState;
use crate::table::{CellValue, DisplayRow, FieldSpec, TableRow, ValueKind};

/// Point-in-time copy of a job for the dashboard table.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRow {
    pub plot_id: u64,
    pub id: String,
    pub state: JobState,
    pub phase: String,
    pub start_time: DateTime<Local>,
    pub elapsed_secs: i64,
    pub plot_dir: String,
    pub target_dir: String,
}

const JOB_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("plot_id", ValueKind::Unsigned).header("#").align("right"),
    FieldSpec::new("id", ValueKind::Text).header("Id"),
    FieldSpec::new("state", ValueKind::Text).header("Status"),
    FieldSpec::new("phase", ValueKind::Text).header("Phase").align("center"),
    FieldSpec::new("start_time", ValueKind::Timestamp).header("Start Time"),
    FieldSpec::new("elapsed_secs", ValueKind::Signed).header("Duration").align("right"),
    FieldSpec::new("plot_dir", ValueKind::Text).header("Tmp Dir"),
    FieldSpec::new("target_dir", ValueKind::Text).header("Dst Dir"),
];

impl DisplayRow for JobRow {
    fn cells(&self) -> Vec<String> {
        vec![
            self.plot_id.to_string(),
            self.id.clone(),
            self.state.to_string(),
            self.phase.clone(),
            format_timestamp(&self.start_time),
            format_elapsed(chrono::TimeDelta::seconds(self.elapsed_secs)),
            self.plot_dir.clone(),
            self.target_dir.clone(),
        ]
    }
}

impl TableRow for JobRow {
    fn fields(&self) -> &'static [FieldSpec] {
        JOB_FIELDS
    }

    fn value(&self, field: usize) -> Option<CellValue<'_>> {
        let value = match field {
            0 => CellValue::Unsigned(self.plot_id),
            1 => CellValue::Text(&self.id),
            2 => CellValue::Text(self.state.as_str()),
            3 => CellValue::Text(&self.phase),
            4 => CellValue::Timestamp(self.start_time),
            5 => CellValue::Signed(self.elapsed_secs),
            6 => CellValue::Text(&self.plot_dir),
            7 => CellValue::Text(&self.target_dir),
            _ => return None,
        };
        Some(value)
    }
}
