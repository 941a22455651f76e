#![allow(dead_code)]

use chrono::{DateTime, Local, TimeZone};
use plotvisor::table::{CellValue, DisplayRow, FieldSpec, TableRow, ValueKind};

/// Row type covering every ordered kind, plus a hidden float field.
#[derive(Debug, Clone, PartialEq)]
pub struct TestRow {
    pub name: String,
    pub size: u64,
    pub delta: i64,
    pub at: DateTime<Local>,
    pub score: f64,
}

const TEST_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", ValueKind::Text).header("Name"),
    FieldSpec::new("score", ValueKind::Float),
    FieldSpec::new("size", ValueKind::Unsigned).header("Size").align("right"),
    FieldSpec::new("delta", ValueKind::Signed).header("Delta").align("center"),
    FieldSpec::new("at", ValueKind::Timestamp).header("When"),
];

/// Column indices of `TestRow`.
pub const NAME: usize = 0;
pub const SIZE: usize = 1;
pub const DELTA: usize = 2;
pub const WHEN: usize = 3;

impl TestRow {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            size: 0,
            delta: 0,
            at: at_secs(0),
            score: 0.0,
        }
    }

    pub fn size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn delta(mut self, delta: i64) -> Self {
        self.delta = delta;
        self
    }

    pub fn at(mut self, secs: i64) -> Self {
        self.at = at_secs(secs);
        self
    }
}

/// A fixed local timestamp `secs` seconds after 2024-01-01 00:00:00.
pub fn at_secs(secs: i64) -> DateTime<Local> {
    let base = Local
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .earliest()
        .expect("valid base timestamp");
    base + chrono::TimeDelta::seconds(secs)
}

impl DisplayRow for TestRow {
    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.size.to_string(),
            self.delta.to_string(),
            self.at.format("%H:%M:%S").to_string(),
        ]
    }
}

impl TableRow for TestRow {
    fn fields(&self) -> &'static [FieldSpec] {
        TEST_FIELDS
    }

    fn value(&self, field: usize) -> Option<CellValue<'_>> {
        let value = match field {
            0 => CellValue::Text(&self.name),
            1 => CellValue::Float(self.score),
            2 => CellValue::Unsigned(self.size),
            3 => CellValue::Signed(self.delta),
            4 => CellValue::Timestamp(self.at),
            _ => return None,
        };
        Some(value)
    }
}
