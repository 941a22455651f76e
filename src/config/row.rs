// src/config/row.rs

use std::path::Path;

use tracing::warn;

use crate::config::model::PlotConfig;
use crate::format::bytes_to_gib;
use crate::fs::FileSystem;
use crate::job::MIN_FREE_BYTES;
use crate::table::{CellValue, DisplayRow, FieldSpec, TableRow, ValueKind};

/// Which list of the configuration a directory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryRole {
    Temp,
    Target,
}

impl DirectoryRole {
    pub fn as_str(self) -> &'static str {
        match self {
            DirectoryRole::Temp => "temp",
            DirectoryRole::Target => "target",
        }
    }
}

/// Configuration status: one configured directory and its free space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRow {
    pub role: DirectoryRole,
    pub path: String,
    pub available_gib: u64,
    pub has_room: bool,
}

const DIRECTORY_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("role", ValueKind::Text).header("Role"),
    FieldSpec::new("path", ValueKind::Text).header("Directory"),
    FieldSpec::new("available_gib", ValueKind::Unsigned)
        .header("Free (GiB)")
        .align("right"),
    FieldSpec::new("has_room", ValueKind::Flag),
];

impl DisplayRow for DirectoryRow {
    fn cells(&self) -> Vec<String> {
        vec![
            self.role.as_str().to_string(),
            self.path.clone(),
            self.available_gib.to_string(),
        ]
    }
}

impl TableRow for DirectoryRow {
    fn fields(&self) -> &'static [FieldSpec] {
        DIRECTORY_FIELDS
    }

    fn value(&self, field: usize) -> Option<CellValue<'_>> {
        let value = match field {
            0 => CellValue::Text(self.role.as_str()),
            1 => CellValue::Text(&self.path),
            2 => CellValue::Unsigned(self.available_gib),
            3 => CellValue::Flag(self.has_room),
            _ => return None,
        };
        Some(value)
    }
}

/// Keyed rows for every directory in `config`, temp directories first.
///
/// Directories whose free space cannot be queried come back as `None` so the
/// table shows them as missing data.
pub fn directory_rows(
    config: &PlotConfig,
    fs: &dyn FileSystem,
) -> Vec<(String, Option<DirectoryRow>)> {
    let temp = config
        .temp_directory
        .iter()
        .map(|dir| (DirectoryRole::Temp, dir));
    let target = config
        .target_directory
        .iter()
        .map(|dir| (DirectoryRole::Target, dir));

    temp.chain(target)
        .map(|(role, dir)| {
            let key = format!("{}:{}", role.as_str(), dir.display());
            (key, directory_row(role, dir, fs))
        })
        .collect()
}

fn directory_row(role: DirectoryRole, dir: &Path, fs: &dyn FileSystem) -> Option<DirectoryRow> {
    match fs.available_space(dir) {
        Ok(bytes) => Some(DirectoryRow {
            role,
            path: dir.display().to_string(),
            available_gib: bytes_to_gib(bytes),
            has_room: bytes >= MIN_FREE_BYTES,
        }),
        Err(err) => {
            warn!(?dir, error = %err, "failed to query free space");
            None
        }
    }
}
