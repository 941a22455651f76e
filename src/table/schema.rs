// src/table/schema.rs

//! Column declarations for table rows.
//!
//! A row type lists its fields once, in declaration order, as a static slice
//! of [`FieldSpec`]. Fields with a header become columns; the rest are only
//! reachable through [`TableRow::value`] and never shown.
//!
//! ```ignore
//! const FIELDS: &[FieldSpec] = &[
//!     FieldSpec::new("key", ValueKind::Text),
//!     FieldSpec::new("name", ValueKind::Text).header("Name"),
//!     FieldSpec::new("size", ValueKind::Unsigned).header("Size").align("right"),
//! ];
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use thiserror::Error;

/// Schema problems. These are programming mistakes in a row declaration and
/// are not meant to be recovered from at runtime.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("field '{field}' has unknown alignment '{value}' (expected left, center or right)")]
    UnknownAlignment { field: &'static str, value: String },

    #[error("column '{column}' holds {kind} values, which have no ordering")]
    UnorderedKind { column: String, kind: ValueKind },

    #[error("column '{column}' is declared {expected} but a row supplied {found}")]
    KindMismatch {
        column: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("column '{column}' maps to field #{field}, which the row does not provide")]
    MissingField { column: String, field: usize },

    #[error("no columns defined; call define_columns first")]
    ColumnsNotDefined,
}

/// Horizontal alignment of a column's cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl FromStr for Align {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Align::Left),
            "center" => Ok(Align::Center),
            "right" => Ok(Align::Right),
            other => Err(other.to_string()),
        }
    }
}

/// The semantic kind of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Signed,
    Unsigned,
    Timestamp,
    Float,
    Flag,
}

impl ValueKind {
    /// Whether a column of this kind can drive the sort order.
    pub fn is_ordered(self) -> bool {
        matches!(
            self,
            ValueKind::Text | ValueKind::Signed | ValueKind::Unsigned | ValueKind::Timestamp
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Text => "text",
            ValueKind::Signed => "signed integer",
            ValueKind::Unsigned => "unsigned integer",
            ValueKind::Timestamp => "timestamp",
            ValueKind::Float => "float",
            ValueKind::Flag => "flag",
        };
        f.write_str(name)
    }
}

/// A borrowed, typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue<'a> {
    Text(&'a str),
    Signed(i64),
    Unsigned(u64),
    Timestamp(DateTime<Local>),
    Float(f64),
    Flag(bool),
}

impl CellValue<'_> {
    pub fn kind(&self) -> ValueKind {
        match self {
            CellValue::Text(_) => ValueKind::Text,
            CellValue::Signed(_) => ValueKind::Signed,
            CellValue::Unsigned(_) => ValueKind::Unsigned,
            CellValue::Timestamp(_) => ValueKind::Timestamp,
            CellValue::Float(_) => ValueKind::Float,
            CellValue::Flag(_) => ValueKind::Flag,
        }
    }

    /// Compare two values of the same ordered kind.
    ///
    /// Returns `None` when the kinds differ or have no ordering.
    pub fn compare(&self, other: &CellValue<'_>) -> Option<Ordering> {
        match (self, other) {
            (CellValue::Text(a), CellValue::Text(b)) => Some(a.cmp(b)),
            (CellValue::Signed(a), CellValue::Signed(b)) => Some(a.cmp(b)),
            (CellValue::Unsigned(a), CellValue::Unsigned(b)) => Some(a.cmp(b)),
            (CellValue::Timestamp(a), CellValue::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Static declaration of one field of a row type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: ValueKind,
    pub header: Option<&'static str>,
    pub align: Option<&'static str>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            header: None,
            align: None,
        }
    }

    pub const fn header(mut self, header: &'static str) -> Self {
        self.header = Some(header);
        self
    }

    pub const fn align(mut self, align: &'static str) -> Self {
        self.align = Some(align);
        self
    }
}

/// A resolved column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub align: Align,
    /// Index into the row type's field list.
    pub field: usize,
    pub kind: ValueKind,
}

/// Anything that can render itself as an ordered list of column strings.
pub trait DisplayRow {
    fn cells(&self) -> Vec<String>;
}

/// A display row with a declared field schema and typed field access.
pub trait TableRow: DisplayRow {
    /// Field declarations, in declaration order.
    fn fields(&self) -> &'static [FieldSpec];

    /// Typed value of field `field` (an index into [`TableRow::fields`]).
    fn value(&self, field: usize) -> Option<CellValue<'_>>;
}

/// Build the column list for a field declaration.
///
/// Every alignment annotation is checked, even on fields without a header.
pub fn columns_from_fields(fields: &[FieldSpec]) -> Result<Vec<Column>, SchemaError> {
    let mut columns = Vec::new();

    for (index, spec) in fields.iter().enumerate() {
        let align = match spec.align {
            Some(raw) => raw
                .parse::<Align>()
                .map_err(|value| SchemaError::UnknownAlignment {
                    field: spec.name,
                    value,
                })?,
            None => Align::default(),
        };

        let Some(header) = spec.header else {
            continue;
        };

        if !spec.kind.is_ordered() {
            return Err(SchemaError::UnorderedKind {
                column: header.to_string(),
                kind: spec.kind,
            });
        }

        columns.push(Column {
            header: header.to_string(),
            align,
            field: index,
            kind: spec.kind,
        });
    }

    Ok(columns)
}
