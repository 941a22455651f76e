// src/table/mod.rs

//! Sortable table model for the dashboard.
//!
//! - [`schema`] holds the row traits and the static field declarations.
//! - [`sorted`] holds [`SortedTable`], the keyed entry list with sorting and
//!   selection.
//!
//! Drawing the cells is left to whatever terminal layer embeds this.

pub mod schema;
pub mod sorted;

pub use schema::{
    columns_from_fields, Align, CellValue, Column, DisplayRow, FieldSpec, SchemaError,
    TableRow, ValueKind,
};
pub use sorted::{Cell, HeaderCell, SortIndicator, SortedTable, TableEntry};
