// src/table/sorted.rs

//! Key-addressed, sortable table model.
//!
//! Rows are identified by key, never by position. Positions only become
//! meaningful after [`SortedTable::redraw`], which sorts the entries and
//! rebuilds the rendered cells. Row 0 of the rendered grid is the header.

use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, trace};

use crate::table::schema::{
    columns_from_fields, Align, CellValue, Column, SchemaError, TableRow,
};

/// Sort state of a header cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    Inactive,
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub text: String,
    pub sort: SortIndicator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub align: Align,
}

impl Cell {
    fn empty() -> Self {
        Self {
            text: String::new(),
            align: Align::default(),
        }
    }
}

/// One keyed entry. `row == None` means the data is missing.
#[derive(Debug, Clone)]
pub struct TableEntry<R> {
    pub key: String,
    pub row: Option<R>,
}

type SelectionChanged = Box<dyn FnMut(&str) + Send>;

pub struct SortedTable<R> {
    columns: Vec<Column>,
    entries: Vec<TableEntry<R>>,
    rows: Vec<Vec<Cell>>,
    sort_column: usize,
    sort_reverse: bool,
    // Last resolved selection; notifications fire when this changes.
    cur_key: Option<String>,
    selection_changed: Option<SelectionChanged>,
}

impl<R> fmt::Debug for SortedTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedTable")
            .field("columns", &self.columns)
            .field("entries", &self.entries.len())
            .field("sort_column", &self.sort_column)
            .field("sort_reverse", &self.sort_reverse)
            .field("cur_key", &self.cur_key)
            .finish()
    }
}

impl<R> Default for SortedTable<R> {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            entries: Vec::new(),
            rows: Vec::new(),
            sort_column: 0,
            sort_reverse: false,
            cur_key: None,
            selection_changed: None,
        }
    }
}

impl<R: TableRow> SortedTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the columns from a representative row's field declarations.
    pub fn define_columns(&mut self, example: &R) -> Result<&mut Self, SchemaError> {
        self.columns = columns_from_fields(example.fields())?;
        if self.sort_column >= self.columns.len() {
            self.sort_column = 0;
            self.sort_reverse = false;
        }
        debug!(columns = self.columns.len(), "table columns defined");
        Ok(self)
    }

    /// Register a callback fired with the newly selected key.
    pub fn set_selection_changed<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.selection_changed = Some(Box::new(handler));
        self
    }

    /// Replace the row for `key` in place, or append a new entry.
    pub fn upsert(&mut self, key: impl Into<String>, row: R) -> &mut Self {
        self.set_entry(key.into(), Some(row));
        self
    }

    /// Like [`SortedTable::upsert`] but the entry has no data yet.
    pub fn upsert_missing(&mut self, key: impl Into<String>) -> &mut Self {
        self.set_entry(key.into(), None);
        self
    }

    fn set_entry(&mut self, key: String, row: Option<R>) {
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.row = row,
            None => self.entries.push(TableEntry { key, row }),
        }
    }

    /// Remove the entry for `key`, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.entries.retain(|e| e.key != key);
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.entries.clear();
        self
    }

    /// Keys in internal order (sort order as of the last redraw).
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key.clone()).collect()
    }

    pub fn get(&self, key: &str) -> Option<&R> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .and_then(|e| e.row.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }

    /// The selected key, if it is still in the table.
    pub fn selection(&self) -> Option<&str> {
        let key = self.cur_key.as_deref()?;
        self.position(key).map(|_| key)
    }

    /// Grid row of the selection (header is row 0).
    pub fn selected_row(&self) -> Option<usize> {
        self.selection()
            .and_then(|key| self.position(key))
            .map(|idx| idx + 1)
    }

    /// Select the entry for `key`; absent keys are ignored.
    pub fn select(&mut self, key: &str) -> &mut Self {
        if let Some(idx) = self.position(key) {
            self.select_row(idx + 1);
        }
        self
    }

    /// Select by grid row. The header row and rows past the end are not
    /// selectable; the previous selection stays in place.
    pub fn select_row(&mut self, row: usize) -> &mut Self {
        if row == 0 || row > self.entries.len() {
            trace!(row, "unselectable row; keeping previous selection");
            return self;
        }

        let key = &self.entries[row - 1].key;
        if self.cur_key.as_deref() != Some(key.as_str()) {
            let key = key.clone();
            if let Some(handler) = self.selection_changed.as_mut() {
                handler(&key);
            }
            self.cur_key = Some(key);
        }
        self
    }

    /// Header click: the active column flips direction, another column
    /// becomes active ascending. Returns false for unknown columns.
    pub fn click_header(&mut self, column: usize) -> bool {
        if column >= self.columns.len() {
            return false;
        }
        if self.sort_column == column {
            self.sort_reverse = !self.sort_reverse;
        } else {
            self.sort_column = column;
            self.sort_reverse = false;
        }
        true
    }

    pub fn sort_column(&self) -> usize {
        self.sort_column
    }

    pub fn is_reversed(&self) -> bool {
        self.sort_reverse
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn headers(&self) -> Vec<HeaderCell> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, col)| HeaderCell {
                text: col.header.clone(),
                sort: match (idx == self.sort_column, self.sort_reverse) {
                    (false, _) => SortIndicator::Inactive,
                    (true, false) => SortIndicator::Ascending,
                    (true, true) => SortIndicator::Descending,
                },
            })
            .collect()
    }

    /// Cells rendered by the last redraw, one `Vec` per entry.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Per-frame update: sort, rebuild cells, restore the selection by key.
    pub fn redraw(&mut self) -> Result<(), SchemaError> {
        let selected = self.selection().map(str::to_owned);

        self.sort_entries()?;
        self.rebuild_cells();

        match selected {
            Some(key) => {
                self.select(&key);
            }
            None => self.cur_key = None,
        }
        Ok(())
    }

    fn sort_entries(&mut self) -> Result<(), SchemaError> {
        let column = self
            .columns
            .get(self.sort_column)
            .ok_or(SchemaError::ColumnsNotDefined)?;
        let reverse = self.sort_reverse;

        // Pull every sort value out first so kind problems surface as errors
        // and the comparator itself cannot fail.
        let mut values: Vec<Option<CellValue<'_>>> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let value = match &entry.row {
                Some(row) => {
                    let value = row.value(column.field).ok_or_else(|| {
                        SchemaError::MissingField {
                            column: column.header.clone(),
                            field: column.field,
                        }
                    })?;
                    if value.kind() != column.kind {
                        return Err(SchemaError::KindMismatch {
                            column: column.header.clone(),
                            expected: column.kind,
                            found: value.kind(),
                        });
                    }
                    Some(value)
                }
                None => None,
            };
            values.push(value);
        }

        let mut order: Vec<usize> = (0..values.len()).collect();
        order.sort_by(|&a, &b| compare_entries(&values[a], &values[b], reverse));
        drop(values);

        let mut slots: Vec<Option<TableEntry<R>>> =
            std::mem::take(&mut self.entries).into_iter().map(Some).collect();
        self.entries = order.iter().filter_map(|&i| slots[i].take()).collect();
        Ok(())
    }

    fn rebuild_cells(&mut self) {
        let width = self.columns.len();

        for (idx, entry) in self.entries.iter().enumerate() {
            let texts = entry.row.as_ref().map(|r| r.cells()).unwrap_or_default();
            let mut cells: Vec<Cell> = texts
                .into_iter()
                .enumerate()
                .map(|(col, text)| Cell {
                    text,
                    align: self.columns.get(col).map(|c| c.align).unwrap_or_default(),
                })
                .collect();
            while cells.len() < width {
                cells.push(Cell::empty());
            }

            match self.rows.get_mut(idx) {
                Some(row) => *row = cells,
                None => self.rows.push(cells),
            }
        }

        self.rows.truncate(self.entries.len());
    }
}

/// Missing data always sorts last; `reverse` only flips present/present.
fn compare_entries(a: &Option<CellValue<'_>>, b: &Option<CellValue<'_>>, reverse: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = a.compare(b).unwrap_or(Ordering::Equal);
            if reverse { ord.reverse() } else { ord }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
