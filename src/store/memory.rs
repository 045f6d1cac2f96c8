//! In-memory [`RowStore`] with spreadsheet semantics and failure injection.

use super::{Row, RowStore, SheetRange, StoreError};
use crate::store::CellRange;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct MemoryState {
    tables: HashMap<String, Vec<Row>>,
    reads: usize,
    writes: usize,
    read_failure: Option<StoreError>,
    write_failure: Option<(usize, StoreError)>,
}

/// A row store held in memory.
///
/// Full-column reads return rows up to the last non-empty one with trailing empty cells
/// trimmed, the way the hosted provider does. Writes overwrite the addressed rectangle and
/// grow the table as needed.
#[derive(Default)]
pub struct MemoryRowStore {
    state: Mutex<MemoryState>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Builder form of [`seed`](Self::seed).
    pub fn with_table(self, table: &str, rows: Vec<Row>) -> Self {
        self.seed(table, rows);
        self
    }

    /// Replaces the whole content of `table`, header row included.
    pub fn seed(&self, table: &str, rows: Vec<Row>) {
        self.state().tables.insert(table.to_string(), rows);
    }

    /// A copy of the raw cells of `table`.
    pub fn table(&self, table: &str) -> Vec<Row> {
        self.state().tables.get(table).cloned().unwrap_or_default()
    }

    pub fn reads(&self) -> usize {
        self.state().reads
    }

    pub fn writes(&self) -> usize {
        self.state().writes
    }

    /// Every read fails with `error` until [`clear_failures`](Self::clear_failures).
    pub fn fail_reads(&self, error: StoreError) {
        self.state().read_failure = Some(error);
    }

    /// Lets `successes` more writes through, then fails the next one with `error`.
    /// The failure fires once.
    pub fn fail_write_after(&self, successes: usize, error: StoreError) {
        self.state().write_failure = Some((successes, error));
    }

    pub fn clear_failures(&self) {
        let mut state = self.state();
        state.read_failure = None;
        state.write_failure = None;
    }
}

fn row_bounds(cells: &CellRange, len: usize) -> (usize, usize) {
    match cells {
        CellRange::Columns { .. } => (0, len),
        CellRange::Block {
            first_row,
            last_row,
            ..
        } => {
            let start = first_row.saturating_sub(1).min(len);
            (start, (*last_row).min(len).max(start))
        }
    }
}

#[async_trait]
impl RowStore for MemoryRowStore {
    async fn read_range(&self, range: &SheetRange) -> Result<Vec<Row>, StoreError> {
        let mut state = self.state();
        state.reads += 1;
        if let Some(error) = state.read_failure.clone() {
            return Err(error);
        }

        let Some(rows) = state.tables.get(&range.table) else {
            return Ok(Vec::new());
        };
        let first = range.cells.first_col();
        let width = range.cells.last_col() + 1 - first;
        let (start, end) = row_bounds(&range.cells, rows.len());

        let mut out: Vec<Row> = rows[start..end]
            .iter()
            .map(|row| {
                let mut cells: Row = row.iter().skip(first).take(width).cloned().collect();
                while cells.last().is_some_and(|c| c.is_empty()) {
                    cells.pop();
                }
                cells
            })
            .collect();
        while out.last().is_some_and(|r| r.is_empty()) {
            out.pop();
        }
        Ok(out)
    }

    async fn write_range(&self, range: &SheetRange, rows: Vec<Row>) -> Result<(), StoreError> {
        let mut state = self.state();
        if let Some((remaining, error)) = state.write_failure.take() {
            if remaining == 0 {
                return Err(error);
            }
            state.write_failure = Some((remaining - 1, error));
        }
        state.writes += 1;

        let start_row = match range.cells {
            CellRange::Columns { .. } => 0,
            CellRange::Block { first_row, .. } => first_row.saturating_sub(1),
        };
        let first_col = range.cells.first_col();
        let table = state.tables.entry(range.table.clone()).or_default();

        for (offset, values) in rows.into_iter().enumerate() {
            let index = start_row + offset;
            if table.len() <= index {
                table.resize(index + 1, Vec::new());
            }
            let target = &mut table[index];
            if target.len() < first_col + values.len() {
                target.resize(first_col + values.len(), String::new());
            }
            for (col, value) in values.into_iter().enumerate() {
                target[first_col + col] = value;
            }
        }
        Ok(())
    }
}
