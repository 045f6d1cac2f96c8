//! A1-style addressing: `{table}!{range}`.

use std::fmt::{self, Display};

/// Converts a zero-based column index to its letter name (`0 → A`, `26 → AA`).
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// The rectangle part of an address. Columns are zero-based, rows one-based (as displayed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRange {
    /// Whole columns, e.g. `A:O`.
    Columns { first: usize, last: usize },
    /// A bounded block, e.g. `A5:O5`.
    Block {
        first_col: usize,
        last_col: usize,
        first_row: usize,
        last_row: usize,
    },
}

impl CellRange {
    pub fn first_col(&self) -> usize {
        match self {
            CellRange::Columns { first, .. } => *first,
            CellRange::Block { first_col, .. } => *first_col,
        }
    }

    pub fn last_col(&self) -> usize {
        match self {
            CellRange::Columns { last, .. } => *last,
            CellRange::Block { last_col, .. } => *last_col,
        }
    }
}

impl Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellRange::Columns { first, last } => {
                write!(f, "{}:{}", column_letter(*first), column_letter(*last))
            }
            CellRange::Block {
                first_col,
                last_col,
                first_row,
                last_row,
            } => write!(
                f,
                "{}{}:{}{}",
                column_letter(*first_col),
                first_row,
                column_letter(*last_col),
                last_row
            ),
        }
    }
}

/// A fully qualified range: table name plus rectangle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    pub table: String,
    pub cells: CellRange,
}

impl SheetRange {
    /// Every row of the first `width` columns.
    pub fn columns(table: impl Into<String>, width: usize) -> Self {
        Self {
            table: table.into(),
            cells: CellRange::Columns {
                first: 0,
                last: width.saturating_sub(1),
            },
        }
    }

    /// One row (one-based `row_number`) of the first `width` columns.
    pub fn row(table: impl Into<String>, width: usize, row_number: usize) -> Self {
        Self {
            table: table.into(),
            cells: CellRange::Block {
                first_col: 0,
                last_col: width.saturating_sub(1),
                first_row: row_number,
                last_row: row_number,
            },
        }
    }
}

impl Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.table, self.cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(14), "O");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn test_range_display() {
        assert_eq!(SheetRange::columns("Medicines", 15).to_string(), "Medicines!A:O");
        assert_eq!(SheetRange::columns("Users", 1).to_string(), "Users!A:A");
        assert_eq!(
            SheetRange::row("MainStore_Stock", 4, 7).to_string(),
            "MainStore_Stock!A7:D7"
        );
    }
}
