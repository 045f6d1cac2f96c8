//! The remote row store: a spreadsheet-shaped system of record addressed by
//! `{table}!{A1 range}`, offering only "fetch a rectangle" and "overwrite a rectangle".
//!
//! [`SheetsClient`] talks to the real provider over HTTP; [`MemoryRowStore`] keeps the
//! same semantics in memory for tests and offline runs.

pub mod error;
pub mod memory;
pub mod range;
pub mod sheets;

pub use error::StoreError;
pub use memory::MemoryRowStore;
pub use range::{column_letter, CellRange, SheetRange};
pub use sheets::SheetsClient;

use async_trait::async_trait;
use std::sync::Arc;

/// One row of cells as the store returns them: strings, trailing empties trimmed.
pub type Row = Vec<String>;

/// Read/overwrite access to rectangular ranges. No patch, no delete, no retries.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Fetches the rows of `range`. Rows past the last non-empty row are not returned.
    async fn read_range(&self, range: &SheetRange) -> Result<Vec<Row>, StoreError>;

    /// Overwrites the cells of `range` starting at its top-left corner.
    async fn write_range(&self, range: &SheetRange, rows: Vec<Row>) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: RowStore + ?Sized> RowStore for Arc<S> {
    async fn read_range(&self, range: &SheetRange) -> Result<Vec<Row>, StoreError> {
        (**self).read_range(range).await
    }

    async fn write_range(&self, range: &SheetRange, rows: Vec<Row>) -> Result<(), StoreError> {
        (**self).write_range(range, rows).await
    }
}

/// The store handle shared by every repository.
pub type SharedStore = Arc<dyn RowStore>;
