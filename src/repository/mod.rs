//! Per-entity access to one table: list, find, append, replace in place.
//!
//! Row 1 of every table is the header. Data index `i` lives in sheet row `i + 2`.
//! Filtering is a client-side scan; the store has no server-side query.

use crate::codec::SheetRow;
use crate::store::{CellRange, Row, SharedStore, SheetRange, StoreError};
use std::marker::PhantomData;
use tracing::debug;

/// Sheet row number (one-based, header included) of data index `index`.
pub fn sheet_row(index: usize) -> usize {
    index + 2
}

/// A decoded entity together with where it lives and the cells it was decoded from.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T> {
    pub index: usize,
    pub cells: Row,
    pub entity: T,
}

pub struct Repository<T> {
    store: SharedStore,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _entity: PhantomData,
        }
    }
}

fn normalized(row: &[String]) -> Vec<&str> {
    let mut cells: Vec<&str> = row.iter().map(|c| c.trim()).collect();
    while cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells
}

impl<T: SheetRow> Repository<T> {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Every data row with its index. Blank rows are skipped but keep their index slot.
    pub async fn records(&self) -> Result<Vec<Record<T>>, StoreError> {
        let rows = self
            .store
            .read_range(&SheetRange::columns(T::TABLE, T::width()))
            .await?;

        let records: Vec<Record<T>> = rows
            .into_iter()
            .skip(1)
            .enumerate()
            .filter(|(_, row)| row.iter().any(|cell| !cell.trim().is_empty()))
            .map(|(index, cells)| Record {
                index,
                entity: T::decode(&cells),
                cells,
            })
            .collect();
        debug!(table = T::TABLE, count = records.len(), "Listed");
        Ok(records)
    }

    pub async fn list(&self) -> Result<Vec<T>, StoreError> {
        Ok(self
            .records()
            .await?
            .into_iter()
            .map(|record| record.entity)
            .collect())
    }

    /// First record matching `predicate`, by linear scan.
    pub async fn find_by<P>(&self, predicate: P) -> Result<Option<Record<T>>, StoreError>
    where
        P: Fn(&T) -> bool + Send,
    {
        Ok(self
            .records()
            .await?
            .into_iter()
            .find(|record| predicate(&record.entity)))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Record<T>>, StoreError> {
        self.find_by(|entity| entity.id() == id).await
    }

    /// Writes `entity` at the next free row and returns its index.
    ///
    /// Counts occupied rows over the full row width first, then writes; the two steps
    /// are not atomic. A row with a blank id still counts as occupied. A table that is
    /// completely empty gets its header row in the same write.
    pub async fn append(&self, entity: &T) -> Result<usize, StoreError> {
        let occupied = self
            .store
            .read_range(&SheetRange::columns(T::TABLE, T::width()))
            .await?
            .len();

        let index = if occupied == 0 {
            let range = SheetRange {
                table: T::TABLE.to_string(),
                cells: CellRange::Block {
                    first_col: 0,
                    last_col: T::width() - 1,
                    first_row: 1,
                    last_row: 2,
                },
            };
            self.store
                .write_range(&range, vec![T::header(), entity.encode()])
                .await?;
            0
        } else {
            let index = occupied - 1;
            self.write_row(index, entity).await?;
            index
        };
        debug!(table = T::TABLE, id = entity.id(), index, "Appended");
        Ok(index)
    }

    /// Overwrites the row at `index`.
    pub async fn replace_at(&self, index: usize, entity: &T) -> Result<(), StoreError> {
        self.write_row(index, entity).await?;
        debug!(table = T::TABLE, id = entity.id(), index, "Replaced");
        Ok(())
    }

    /// Overwrites the row at `index` only if it still holds `expected` (the cells as
    /// previously read); otherwise fails with [`StoreError::Conflict`].
    pub async fn replace_at_if_unchanged(
        &self,
        index: usize,
        expected: &[String],
        entity: &T,
    ) -> Result<(), StoreError> {
        let range = SheetRange::row(T::TABLE, T::width(), sheet_row(index));
        let current = self.store.read_range(&range).await?;
        let current = current.first().map(Vec::as_slice).unwrap_or(&[]);

        if normalized(current) != normalized(expected) {
            debug!(table = T::TABLE, index, "Row changed since read");
            return Err(StoreError::conflict(range));
        }
        self.replace_at(index, entity).await
    }

    async fn write_row(&self, index: usize, entity: &T) -> Result<(), StoreError> {
        let range = SheetRange::row(T::TABLE, T::width(), sheet_row(index));
        self.store.write_range(&range, vec![entity.encode()]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MainStoreStock, Store, StoreKind};
    use crate::store::MemoryRowStore;
    use chrono::Utc;
    use std::sync::Arc;

    fn stock(id: &str, medicine: &str, quantity: u32) -> MainStoreStock {
        MainStoreStock {
            id: id.into(),
            medicine_id: medicine.into(),
            quantity,
            last_updated: Utc::now(),
        }
    }

    fn setup() -> (Arc<MemoryRowStore>, Repository<MainStoreStock>) {
        let store = Arc::new(MemoryRowStore::new());
        let repo = Repository::new(store.clone());
        (store, repo)
    }

    #[tokio::test]
    async fn test_empty_and_header_only_tables_list_nothing() {
        let (store, repo) = setup();
        assert!(repo.list().await.unwrap().is_empty());

        store.seed(MainStoreStock::TABLE, vec![MainStoreStock::header()]);
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_writes_header_into_empty_table() {
        let (store, repo) = setup();

        assert_eq!(repo.append(&stock("a", "m1", 5)).await.unwrap(), 0);
        assert_eq!(repo.append(&stock("b", "m2", 7)).await.unwrap(), 1);

        let raw = store.table(MainStoreStock::TABLE);
        assert_eq!(raw[0], MainStoreStock::header());
        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].medicine_id, "m1");
        assert_eq!(listed[1].quantity, 7);
    }

    #[tokio::test]
    async fn test_find_and_replace_in_place() {
        let (_store, repo) = setup();
        repo.append(&stock("a", "m1", 5)).await.unwrap();
        repo.append(&stock("b", "m2", 7)).await.unwrap();

        let record = repo.find_by(|s| s.medicine_id == "m2").await.unwrap().unwrap();
        assert_eq!(record.index, 1);

        let mut updated = record.entity.clone();
        updated.quantity = 3;
        repo.replace_at(record.index, &updated).await.unwrap();

        let found = repo.find_by_id("b").await.unwrap().unwrap();
        assert_eq!(found.entity.quantity, 3);
        assert!(repo.find_by_id("zzz").await.unwrap().is_none());
        assert_eq!(repo.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_guarded_replace_detects_interleaved_write() {
        let (_store, repo) = setup();
        repo.append(&stock("a", "m1", 5)).await.unwrap();
        let seen = repo.find_by_id("a").await.unwrap().unwrap();

        // Someone else writes the row after we read it.
        repo.replace_at(0, &stock("a", "m1", 9)).await.unwrap();

        let err = repo
            .replace_at_if_unchanged(0, &seen.cells, &stock("a", "m1", 4))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(repo.list().await.unwrap()[0].quantity, 9);

        let fresh = repo.find_by_id("a").await.unwrap().unwrap();
        repo.replace_at_if_unchanged(0, &fresh.cells, &stock("a", "m1", 4))
            .await
            .unwrap();
        assert_eq!(repo.list().await.unwrap()[0].quantity, 4);
    }

    #[tokio::test]
    async fn test_append_keeps_trailing_row_with_blank_id() {
        let (store, repo) = setup();
        store.seed(
            MainStoreStock::TABLE,
            vec![
                MainStoreStock::header(),
                stock("a", "m1", 5).encode(),
                vec![String::new(), "m2".into(), "8".into()],
            ],
        );

        assert_eq!(repo.append(&stock("c", "m3", 2)).await.unwrap(), 2);

        let listed = repo.list().await.unwrap();
        let medicines: Vec<&str> = listed.iter().map(|s| s.medicine_id.as_str()).collect();
        assert_eq!(medicines, vec!["m1", "m2", "m3"]);
        assert_eq!(listed[1].quantity, 8);
    }

    #[tokio::test]
    async fn test_listing_is_idempotent_and_skips_blank_rows() {
        let store = Arc::new(MemoryRowStore::new());
        let now = Utc::now();
        let header = Store::header();
        let ward = Store {
            id: "s1".into(),
            name: "Ward".into(),
            kind: StoreKind::Sub,
            location: None,
            created_at: now,
        };
        store.seed(Store::TABLE, vec![header, vec![], ward.encode()]);
        let repo: Repository<Store> = Repository::new(store.clone());

        let first = repo.records().await.unwrap();
        let second = repo.records().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].index, 1);
        assert_eq!(first[0].entity, ward);
    }
}
