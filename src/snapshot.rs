//! Immutable, version-stamped views of every table, published through a
//! `tokio::sync::watch` channel. Readers either see the previous snapshot or the next
//! one, never a mix.

use crate::audit::{newest_first, transfers_in};
use crate::dashboard::DashboardStats;
use crate::ledger::{stock_of, MedicineStock};
use crate::model::{MainStoreStock, Medicine, StockTransfer, Store, SubStoreStock, Transaction};
use crate::repository::Repository;
use crate::store::{SharedStore, StoreError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventorySnapshot {
    /// 0 before the first successful refresh, then +1 per refresh.
    pub version: u64,
    pub medicines: Vec<Medicine>,
    pub stores: Vec<Store>,
    pub main_stock: Vec<MainStoreStock>,
    pub sub_stock: Vec<SubStoreStock>,
    /// Newest first.
    pub transactions: Vec<Transaction>,
    pub synced_at: Option<DateTime<Utc>>,
}

impl InventorySnapshot {
    pub fn medicine(&self, id: &str) -> Option<&Medicine> {
        self.medicines.iter().find(|m| m.id == id)
    }

    pub fn dashboard_stats(&self, now: DateTime<Utc>) -> DashboardStats {
        DashboardStats::compute(&self.medicines, &self.main_stock, now)
            .with_activity(self.transactions.len(), self.synced_at)
    }

    pub fn medicine_stock(&self, medicine_id: &str) -> MedicineStock {
        stock_of(medicine_id, &self.main_stock, &self.sub_stock)
    }

    pub fn transfers(&self) -> Vec<StockTransfer> {
        transfers_in(&self.transactions)
    }
}

/// Outcome of the latest refresh attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncStatus {
    pub last_attempt: Option<DateTime<Utc>>,
    /// Set when the latest refresh failed; the published snapshot is then the older one.
    pub last_error: Option<String>,
}

/// Reads the five tables concurrently; fails as a whole if any read fails.
#[derive(Clone)]
pub struct SnapshotLoader {
    medicines: Repository<Medicine>,
    stores: Repository<Store>,
    main_stock: Repository<MainStoreStock>,
    sub_stock: Repository<SubStoreStock>,
    transactions: Repository<Transaction>,
}

impl SnapshotLoader {
    pub fn new(store: SharedStore) -> Self {
        Self {
            medicines: Repository::new(store.clone()),
            stores: Repository::new(store.clone()),
            main_stock: Repository::new(store.clone()),
            sub_stock: Repository::new(store.clone()),
            transactions: Repository::new(store),
        }
    }

    pub async fn load(&self, version: u64) -> Result<InventorySnapshot, StoreError> {
        let (medicines, main_stock, sub_stock, mut transactions, stores) = tokio::try_join!(
            self.medicines.list(),
            self.main_stock.list(),
            self.sub_stock.list(),
            self.transactions.list(),
            self.stores.list(),
        )?;
        newest_first(&mut transactions);

        Ok(InventorySnapshot {
            version,
            medicines,
            stores,
            main_stock,
            sub_stock,
            transactions,
            synced_at: Some(Utc::now()),
        })
    }
}

/// Owns the sending side of the snapshot and status channels.
pub struct SnapshotPublisher {
    loader: SnapshotLoader,
    snapshot: watch::Sender<Arc<InventorySnapshot>>,
    status: watch::Sender<SyncStatus>,
}

impl SnapshotPublisher {
    pub fn new(store: SharedStore) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(InventorySnapshot::default()));
        let (status, _) = watch::channel(SyncStatus::default());
        Self {
            loader: SnapshotLoader::new(store),
            snapshot,
            status,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<InventorySnapshot>> {
        self.snapshot.subscribe()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    pub fn current(&self) -> Arc<InventorySnapshot> {
        self.snapshot.borrow().clone()
    }

    /// Loads and publishes the next snapshot. On failure the published snapshot is kept
    /// and the error is recorded in the sync status.
    pub async fn refresh(&self) -> Result<Arc<InventorySnapshot>, StoreError> {
        let next_version = self.snapshot.borrow().version + 1;
        let attempt = Utc::now();

        match self.loader.load(next_version).await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.snapshot.send_replace(snapshot.clone());
                self.status.send_replace(SyncStatus {
                    last_attempt: Some(attempt),
                    last_error: None,
                });
                info!(
                    version = snapshot.version,
                    medicines = snapshot.medicines.len(),
                    transactions = snapshot.transactions.len(),
                    "Snapshot refreshed"
                );
                Ok(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "Refresh failed, keeping previous snapshot");
                self.status.send_replace(SyncStatus {
                    last_attempt: Some(attempt),
                    last_error: Some(e.to_string()),
                });
                Err(e)
            }
        }
    }
}
