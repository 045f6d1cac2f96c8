use crate::audit::AuditEntry;
use crate::clients::InventoryClient;
use crate::config::InventoryConfig;
use crate::dashboard::DashboardStats;
use crate::error::InventoryError;
use crate::framework::FrameworkError;
use crate::inventory_actor::{self, InventoryContext, InventoryHandler};
use crate::ledger::MedicineStock;
use crate::model::Transaction;
use crate::session::{SessionManager, SessionStore};
use crate::snapshot::{InventorySnapshot, SyncStatus};
use crate::store::{SharedStore, SheetsClient};
use crate::transfer::{StockUpdate, StockUpdateReceipt, TransferReceipt, TransferRequest};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The running inventory: one actor in front of the row store, plus read access to the
/// latest published snapshot.
///
/// # Example
///
/// ```ignore
/// let system = InventorySystem::start(store, &InventoryConfig::default());
///
/// system.refresh_all_data().await?;
/// let receipt = system
///     .create_transfer(TransferRequest::new("m1", Location::Main, Location::sub("s1"), 10, "u1"))
///     .await?;
/// let stats = system.get_dashboard_stats();
///
/// system.shutdown().await?;
/// ```
pub struct InventorySystem {
    /// Client for the inventory actor. Clones keep the actor alive.
    pub client: InventoryClient,
    store: SharedStore,
    snapshot: watch::Receiver<Arc<InventorySnapshot>>,
    status: watch::Receiver<SyncStatus>,
    handle: JoinHandle<()>,
}

impl InventorySystem {
    /// Spawns the inventory actor over `store`.
    pub fn start(store: SharedStore, config: &InventoryConfig) -> Self {
        Self::start_with(store, config, InventoryHandler::default())
    }

    pub fn start_with(store: SharedStore, config: &InventoryConfig, handler: InventoryHandler) -> Self {
        let context = InventoryContext::new(store.clone(), config.max_conflict_retries);
        let snapshot = context.snapshots.subscribe();
        let status = context.snapshots.subscribe_status();

        let (actor, client) = inventory_actor::new(config.actor_buffer.max(1), handler);
        let handle = tokio::spawn(actor.run(context));
        info!(buffer = config.actor_buffer, "Inventory system started");

        Self {
            client,
            store,
            snapshot,
            status,
            handle,
        }
    }

    /// Starts against the spreadsheet store described by `config.sheets`.
    pub fn from_config(config: &InventoryConfig) -> Result<Self, InventoryError> {
        let sheets: SharedStore = Arc::new(SheetsClient::new(&config.sheets)?);
        Ok(Self::start(sheets, config))
    }

    /// A session manager whose login/logout audits go through this system.
    pub fn session_manager(&self, sessions: Arc<dyn SessionStore>) -> SessionManager {
        SessionManager::new(sessions, self.store.clone(), self.client.clone())
    }

    /// Reloads all five tables together. On failure the previous snapshot stays current
    /// and [`sync_status`](Self::sync_status) carries the error.
    pub async fn refresh_all_data(&self) -> Result<Arc<InventorySnapshot>, InventoryError> {
        self.client.refresh().await
    }

    pub fn snapshot(&self) -> Arc<InventorySnapshot> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<InventorySnapshot>> {
        self.snapshot.clone()
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.status.borrow().clone()
    }

    pub fn get_dashboard_stats(&self) -> DashboardStats {
        self.snapshot().dashboard_stats(Utc::now())
    }

    pub fn get_medicine_stock(&self, medicine_id: &str) -> MedicineStock {
        self.snapshot().medicine_stock(medicine_id)
    }

    pub async fn create_transfer(&self, request: TransferRequest) -> Result<TransferReceipt, InventoryError> {
        self.client.create_transfer(request).await
    }

    pub async fn update_stock_quantity(&self, update: StockUpdate) -> Result<StockUpdateReceipt, InventoryError> {
        self.client.update_stock_quantity(update).await
    }

    pub async fn log_transaction(&self, entry: AuditEntry) -> Result<Transaction, InventoryError> {
        self.client.log_transaction(entry).await
    }

    /// Closes the command channel and waits for the actor to drain.
    ///
    /// Waits for every clone of [`client`](Self::client) (including those held by session
    /// managers) to be dropped first.
    pub async fn shutdown(self) -> Result<(), InventoryError> {
        info!("Shutting down inventory system...");
        drop(self.client);

        if let Err(e) = self.handle.await {
            error!("Actor task failed: {:?}", e);
            return Err(FrameworkError::TaskFailed(e.to_string()).into());
        }
        info!("Inventory system shutdown complete.");
        Ok(())
    }
}
