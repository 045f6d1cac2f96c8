use super::{InventoryCommand, InventoryReply};
use crate::audit::AuditLog;
use crate::catalog::MedicineCatalog;
use crate::error::InventoryError;
use crate::framework::CommandHandler;
use crate::snapshot::SnapshotPublisher;
use crate::store::SharedStore;
use crate::transfer::TransferOrchestrator;
use async_trait::async_trait;
use tracing::{debug, info};

/// Dependencies of the inventory actor, injected at `run()` time.
pub struct InventoryContext {
    pub orchestrator: TransferOrchestrator,
    pub catalog: MedicineCatalog,
    pub audit: AuditLog,
    pub snapshots: SnapshotPublisher,
}

impl InventoryContext {
    pub fn new(store: SharedStore, max_conflict_retries: u32) -> Self {
        Self {
            orchestrator: TransferOrchestrator::new(store.clone(), max_conflict_retries),
            catalog: MedicineCatalog::new(store.clone()),
            audit: AuditLog::new(store.clone()),
            snapshots: SnapshotPublisher::new(store),
        }
    }
}

/// Applies inventory commands one at a time.
///
/// After every command that changed the store (including ones that failed after
/// committing) the snapshot is reloaded, so readers catch up without an explicit refresh.
pub struct InventoryHandler {
    refresh_after_mutation: bool,
}

impl Default for InventoryHandler {
    fn default() -> Self {
        Self {
            refresh_after_mutation: true,
        }
    }
}

impl InventoryHandler {
    /// A handler that only refreshes on explicit [`InventoryCommand::Refresh`].
    pub fn manual_refresh() -> Self {
        Self {
            refresh_after_mutation: false,
        }
    }

    async fn settle<T>(
        &self,
        ctx: &InventoryContext,
        result: Result<T, InventoryError>,
    ) -> Result<T, InventoryError> {
        let changed = match &result {
            Ok(_) => true,
            Err(e) => e.is_committed(),
        };
        if changed && self.refresh_after_mutation {
            // A failed reload is recorded in the sync status and must not mask the outcome.
            if let Err(e) = ctx.snapshots.refresh().await {
                debug!(error = %e, "Post-mutation refresh failed");
            }
        }
        result
    }
}

#[async_trait]
impl CommandHandler for InventoryHandler {
    type Command = InventoryCommand;
    type Reply = InventoryReply;
    type Context = InventoryContext;
    type Error = InventoryError;

    async fn on_start(&mut self, ctx: &InventoryContext) {
        match ctx.snapshots.refresh().await {
            Ok(snapshot) => info!(version = snapshot.version, "Initial snapshot loaded"),
            Err(e) => info!(error = %e, "Starting without initial snapshot"),
        }
    }

    async fn handle(
        &mut self,
        command: InventoryCommand,
        ctx: &InventoryContext,
    ) -> Result<InventoryReply, InventoryError> {
        match command {
            InventoryCommand::CreateTransfer(request) => {
                let result = ctx.orchestrator.execute(request).await;
                self.settle(ctx, result).await.map(InventoryReply::Transferred)
            }
            InventoryCommand::UpdateStockQuantity(update) => {
                let result = ctx.orchestrator.update_stock(update).await;
                self.settle(ctx, result).await.map(InventoryReply::StockUpdated)
            }
            InventoryCommand::AddMedicine { draft, user_id } => {
                let result = ctx.catalog.add(draft, &user_id).await;
                self.settle(ctx, result).await.map(InventoryReply::MedicineAdded)
            }
            InventoryCommand::EditMedicine {
                id,
                update,
                user_id,
            } => {
                let result = ctx.catalog.edit(&id, update, &user_id).await;
                self.settle(ctx, result).await.map(InventoryReply::MedicineEdited)
            }
            InventoryCommand::DeleteMedicine { id, user_id } => {
                let result = ctx.catalog.delete(&id, &user_id).await;
                self.settle(ctx, result).await.map(InventoryReply::MedicineDeleted)
            }
            InventoryCommand::LogTransaction(entry) => {
                let kind = entry.kind.clone();
                let committed = entry.description.clone();
                let result = ctx.audit.record(entry).await.map_err(|source| {
                    InventoryError::AuditWriteFailed {
                        kind,
                        committed,
                        source,
                    }
                });
                self.settle(ctx, result).await.map(InventoryReply::Logged)
            }
            InventoryCommand::Refresh => Ok(InventoryReply::Refreshed(
                ctx.snapshots.refresh().await?,
            )),
        }
    }
}
