use super::{TransferRequest, TransferState};
use crate::audit::{AuditEntry, AuditLog};
use crate::error::InventoryError;
use crate::ledger::{StockLedger, StockSlot};
use crate::model::{
    new_id, AuditKind, Location, Medicine, StockTransfer, Store, Transaction, TransferStatus,
};
use crate::repository::Repository;
use crate::store::{SharedStore, StoreError};
use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

/// Outcome of a completed transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReceipt {
    pub transfer: StockTransfer,
    pub audit: Transaction,
    pub source_remaining: u32,
    pub destination_total: u32,
}

/// A direct overwrite of one location's quantity (count correction, dispensing).
#[derive(Debug, Clone, PartialEq)]
pub struct StockUpdate {
    pub medicine_id: String,
    pub location: Location,
    pub quantity: u32,
    pub reason: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockUpdateReceipt {
    pub previous: u32,
    pub current: u32,
    pub audit: Transaction,
}

/// Validates and applies stock movements, one audit record per movement.
#[derive(Clone)]
pub struct TransferOrchestrator {
    medicines: Repository<Medicine>,
    stores: Repository<Store>,
    ledger: StockLedger,
    audit: AuditLog,
    max_conflict_retries: u32,
}

impl TransferOrchestrator {
    pub fn new(store: SharedStore, max_conflict_retries: u32) -> Self {
        Self {
            medicines: Repository::new(store.clone()),
            stores: Repository::new(store.clone()),
            ledger: StockLedger::new(store.clone()),
            audit: AuditLog::new(store),
            max_conflict_retries,
        }
    }

    pub fn ledger(&self) -> &StockLedger {
        &self.ledger
    }

    async fn medicine(&self, id: &str) -> Result<Medicine, InventoryError> {
        self.medicines
            .find_by_id(id)
            .await?
            .map(|record| record.entity)
            .ok_or_else(|| InventoryError::not_found("medicine", id))
    }

    async fn ensure_location(&self, location: &Location) -> Result<(), InventoryError> {
        if let Location::Sub(store_id) = location {
            if self.stores.find_by_id(store_id).await?.is_none() {
                return Err(InventoryError::not_found("store", store_id.as_str()));
            }
        }
        Ok(())
    }

    /// Everything that can reject a transfer. Reads only.
    async fn validate(&self, request: &TransferRequest) -> Result<(Medicine, StockSlot), InventoryError> {
        request.check()?;
        let medicine = self.medicine(&request.medicine_id).await?;
        self.ensure_location(&request.from).await?;
        self.ensure_location(&request.to).await?;

        let source = self.ledger.slot(&medicine.id, &request.from).await?;
        if source.quantity < request.quantity {
            return Err(InventoryError::InsufficientStock {
                medicine_id: medicine.id,
                location: request.from.clone(),
                requested: request.quantity,
                available: source.quantity,
            });
        }
        Ok((medicine, source))
    }

    /// Moves stock from `request.from` to `request.to`.
    ///
    /// Rejections leave the ledger untouched. Once the debit is written the transfer can
    /// only complete: a failed credit surfaces as [`InventoryError::PartialTransfer`] and
    /// is not compensated.
    #[instrument(skip(self, request), fields(medicine_id = %request.medicine_id, from = %request.from, to = %request.to, quantity = request.quantity))]
    pub async fn execute(&self, request: TransferRequest) -> Result<TransferReceipt, InventoryError> {
        debug!(?request, "Transfer requested");
        let mut state = TransferState::Pending;
        let mut conflicts = 0;

        let (medicine, source) = loop {
            let (medicine, source) = match self.validate(&request).await {
                Ok(validated) => validated,
                Err(e) => {
                    state.advance(TransferState::Rejected);
                    warn!(error = %e, "Transfer rejected");
                    return Err(e);
                }
            };

            state.advance(TransferState::Debiting);
            match self
                .ledger
                .commit(&source, source.quantity - request.quantity)
                .await
            {
                Ok(()) => break (medicine, source),
                Err(e) if e.is_conflict() && conflicts < self.max_conflict_retries => {
                    conflicts += 1;
                    warn!(attempt = conflicts, "Source stock changed before debit, retrying");
                    state.advance(TransferState::Pending);
                }
                Err(e) => {
                    state.advance(TransferState::Rejected);
                    warn!(error = %e, "Debit failed");
                    return Err(e.into());
                }
            }
        };
        let source_remaining = source.quantity - request.quantity;

        state.advance(TransferState::Crediting);
        let transfer_id = new_id();
        let (destination_before, destination_total) =
            self.credit(&request).await.map_err(|cause| {
                warn!(%transfer_id, error = %cause, "Credit failed after debit");
                InventoryError::PartialTransfer {
                    transfer_id: transfer_id.clone(),
                    medicine_id: medicine.id.clone(),
                    from: request.from.clone(),
                    to: request.to.clone(),
                    quantity: request.quantity,
                    source: cause,
                }
            })?;

        let transfer = StockTransfer {
            id: transfer_id,
            medicine_id: medicine.id.clone(),
            from_store: request.from.clone(),
            to_store: request.to.clone(),
            quantity: request.quantity,
            reason: request.reason,
            notes: request.notes.clone(),
            created_by: request.user_id.clone(),
            created_at: Utc::now(),
            status: TransferStatus::Completed,
        };
        let description = format!(
            "Transferred {} units of {} from {} to {}",
            request.quantity, medicine.name, request.from, request.to
        );
        let entry = AuditEntry::new(AuditKind::StockTransfer, &request.user_id, &description)
            .for_medicine(&medicine.id)
            .with_entity(&transfer)
            .with_change(
                &json!({ "from": source.quantity, "to": destination_before }),
                &json!({ "from": source_remaining, "to": destination_total }),
            );
        let audit = self
            .audit
            .record(entry)
            .await
            .map_err(|cause| InventoryError::AuditWriteFailed {
                kind: AuditKind::StockTransfer,
                committed: description.clone(),
                source: cause,
            })?;

        state.advance(TransferState::Logged);
        info!(transfer_id = %transfer.id, source_remaining, destination_total, "Transfer logged");
        Ok(TransferReceipt {
            transfer,
            audit,
            source_remaining,
            destination_total,
        })
    }

    /// Adds the quantity to the destination, re-reading on conflict. Returns the
    /// quantities before and after.
    async fn credit(&self, request: &TransferRequest) -> Result<(u32, u32), StoreError> {
        let mut conflicts = 0;
        loop {
            let slot = self.ledger.slot(&request.medicine_id, &request.to).await?;
            let total = slot.quantity.saturating_add(request.quantity);
            match self.ledger.commit(&slot, total).await {
                Ok(()) => return Ok((slot.quantity, total)),
                Err(e) if e.is_conflict() && conflicts < self.max_conflict_retries => {
                    conflicts += 1;
                    warn!(attempt = conflicts, "Destination stock changed before credit, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Overwrites one location's quantity and records `stock_deduction` when it went down,
    /// `stock_adjustment` otherwise.
    #[instrument(skip(self, update), fields(medicine_id = %update.medicine_id, location = %update.location, quantity = update.quantity))]
    pub async fn update_stock(&self, update: StockUpdate) -> Result<StockUpdateReceipt, InventoryError> {
        let medicine = self.medicine(&update.medicine_id).await?;
        self.ensure_location(&update.location).await?;

        let mut conflicts = 0;
        let previous = loop {
            let slot = self.ledger.slot(&medicine.id, &update.location).await?;
            match self.ledger.commit(&slot, update.quantity).await {
                Ok(()) => break slot.quantity,
                Err(e) if e.is_conflict() && conflicts < self.max_conflict_retries => {
                    conflicts += 1;
                    warn!(attempt = conflicts, "Stock changed before update, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        };

        let kind = if update.quantity < previous {
            AuditKind::StockDeduction
        } else {
            AuditKind::StockAdjustment
        };
        let reason = if update.reason.trim().is_empty() {
            "Stock update"
        } else {
            update.reason.trim()
        };
        let description = format!(
            "{reason}: Updated stock for {} at {} from {previous} to {}",
            medicine.name, update.location, update.quantity
        );
        let entry = AuditEntry::new(kind.clone(), &update.user_id, &description)
            .for_medicine(&medicine.id)
            .with_change(
                &json!({ "location": update.location, "quantity": previous }),
                &json!({ "location": update.location, "quantity": update.quantity }),
            );
        let audit = self
            .audit
            .record(entry)
            .await
            .map_err(|cause| InventoryError::AuditWriteFailed {
                kind,
                committed: description.clone(),
                source: cause,
            })?;

        Ok(StockUpdateReceipt {
            previous,
            current: update.quantity,
            audit,
        })
    }
}
