use crate::audit::AuditEntry;
use crate::model::{Medicine, MedicineDraft, MedicineUpdate, Transaction};
use crate::snapshot::InventorySnapshot;
use crate::transfer::{StockUpdate, StockUpdateReceipt, TransferReceipt, TransferRequest};
use std::sync::Arc;

/// Every operation that writes to the store, plus the snapshot refresh.
#[derive(Debug)]
pub enum InventoryCommand {
    CreateTransfer(TransferRequest),
    UpdateStockQuantity(StockUpdate),
    AddMedicine {
        draft: MedicineDraft,
        user_id: String,
    },
    EditMedicine {
        id: String,
        update: MedicineUpdate,
        user_id: String,
    },
    DeleteMedicine {
        id: String,
        user_id: String,
    },
    /// Records an audit entry for a mutation performed elsewhere (login, logout).
    LogTransaction(AuditEntry),
    Refresh,
}

#[derive(Debug)]
pub enum InventoryReply {
    Transferred(TransferReceipt),
    StockUpdated(StockUpdateReceipt),
    MedicineAdded(Medicine),
    MedicineEdited(Medicine),
    MedicineDeleted(Medicine),
    Logged(Transaction),
    Refreshed(Arc<InventorySnapshot>),
}
