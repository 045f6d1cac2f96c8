//! Domain entities as projections of store rows.

pub mod medicine;
pub mod stock;
pub mod store;
pub mod transaction;
pub mod transfer;
pub mod user;

pub use medicine::{Medicine, MedicineDraft, MedicineStatus, MedicineUpdate};
pub use stock::{Location, MainStoreStock, SubStoreStock, MAIN_LOCATION};
pub use store::{Store, StoreKind};
pub use transaction::{AuditKind, Transaction};
pub use transfer::{StockTransfer, TransferReason, TransferStatus};
pub use user::{Role, User};

/// A fresh identifier for a new row.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
