//! Errors surfaced by inventory operations.

use crate::framework::FrameworkError;
use crate::model::{AuditKind, Location};
use crate::store::StoreError;
use thiserror::Error;

/// Everything a ledger, catalog, transfer or session operation can fail with.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InventoryError {
    /// The remote store failed (configuration, provider, transport, conflict).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The source location holds less than requested. Nothing was written.
    #[error("Insufficient stock of {medicine_id} at {location}: requested {requested}, available {available}")]
    InsufficientStock {
        medicine_id: String,
        location: Location,
        requested: u32,
        available: u32,
    },

    /// The request itself is malformed (same source and destination, zero quantity).
    #[error("Invalid transfer: {0}")]
    InvalidTransfer(String),

    /// The debit was written but the credit failed. Total quantity is no longer conserved
    /// and no compensation was attempted.
    #[error("Transfer {transfer_id} debited {quantity} of {medicine_id} from {from} but crediting {to} failed: {source}")]
    PartialTransfer {
        transfer_id: String,
        medicine_id: String,
        from: Location,
        to: Location,
        quantity: u32,
        source: StoreError,
    },

    /// The mutation was committed but its audit record could not be written.
    #[error("{kind} committed ({committed}) but its audit record failed: {source}")]
    AuditWriteFailed {
        kind: AuditKind,
        committed: String,
        source: StoreError,
    },

    #[error("Session error: {0}")]
    Session(String),

    #[error(transparent)]
    Framework(#[from] FrameworkError),
}

impl InventoryError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        InventoryError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// True when a mutation already reached the store despite the error.
    pub fn is_committed(&self) -> bool {
        matches!(
            self,
            InventoryError::PartialTransfer { .. } | InventoryError::AuditWriteFailed { .. }
        )
    }
}
