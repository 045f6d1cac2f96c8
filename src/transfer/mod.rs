//! Moving stock between locations.
//!
//! [`TransferOrchestrator::execute`] drives one request through
//! `pending → debiting → crediting → logged`, or to `rejected` before anything is written.
//! [`TransferDraft`] is the interactive pre-flight that produces a request.

pub mod draft;
pub mod orchestrator;
pub mod state;

pub use draft::{DraftStep, TransferDraft};
pub use orchestrator::{StockUpdate, StockUpdateReceipt, TransferOrchestrator, TransferReceipt};
pub use state::TransferState;

use crate::error::InventoryError;
use crate::model::{Location, TransferReason};

/// A fully specified move of `quantity` units of one medicine.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub medicine_id: String,
    pub from: Location,
    pub to: Location,
    pub quantity: u32,
    pub reason: TransferReason,
    pub notes: Option<String>,
    pub user_id: String,
}

impl TransferRequest {
    pub fn new(
        medicine_id: impl Into<String>,
        from: Location,
        to: Location,
        quantity: u32,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            medicine_id: medicine_id.into(),
            from,
            to,
            quantity,
            reason: TransferReason::default(),
            notes: None,
            user_id: user_id.into(),
        }
    }

    pub fn with_reason(mut self, reason: TransferReason) -> Self {
        self.reason = reason;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() { None } else { Some(notes) };
        self
    }

    /// Checks that need no store access.
    pub fn check(&self) -> Result<(), InventoryError> {
        if self.medicine_id.trim().is_empty() {
            return Err(InventoryError::InvalidTransfer("no medicine selected".into()));
        }
        if self.from == self.to {
            return Err(InventoryError::InvalidTransfer(format!(
                "source and destination are both {}",
                self.from
            )));
        }
        if self.quantity == 0 {
            return Err(InventoryError::InvalidTransfer(
                "quantity must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_checks() {
        let ok = TransferRequest::new("m1", Location::Main, Location::sub("s1"), 5, "u1");
        assert!(ok.check().is_ok());

        let same = TransferRequest::new("m1", Location::sub("s1"), Location::sub("s1"), 5, "u1");
        assert!(matches!(same.check(), Err(InventoryError::InvalidTransfer(_))));

        let zero = TransferRequest::new("m1", Location::Main, Location::sub("s1"), 0, "u1");
        assert!(matches!(zero.check(), Err(InventoryError::InvalidTransfer(_))));

        let blank = ok.clone().with_notes("  ");
        assert_eq!(blank.notes, None);
    }
}
