//! The interactive transfer flow: pick a medicine, pick the two stores, enter a
//! quantity, confirm. Nothing here touches the store, so a draft can be dropped at any
//! step.

use super::TransferRequest;
use crate::error::InventoryError;
use crate::model::{Location, TransferReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftStep {
    SelectMedicine,
    SelectStores,
    Quantity,
    Confirm,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferDraft {
    medicine_id: Option<String>,
    stores: Option<(Location, Location)>,
    quantity: Option<u32>,
    reason: TransferReason,
    notes: Option<String>,
}

impl TransferDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> DraftStep {
        match (&self.medicine_id, &self.stores, self.quantity) {
            (None, _, _) => DraftStep::SelectMedicine,
            (Some(_), None, _) => DraftStep::SelectStores,
            (Some(_), Some(_), None) => DraftStep::Quantity,
            (Some(_), Some(_), Some(_)) => DraftStep::Confirm,
        }
    }

    /// Choosing another medicine invalidates the entered quantity.
    pub fn select_medicine(&mut self, medicine_id: impl Into<String>) {
        self.medicine_id = Some(medicine_id.into());
        self.quantity = None;
    }

    pub fn select_stores(&mut self, from: Location, to: Location) -> Result<(), InventoryError> {
        if self.medicine_id.is_none() {
            return Err(InventoryError::InvalidTransfer("select a medicine first".into()));
        }
        if from == to {
            return Err(InventoryError::InvalidTransfer(format!(
                "source and destination are both {from}"
            )));
        }
        self.stores = Some((from, to));
        Ok(())
    }

    pub fn set_quantity(&mut self, quantity: u32) -> Result<(), InventoryError> {
        if self.stores.is_none() {
            return Err(InventoryError::InvalidTransfer("select the stores first".into()));
        }
        if quantity == 0 {
            return Err(InventoryError::InvalidTransfer(
                "quantity must be greater than zero".into(),
            ));
        }
        self.quantity = Some(quantity);
        Ok(())
    }

    pub fn set_reason(&mut self, reason: TransferReason) {
        self.reason = reason;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() { None } else { Some(notes) };
    }

    /// Steps back one screen, clearing what that screen entered.
    pub fn back(&mut self) {
        match self.step() {
            DraftStep::Confirm => self.quantity = None,
            DraftStep::Quantity => self.stores = None,
            DraftStep::SelectStores => self.medicine_id = None,
            DraftStep::SelectMedicine => {}
        }
    }

    /// Turns a complete draft into a request on behalf of `user_id`.
    pub fn confirm(self, user_id: impl Into<String>) -> Result<TransferRequest, InventoryError> {
        let (Some(medicine_id), Some((from, to)), Some(quantity)) =
            (self.medicine_id, self.stores, self.quantity)
        else {
            return Err(InventoryError::InvalidTransfer("transfer is incomplete".into()));
        };

        let request = TransferRequest {
            medicine_id,
            from,
            to,
            quantity,
            reason: self.reason,
            notes: self.notes,
            user_id: user_id.into(),
        };
        request.check()?;
        Ok(request)
    }
}
