//! Append-only audit log over the `Transactions` table.

use crate::model::{new_id, AuditKind, StockTransfer, Transaction};
use crate::repository::Repository;
use crate::store::{SharedStore, StoreError};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// What the caller supplies; id and timestamp are assigned on record.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub kind: AuditKind,
    pub medicine_id: Option<String>,
    pub entity: Option<Value>,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
    pub user_id: String,
    pub description: String,
}

impl AuditEntry {
    pub fn new(kind: AuditKind, user_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            medicine_id: None,
            entity: None,
            old_values: None,
            new_values: None,
            user_id: user_id.into(),
            description: description.into(),
        }
    }

    pub fn for_medicine(mut self, medicine_id: impl Into<String>) -> Self {
        self.medicine_id = Some(medicine_id.into());
        self
    }

    pub fn with_entity<T: Serialize>(mut self, entity: &T) -> Self {
        self.entity = payload(entity);
        self
    }

    pub fn with_change<O: Serialize, N: Serialize>(mut self, old: &O, new: &N) -> Self {
        self.old_values = payload(old);
        self.new_values = payload(new);
        self
    }
}

fn payload<T: Serialize>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok()
}

/// Newest first. Among equal timestamps the later-stored entry comes first.
pub fn newest_first(entries: &mut [Transaction]) {
    entries.reverse();
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Transfers recorded as payloads of `stock_transfer` entries, newest first.
pub fn transfers_in(entries: &[Transaction]) -> Vec<StockTransfer> {
    let mut transfers: Vec<StockTransfer> = entries
        .iter()
        .filter(|t| t.kind == AuditKind::StockTransfer)
        .filter_map(|t| t.entity.clone())
        .filter_map(|entity| serde_json::from_value(entity).ok())
        .collect();
    transfers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    transfers
}

#[derive(Clone)]
pub struct AuditLog {
    repo: Repository<Transaction>,
}

impl AuditLog {
    pub fn new(store: SharedStore) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    /// Appends one record. Never edits or removes existing ones.
    pub async fn record(&self, entry: AuditEntry) -> Result<Transaction, StoreError> {
        let transaction = Transaction {
            id: new_id(),
            kind: entry.kind,
            medicine_id: entry.medicine_id,
            entity: entry.entity,
            old_values: entry.old_values,
            new_values: entry.new_values,
            user_id: entry.user_id,
            description: entry.description,
            created_at: Utc::now(),
        };
        debug!(?transaction, "Recording");
        self.repo.append(&transaction).await?;
        info!(kind = %transaction.kind, id = %transaction.id, "Audit recorded");
        Ok(transaction)
    }

    /// All records, newest first, optionally truncated to `limit`.
    pub async fn recent(&self, limit: Option<usize>) -> Result<Vec<Transaction>, StoreError> {
        let mut entries = self.repo.list().await?;
        newest_first(&mut entries);
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    pub async fn transfers(&self) -> Result<Vec<StockTransfer>, StoreError> {
        Ok(transfers_in(&self.repo.list().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Location, TransferReason, TransferStatus};
    use crate::store::MemoryRowStore;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_record_appends_and_recent_sorts_descending() {
        let log = AuditLog::new(Arc::new(MemoryRowStore::new()));

        let first = log
            .record(AuditEntry::new(AuditKind::Login, "u1", "User logged in"))
            .await
            .unwrap();
        let second = log
            .record(
                AuditEntry::new(AuditKind::MedicineEdited, "u1", "Updated medicine: Aspirin")
                    .for_medicine("m1")
                    .with_change(&json!({"name": "Asprin"}), &json!({"name": "Aspirin"})),
            )
            .await
            .unwrap();

        let all = log.recent(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
        assert_eq!(all[0].old_values, Some(json!({"name": "Asprin"})));

        assert_eq!(log.recent(Some(1)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_transfers_are_derived_from_payloads() {
        let log = AuditLog::new(Arc::new(MemoryRowStore::new()));
        let transfer = StockTransfer {
            id: "t1".into(),
            medicine_id: "m1".into(),
            from_store: Location::Main,
            to_store: Location::sub("s1"),
            quantity: 12,
            reason: TransferReason::Transfer,
            notes: Some("weekly restock".into()),
            created_by: "u1".into(),
            created_at: Utc::now(),
            status: TransferStatus::Completed,
        };
        log.record(
            AuditEntry::new(AuditKind::StockTransfer, "u1", "Transferred 12 units from main to s1")
                .for_medicine("m1")
                .with_entity(&transfer),
        )
        .await
        .unwrap();
        // A legacy entry without payload is not a transfer.
        log.record(AuditEntry::new(AuditKind::StockTransfer, "u1", "legacy"))
            .await
            .unwrap();

        assert_eq!(log.transfers().await.unwrap(), vec![transfer]);
    }
}
