//! Medicine catalog: add, edit and soft delete, each followed by one audit record.

use crate::audit::{AuditEntry, AuditLog};
use crate::error::InventoryError;
use crate::model::{new_id, AuditKind, Medicine, MedicineDraft, MedicineStatus, MedicineUpdate};
use crate::repository::{Record, Repository};
use crate::store::SharedStore;
use chrono::Utc;
use serde_json::json;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct MedicineCatalog {
    repo: Repository<Medicine>,
    audit: AuditLog,
}

impl MedicineCatalog {
    pub fn new(store: SharedStore) -> Self {
        Self {
            repo: Repository::new(store.clone()),
            audit: AuditLog::new(store),
        }
    }

    pub async fn list(&self) -> Result<Vec<Medicine>, InventoryError> {
        Ok(self.repo.list().await?)
    }

    async fn record(&self, id: &str) -> Result<Record<Medicine>, InventoryError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| InventoryError::not_found("medicine", id))
    }

    pub async fn get(&self, id: &str) -> Result<Medicine, InventoryError> {
        Ok(self.record(id).await?.entity)
    }

    async fn audit(&self, entry: AuditEntry) -> Result<(), InventoryError> {
        let kind = entry.kind.clone();
        let committed = entry.description.clone();
        self.audit
            .record(entry)
            .await
            .map(|_| ())
            .map_err(|source| InventoryError::AuditWriteFailed {
                kind,
                committed,
                source,
            })
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn add(&self, draft: MedicineDraft, user_id: &str) -> Result<Medicine, InventoryError> {
        let medicine = Medicine::from_draft(new_id(), draft, Utc::now());
        self.repo.append(&medicine).await?;
        info!(medicine_id = %medicine.id, "Medicine added");

        self.audit(
            AuditEntry::new(
                AuditKind::MedicineAdded,
                user_id,
                format!("Added medicine: {}", medicine.name),
            )
            .for_medicine(&medicine.id)
            .with_entity(&medicine),
        )
        .await?;
        Ok(medicine)
    }

    /// Merges `update` into the stored medicine. Fails with a store conflict if the row
    /// changed since it was read.
    #[instrument(skip(self, update))]
    pub async fn edit(
        &self,
        id: &str,
        update: MedicineUpdate,
        user_id: &str,
    ) -> Result<Medicine, InventoryError> {
        let record = self.record(id).await?;
        let mut updated = record.entity.clone();
        updated.apply(update);
        updated.updated_at = Utc::now();

        self.repo
            .replace_at_if_unchanged(record.index, &record.cells, &updated)
            .await?;
        info!(medicine_id = %id, "Medicine edited");

        self.audit(
            AuditEntry::new(
                AuditKind::MedicineEdited,
                user_id,
                format!("Updated medicine: {}", updated.name),
            )
            .for_medicine(id)
            .with_change(&record.entity, &updated),
        )
        .await?;
        Ok(updated)
    }

    /// Soft delete: the row stays, its status becomes `discontinued`.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str, user_id: &str) -> Result<Medicine, InventoryError> {
        let record = self.record(id).await?;
        let mut discontinued = record.entity.clone();
        discontinued.status = MedicineStatus::Discontinued;
        discontinued.updated_at = Utc::now();

        self.repo
            .replace_at_if_unchanged(record.index, &record.cells, &discontinued)
            .await?;
        info!(medicine_id = %id, "Medicine discontinued");

        self.audit(
            AuditEntry::new(
                AuditKind::MedicineDeleted,
                user_id,
                format!("Deleted medicine: {}", discontinued.name),
            )
            .for_medicine(id)
            .with_entity(&discontinued)
            .with_change(
                &json!({ "status": record.entity.status }),
                &json!({ "status": discontinued.status }),
            ),
        )
        .await?;
        Ok(discontinued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::SheetRow;
    use crate::model::Transaction;
    use crate::store::{MemoryRowStore, StoreError};
    use std::sync::Arc;

    fn kinds(store: &MemoryRowStore) -> Vec<AuditKind> {
        store
            .table(Transaction::TABLE)
            .iter()
            .skip(1)
            .map(|row| Transaction::decode(row).kind)
            .collect()
    }

    #[tokio::test]
    async fn test_add_edit_delete_each_audit_once() {
        let store = Arc::new(MemoryRowStore::new());
        let catalog = MedicineCatalog::new(store.clone());

        let added = catalog
            .add(MedicineDraft::new("Metformin", "Diabetes").with_safety_stock(30), "u1")
            .await
            .unwrap();
        assert_eq!(added.status, MedicineStatus::Active);

        let edited = catalog
            .edit(
                &added.id,
                MedicineUpdate {
                    strength: Some("850mg".into()),
                    ..Default::default()
                },
                "u1",
            )
            .await
            .unwrap();
        assert_eq!(edited.strength, "850mg");
        assert_eq!(edited.created_at, added.created_at);

        let deleted = catalog.delete(&added.id, "u1").await.unwrap();
        assert_eq!(deleted.status, MedicineStatus::Discontinued);

        let listed = catalog.list().await.unwrap();
        assert_eq!(listed.len(), 1, "soft delete keeps the row");
        assert_eq!(listed[0].status, MedicineStatus::Discontinued);
        assert_eq!(
            kinds(&store),
            vec![
                AuditKind::MedicineAdded,
                AuditKind::MedicineEdited,
                AuditKind::MedicineDeleted
            ]
        );
    }

    #[tokio::test]
    async fn test_add_after_row_with_blank_id_keeps_it() {
        let store = Arc::new(MemoryRowStore::new());
        let mut legacy = vec![String::new(), "Ibuprofen".into(), "Analgesic".into()];
        legacy.resize(Medicine::width(), String::new());
        store.seed(Medicine::TABLE, vec![Medicine::header(), legacy]);
        let catalog = MedicineCatalog::new(store.clone());

        catalog
            .add(MedicineDraft::new("Aspirin", "Analgesic"), "u1")
            .await
            .unwrap();

        let names: Vec<String> = catalog.list().await.unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["Ibuprofen", "Aspirin"]);
    }

    #[tokio::test]
    async fn test_unknown_medicine() {
        let catalog = MedicineCatalog::new(Arc::new(MemoryRowStore::new()));
        let err = catalog.delete("ghost", "u1").await.unwrap_err();
        assert_eq!(err, InventoryError::not_found("medicine", "ghost"));
        assert!(catalog
            .edit("ghost", MedicineUpdate::default(), "u1")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_audit_failure_after_add_is_distinct() {
        let store = Arc::new(MemoryRowStore::new());
        let catalog = MedicineCatalog::new(store.clone());
        store.fail_write_after(1, StoreError::transport("timeout"));

        let err = catalog
            .add(MedicineDraft::new("Insulin", "Diabetes"), "u1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            InventoryError::AuditWriteFailed { kind: AuditKind::MedicineAdded, .. }
        ));
        assert_eq!(catalog.list().await.unwrap().len(), 1);
    }
}
