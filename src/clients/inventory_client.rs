use crate::audit::AuditEntry;
use crate::error::InventoryError;
use crate::framework::{ActorClient, FrameworkError};
use crate::inventory_actor::{InventoryCommand, InventoryHandler, InventoryReply};
use crate::model::{Medicine, MedicineDraft, MedicineUpdate, Transaction};
use crate::snapshot::InventorySnapshot;
use crate::transfer::{StockUpdate, StockUpdateReceipt, TransferReceipt, TransferRequest};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Client for the inventory actor.
///
/// Each method sends one command and unwraps the matching reply variant.
#[derive(Clone)]
pub struct InventoryClient {
    inner: ActorClient<InventoryHandler>,
}

fn unexpected(reply: InventoryReply) -> InventoryError {
    FrameworkError::UnexpectedReply(format!("{reply:?}")).into()
}

impl InventoryClient {
    pub fn new(inner: ActorClient<InventoryHandler>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, request), fields(medicine_id = %request.medicine_id, from = %request.from, to = %request.to))]
    pub async fn create_transfer(&self, request: TransferRequest) -> Result<TransferReceipt, InventoryError> {
        debug!(?request, "create_transfer called");
        match self.inner.request(InventoryCommand::CreateTransfer(request)).await? {
            InventoryReply::Transferred(receipt) => Ok(receipt),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self, update), fields(medicine_id = %update.medicine_id, location = %update.location))]
    pub async fn update_stock_quantity(&self, update: StockUpdate) -> Result<StockUpdateReceipt, InventoryError> {
        match self.inner.request(InventoryCommand::UpdateStockQuantity(update)).await? {
            InventoryReply::StockUpdated(receipt) => Ok(receipt),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self, draft))]
    pub async fn add_medicine(&self, draft: MedicineDraft, user_id: &str) -> Result<Medicine, InventoryError> {
        debug!(?draft, "add_medicine called");
        let command = InventoryCommand::AddMedicine {
            draft,
            user_id: user_id.to_string(),
        };
        match self.inner.request(command).await? {
            InventoryReply::MedicineAdded(medicine) => Ok(medicine),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self, update))]
    pub async fn edit_medicine(
        &self,
        id: &str,
        update: MedicineUpdate,
        user_id: &str,
    ) -> Result<Medicine, InventoryError> {
        let command = InventoryCommand::EditMedicine {
            id: id.to_string(),
            update,
            user_id: user_id.to_string(),
        };
        match self.inner.request(command).await? {
            InventoryReply::MedicineEdited(medicine) => Ok(medicine),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_medicine(&self, id: &str, user_id: &str) -> Result<Medicine, InventoryError> {
        let command = InventoryCommand::DeleteMedicine {
            id: id.to_string(),
            user_id: user_id.to_string(),
        };
        match self.inner.request(command).await? {
            InventoryReply::MedicineDeleted(medicine) => Ok(medicine),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self, entry), fields(kind = %entry.kind))]
    pub async fn log_transaction(&self, entry: AuditEntry) -> Result<Transaction, InventoryError> {
        match self.inner.request(InventoryCommand::LogTransaction(entry)).await? {
            InventoryReply::Logged(transaction) => Ok(transaction),
            other => Err(unexpected(other)),
        }
    }

    /// Reloads every table and publishes a new snapshot (`refreshAllData`).
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Arc<InventorySnapshot>, InventoryError> {
        match self.inner.request(InventoryCommand::Refresh).await? {
            InventoryReply::Refreshed(snapshot) => Ok(snapshot),
            other => Err(unexpected(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_client, expect_request, MockClient};
    use crate::model::AuditKind;
    use crate::store::StoreError;
    use chrono::Utc;

    fn transaction(kind: AuditKind) -> Transaction {
        Transaction {
            id: "t1".into(),
            kind,
            medicine_id: None,
            entity: None,
            old_values: None,
            new_values: None,
            user_id: "u1".into(),
            description: "User logged in".into(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_log_transaction_unwraps_reply() {
        let mut mock = MockClient::<InventoryHandler>::new();
        mock.expect_command()
            .return_ok(InventoryReply::Logged(transaction(AuditKind::Login)));

        let client = InventoryClient::new(mock.client());
        let logged = client
            .log_transaction(AuditEntry::new(AuditKind::Login, "u1", "User logged in"))
            .await
            .unwrap();

        assert_eq!(logged.kind, AuditKind::Login);
        mock.verify();
        mock.with_received(|commands| {
            assert!(matches!(&commands[0], InventoryCommand::LogTransaction(e) if e.user_id == "u1"));
        });
    }

    #[tokio::test]
    async fn test_errors_pass_through() {
        let mut mock = MockClient::<InventoryHandler>::new();
        mock.expect_command()
            .return_err(InventoryError::Store(StoreError::Configuration("no key".into())));

        let client = InventoryClient::new(mock.client());
        let err = client.refresh().await.unwrap_err();
        assert!(matches!(err, InventoryError::Store(StoreError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_mismatched_reply_is_a_framework_error() {
        let (inner, mut receiver) = create_mock_client::<InventoryHandler>(1);
        let client = InventoryClient::new(inner);
        let task = tokio::spawn(async move { client.delete_medicine("m1", "u1").await });

        let (command, responder) = expect_request(&mut receiver).await.unwrap();
        assert!(matches!(command, InventoryCommand::DeleteMedicine { ref id, .. } if id == "m1"));
        responder
            .send(Ok(InventoryReply::Logged(transaction(AuditKind::MedicineDeleted))))
            .unwrap();

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(
            err,
            InventoryError::Framework(FrameworkError::UnexpectedReply(_))
        ));
    }
}
