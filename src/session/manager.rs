use super::store::SessionStore;
use crate::audit::AuditEntry;
use crate::clients::InventoryClient;
use crate::error::InventoryError;
use crate::model::{new_id, AuditKind, User};
use crate::repository::Repository;
use crate::store::SharedStore;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub const USER_TOKEN_KEY: &str = "userToken";
pub const USER_KEY: &str = "user";
pub const API_KEY_KEY: &str = "GOOGLE_SHEETS_API_KEY";
pub const SHEET_ID_KEY: &str = "SHEET_ID";

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Store credentials remembered in the session, if any.
pub async fn stored_credentials(
    store: &dyn SessionStore,
) -> Result<(Option<String>, Option<String>), InventoryError> {
    Ok((store.get(API_KEY_KEY).await?, store.get(SHEET_ID_KEY).await?))
}

/// Signs users in and out. Login and logout each write one audit record through the
/// inventory actor.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    users: Repository<User>,
    inventory: InventoryClient,
    current: Option<Session>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, rows: SharedStore, inventory: InventoryClient) -> Self {
        Self {
            store,
            users: Repository::new(rows),
            inventory,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Restores a remembered session. A malformed remembered user is discarded.
    pub async fn bootstrap(&mut self) -> Result<Option<Session>, InventoryError> {
        let token = self.store.get(USER_TOKEN_KEY).await?;
        let user = self.store.get(USER_KEY).await?;

        self.current = match (token, user) {
            (Some(token), Some(user)) => match serde_json::from_str::<User>(&user) {
                Ok(user) => Some(Session { token, user }),
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable session");
                    self.clear().await?;
                    None
                }
            },
            _ => None,
        };
        Ok(self.current.clone())
    }

    #[instrument(skip(self))]
    pub async fn login(&mut self, email: &str) -> Result<Session, InventoryError> {
        let wanted = email.trim().to_lowercase();
        let user = self
            .users
            .find_by(|u| u.email.trim().to_lowercase() == wanted)
            .await?
            .map(|record| record.entity)
            .ok_or_else(|| InventoryError::not_found("user", email))?;

        let token = new_id();
        let user_json = serde_json::to_string(&user)
            .map_err(|e| InventoryError::Session(format!("failed to encode user: {e}")))?;
        self.store.set(USER_TOKEN_KEY, &token).await?;
        self.store.set(USER_KEY, &user_json).await?;

        let session = Session { token, user };
        self.current = Some(session.clone());
        info!(user_id = %session.user.id, "Logged in");

        self.inventory
            .log_transaction(
                AuditEntry::new(
                    AuditKind::Login,
                    &session.user.id,
                    format!("User logged in: {}", session.user.email),
                )
                .with_entity(&session.user),
            )
            .await?;
        Ok(session)
    }

    #[instrument(skip(self))]
    pub async fn logout(&mut self) -> Result<(), InventoryError> {
        let session = self
            .current
            .take()
            .ok_or_else(|| InventoryError::Session("no active session".into()))?;
        self.clear().await?;
        info!(user_id = %session.user.id, "Logged out");

        self.inventory
            .log_transaction(AuditEntry::new(
                AuditKind::Logout,
                &session.user.id,
                format!("User logged out: {}", session.user.email),
            ))
            .await?;
        Ok(())
    }

    /// Remembers store credentials; they take effect on the next start.
    pub async fn set_credentials(&self, api_key: &str, sheet_id: &str) -> Result<(), InventoryError> {
        let (api_key, sheet_id) = (api_key.trim(), sheet_id.trim());
        if api_key.is_empty() || sheet_id.is_empty() {
            return Err(InventoryError::Session(
                "API key and Sheet ID are both required".into(),
            ));
        }
        self.store.set(API_KEY_KEY, api_key).await?;
        self.store.set(SHEET_ID_KEY, sheet_id).await
    }

    async fn clear(&self) -> Result<(), InventoryError> {
        self.store.remove(USER_TOKEN_KEY).await?;
        self.store.remove(USER_KEY).await
    }
}
