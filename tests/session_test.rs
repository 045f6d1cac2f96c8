mod common;

use common::*;
use medstock::model::AuditKind;
use medstock::session::{
    JsonFileSessionStore, MemorySessionStore, SessionStore, API_KEY_KEY, USER_KEY, USER_TOKEN_KEY,
};
use medstock::InventoryError;
use std::sync::Arc;

#[tokio::test]
async fn test_login_and_logout_are_audited_separately() {
    let system = start(seeded_store(10)).await;
    let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let mut manager = system.session_manager(sessions.clone());

    let session = manager.login("  Keeper@Clinic.org ").await.unwrap();
    assert_eq!(session.user.id, KEEPER);
    assert!(sessions.get(USER_TOKEN_KEY).await.unwrap().is_some());

    manager.logout().await.unwrap();
    assert!(manager.current().is_none());
    assert_eq!(sessions.get(USER_KEY).await.unwrap(), None);

    let kinds: Vec<AuditKind> = system
        .snapshot()
        .transactions
        .iter()
        .map(|t| t.kind.clone())
        .collect();
    assert_eq!(kinds, vec![AuditKind::Logout, AuditKind::Login]);

    assert!(matches!(manager.logout().await, Err(InventoryError::Session(_))));
    drop(manager);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unknown_user_cannot_log_in() {
    let system = start(seeded_store(10)).await;
    let mut manager = system.session_manager(Arc::new(MemorySessionStore::new()));

    let err = manager.login("nobody@clinic.org").await.unwrap_err();
    assert!(matches!(err, InventoryError::NotFound { entity: "user", .. }));
    assert!(system.snapshot().transactions.is_empty());

    drop(manager);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let store = seeded_store(10);

    let system = start(store.clone()).await;
    let mut manager = system.session_manager(Arc::new(JsonFileSessionStore::new(&path)));
    let session = manager.login(KEEPER_EMAIL).await.unwrap();
    manager.set_credentials("key-123", "sheet-abc").await.unwrap();
    drop(manager);
    system.shutdown().await.unwrap();

    let system = start(store).await;
    let sessions = Arc::new(JsonFileSessionStore::new(&path));
    let mut manager = system.session_manager(sessions.clone());
    let restored = manager.bootstrap().await.unwrap().expect("remembered session");
    assert_eq!(restored, session);
    assert_eq!(sessions.get(API_KEY_KEY).await.unwrap().as_deref(), Some("key-123"));

    drop(manager);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unreadable_remembered_user_is_discarded() {
    let system = start(seeded_store(10)).await;
    let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    sessions.set(USER_TOKEN_KEY, "t").await.unwrap();
    sessions.set(USER_KEY, "{not json").await.unwrap();

    let mut manager = system.session_manager(sessions.clone());
    assert_eq!(manager.bootstrap().await.unwrap(), None);
    assert_eq!(sessions.get(USER_TOKEN_KEY).await.unwrap(), None);
    assert!(manager.set_credentials("", "x").await.is_err());

    drop(manager);
    system.shutdown().await.unwrap();
}
