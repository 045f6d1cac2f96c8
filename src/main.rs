//! Loads configuration, syncs once with the spreadsheet and logs the dashboard.

use medstock::config::InventoryConfig;
use medstock::lifecycle::{setup_tracing, InventorySystem};
use medstock::session::{stored_credentials, JsonFileSessionStore, MemorySessionStore, SessionStore};
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = InventoryConfig::load()?;
    let sessions: Arc<dyn SessionStore> = match &config.session_path {
        Some(path) => Arc::new(JsonFileSessionStore::new(path)),
        None => Arc::new(MemorySessionStore::new()),
    };
    let (api_key, sheet_id) = stored_credentials(sessions.as_ref()).await?;
    let config = config.with_session_credentials(api_key, sheet_id);
    if !config.sheets.has_credentials() {
        warn!("No spreadsheet credentials configured; set MEDSTOCK__SHEETS__API_KEY and MEDSTOCK__SHEETS__SHEET_ID");
    }

    let system = InventorySystem::from_config(&config)?;

    let mut session = system.session_manager(sessions);
    match session.bootstrap().await? {
        Some(current) => info!(user = %current.user.email, "Session restored"),
        None => info!("No remembered session"),
    }
    drop(session);

    match system.refresh_all_data().await {
        Ok(snapshot) => info!(
            version = snapshot.version,
            medicines = snapshot.medicines.len(),
            stores = snapshot.stores.len(),
            "Synced"
        ),
        Err(e) => error!(error = %e, "Sync failed"),
    }

    let stats = system.get_dashboard_stats();
    info!(
        total = stats.total_medicines,
        low_stock = stats.low_stock_count,
        expired = stats.expired_count,
        expiring = stats.expiring_count,
        transactions = stats.total_transactions,
        "Dashboard"
    );

    system.shutdown().await?;
    Ok(())
}
