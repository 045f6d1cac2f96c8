//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing_subscriber::fmt` subscriber filtered by
//! `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Actor Lifecycle**: `Actor started`, `Shutdown` with the number of processed commands
//! - **Mutations**: `Stock set`, `Medicine added`, `Transfer logged`, `Audit recorded`
//! - **Rejections**: `Transfer rejected`, `Command failed` with the error
//! - **Sync**: `Snapshot refreshed` / `Refresh failed, keeping previous snapshot`
//!
//! ## Usage
//!
//! ```bash
//! # Committed mutations only
//! RUST_LOG=info cargo run
//!
//! # Commands, payloads and state transitions
//! RUST_LOG=debug cargo run
//!
//! # Only the ledger
//! RUST_LOG=medstock::ledger=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a transfer reads:
//!
//! ```text
//! INFO execute: Stock set medicine_id="m1" location=main from=100 to=90
//! INFO execute: Stock set medicine_id="m1" location=s1 from=0 to=10
//! INFO execute: Audit recorded kind=stock_transfer id="…"
//! INFO execute: Transfer logged transfer_id="…" source_remaining=90 destination_total=10
//! ```

/// Installs the global subscriber. Later calls are no-ops, so tests may call it freely.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // module paths add noise; spans carry the context
        .compact()
        .try_init();
}
