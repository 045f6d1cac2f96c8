//! # medstock
//!
//! > **A stock ledger and transfer engine for medicine inventories kept in a spreadsheet.**
//!
//! The system of record is a spreadsheet-shaped remote store that can only fetch and
//! overwrite rectangles of cells: no transactions, no row locks, no atomic increment. This
//! crate keeps per-location medicine quantities on top of it, moves stock between the main
//! store and sub-stores, and writes one audit record for every mutation.
//!
//! ## 🏗️ Design
//!
//! ### Single writer
//! Every mutation is a command sent to one [`SerialActor`](framework::SerialActor). It
//! processes commands one at a time, so the read-then-write sequences of one process
//! never interleave.
//!
//! ### Guarded writes
//! Other processes may write the same sheet. Stock rows are only overwritten if they still
//! hold what was read (their `lastUpdated` cell changes on every write), and new stock rows
//! are only appended if none appeared meanwhile. Conflicts are retried a bounded number of
//! times. See [`ledger`].
//!
//! ### Honest failures
//! A transfer is two writes. If the credit fails after the debit, the caller gets
//! [`InventoryError::PartialTransfer`]; if a mutation lands but its audit record does not,
//! [`InventoryError::AuditWriteFailed`]. Neither is retried or compensated.
//!
//! ### Snapshots
//! Reads for display come from an immutable, version-stamped [`InventorySnapshot`]
//! published through a `watch` channel and replaced only when all five tables loaded.
//!
//! ## 🗺️ Module Tour
//!
//! - [`store`]: the remote row store ([`SheetsClient`](store::SheetsClient) over HTTP,
//!   [`MemoryRowStore`](store::MemoryRowStore) for tests)
//! - [`codec`]: fixed column layouts, tolerant decoding
//! - [`repository`]: list / find / append / replace per table
//! - [`ledger`], [`audit`]: quantities per location, the append-only log
//! - [`transfer`], [`catalog`]: the mutating operations
//! - [`dashboard`], [`snapshot`]: read-side rollups
//! - [`framework`], [`inventory_actor`], [`clients`], [`lifecycle`]: the actor plumbing
//! - [`session`], [`config`]: collaborators
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! MEDSTOCK__SHEETS__API_KEY=... MEDSTOCK__SHEETS__SHEET_ID=... RUST_LOG=info cargo run
//! ```

pub mod audit;
pub mod catalog;
pub mod clients;
pub mod codec;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod framework;
pub mod inventory_actor;
pub mod ledger;
pub mod lifecycle;
pub mod model;
pub mod repository;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod transfer;

pub use error::InventoryError;
pub use lifecycle::InventorySystem;
pub use snapshot::InventorySnapshot;
