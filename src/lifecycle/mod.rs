//! System wiring and observability setup.

pub mod inventory_system;
pub mod tracing;

pub use inventory_system::InventorySystem;
pub use self::tracing::setup_tracing;
