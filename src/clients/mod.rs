//! Type-safe wrappers around [`ActorClient`](crate::framework::ActorClient).

pub mod inventory_client;

pub use inventory_client::InventoryClient;
