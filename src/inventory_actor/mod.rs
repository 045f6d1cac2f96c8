//! The single writer in front of the remote store.
//!
//! Every mutation (transfers, direct stock updates, catalog edits, audit records) and
//! every snapshot refresh goes through one [`SerialActor`], so the read-then-write
//! sequences they issue never interleave within this process. Cross-process races are
//! caught by the guarded writes in [`crate::ledger`].

pub mod command;
pub mod handler;

pub use command::{InventoryCommand, InventoryReply};
pub use handler::{InventoryContext, InventoryHandler};

use crate::clients::InventoryClient;
use crate::framework::SerialActor;

/// Creates the inventory actor and its client. Start it with `actor.run(context)`.
pub fn new(buffer_size: usize, handler: InventoryHandler) -> (SerialActor<InventoryHandler>, InventoryClient) {
    let (actor, client) = SerialActor::new(buffer_size, handler);
    (actor, InventoryClient::new(client))
}
