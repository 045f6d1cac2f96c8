//! # CommandHandler Trait
//!
//! The contract a handler implements to be driven by a [`SerialActor`](crate::framework::SerialActor).
//!
//! # Architecture Note
//! The actor owns the handler and feeds it one command at a time. Anything the handler
//! touches while processing a command (remote reads, the following remote writes) therefore
//! runs without interleaving with any other command sent through the same actor. This is
//! what turns a read-then-write sequence against a store with no locking into a
//! single-writer sequence, at least within one process.
//!
//! # Async & Context
//! This trait is `#[async_trait]` because handling a command awaits remote I/O. Like the
//! entity hooks it is modelled on, it receives a `Context` that is injected when the actor
//! is started (`run(context)`), not when it is constructed.

use crate::framework::FrameworkError;
use async_trait::async_trait;
use std::fmt::Debug;

#[async_trait]
pub trait CommandHandler: Send + 'static {
    /// Enum of the operations this handler accepts.
    type Command: Send + Debug;

    /// Enum of results; variants usually match the commands 1:1.
    type Reply: Send + Debug;

    /// Dependencies injected at `run()` time. Use `()` if none are needed.
    type Context: Send + Sync;

    /// The handler's error type. It must be able to carry framework failures
    /// (closed or dropped channels) so clients deal with a single error type.
    type Error: std::error::Error + From<FrameworkError> + Send + Sync + 'static;

    /// Called once before the first command is processed.
    async fn on_start(&mut self, _ctx: &Self::Context) {}

    /// Handle one command. Never called concurrently for the same actor.
    async fn handle(
        &mut self,
        command: Self::Command,
        ctx: &Self::Context,
    ) -> Result<Self::Reply, Self::Error>;
}
