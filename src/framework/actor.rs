//! # Serial Actor
//!
//! The "server" half of the framework. A `SerialActor` owns a [`CommandHandler`] and the
//! receiving end of a bounded channel, and processes requests strictly in arrival order.

use crate::framework::client::ActorClient;
use crate::framework::handler::CommandHandler;
use crate::framework::message::Request;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that serializes every command sent to one handler.
///
/// **Concurrency Model**:
/// Each actor runs in its own Tokio task and awaits one command to completion before it
/// receives the next. The handler's own state needs no `Mutex`, and the remote operations a
/// command performs never interleave with those of another command on the same actor.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `SerialActor::new()` to get the `actor` (server) and `client` (interface).
/// 2.  **Wire**: Pass dependencies into `actor.run(context)`.
/// 3.  **Run**: Spawn the run loop in a background task.
///
/// ```rust,ignore
/// let (actor, client) = SerialActor::new(32, InventoryHandler::default());
/// let handle = tokio::spawn(actor.run(context));
/// let reply = client.request(InventoryCommand::Refresh).await?;
/// ```
pub struct SerialActor<H: CommandHandler> {
    receiver: mpsc::Receiver<Request<H>>,
    handler: H,
}

impl<H: CommandHandler> SerialActor<H> {
    /// Creates a new `SerialActor` and its associated [`ActorClient`].
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the MPSC channel. If the channel is full,
    ///   calls to the client wait until there is space.
    /// * `handler` - The handler that processes each command.
    pub fn new(buffer_size: usize, handler: H) -> (Self, ActorClient<H>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self { receiver, handler };
        (actor, ActorClient::new(sender))
    }

    /// Runs the actor's event loop, processing commands until every client is dropped.
    ///
    /// # Context Injection
    /// The `context` argument is handed to the handler with every command. This allows
    /// the handler to use dependencies that were created *after* the actor was
    /// instantiated but *before* the loop started.
    pub async fn run(mut self, context: H::Context) {
        // Extract just the type name (e.g., "InventoryHandler" instead of the full path)
        let handler = std::any::type_name::<H>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(handler, "Actor started");

        self.handler.on_start(&context).await;

        let mut processed: u64 = 0;
        while let Some(Request {
            command,
            respond_to,
        }) = self.receiver.recv().await
        {
            debug!(handler, ?command, "Command");
            let result = self.handler.handle(command, &context).await;
            match &result {
                Ok(_) => debug!(handler, "Command ok"),
                Err(e) => warn!(handler, error = %e, "Command failed"),
            }
            processed += 1;
            if respond_to.send(result).is_err() {
                // The caller gave up waiting; the command has still been applied.
                warn!(handler, "Reply receiver dropped");
            }
        }

        info!(handler, processed, "Shutdown");
    }
}
