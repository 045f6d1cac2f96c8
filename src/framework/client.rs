//! # Generic Client
//!
//! The cloneable sending half of a [`SerialActor`](crate::framework::SerialActor).

use crate::framework::handler::CommandHandler;
use crate::framework::message::Request;
use crate::framework::FrameworkError;
use tokio::sync::{mpsc, oneshot};

/// A type-safe client for sending commands to a `SerialActor`.
///
/// * **Cloneable** – holds only a sender, so cloning is inexpensive.
/// * **Async API** – [`request`](Self::request) resolves to the handler's reply or error.
pub struct ActorClient<H: CommandHandler> {
    sender: mpsc::Sender<Request<H>>,
}

// Manual impl: `H` itself does not need to be `Clone`.
impl<H: CommandHandler> Clone for ActorClient<H> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<H: CommandHandler> ActorClient<H> {
    pub fn new(sender: mpsc::Sender<Request<H>>) -> Self {
        Self { sender }
    }

    /// Sends one command and waits for its reply.
    pub async fn request(&self, command: H::Command) -> Result<H::Reply, H::Error> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(Request {
                command,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// True once the actor has stopped receiving.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
