//! # Generic Messages
//!
//! The envelope sent from an [`ActorClient`](crate::framework::ActorClient) to a
//! [`SerialActor`](crate::framework::SerialActor).

use crate::framework::handler::CommandHandler;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<H> = oneshot::Sender<
    Result<<H as CommandHandler>::Reply, <H as CommandHandler>::Error>,
>;

/// One command plus the channel its reply goes back on.
///
/// Unlike a CRUD message set, the command vocabulary belongs to the handler
/// ([`CommandHandler::Command`]), so the framework only needs this single envelope.
#[derive(Debug)]
pub struct Request<H: CommandHandler> {
    pub command: H::Command,
    pub respond_to: Response<H>,
}
