//! # Framework Errors
//!
//! Errors raised by the actor plumbing itself, independent of what the handler does.
//! Handler error types absorb these through `From<FrameworkError>` so clients see one
//! error type per actor.

/// Errors that can occur within the actor framework itself.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    /// The handler answered a command with a reply meant for another command.
    #[error("Unexpected reply: {0}")]
    UnexpectedReply(String),
    /// The actor task panicked or was cancelled.
    #[error("Actor task failed: {0}")]
    TaskFailed(String),
}
