//! Generic single-writer actor framework.
//!
//! This module provides the building blocks used to serialize every mutation of the
//! inventory through one task.
//!
//! # Main Components
//!
//! - [`CommandHandler`] - Trait implemented by whatever processes the commands
//! - [`SerialActor`] - Generic actor that drives a handler one command at a time
//! - [`ActorClient`] - Cloneable, type-safe sender used by the rest of the crate
//! - [`FrameworkError`] - Channel failures
//!
//! # Testing
//!
//! See [`mock`] for utilities to test client wrappers without spawning a real handler.

pub mod actor;
pub mod client;
pub mod error;
pub mod handler;
pub mod message;
pub mod mock;

pub use actor::SerialActor;
pub use client::ActorClient;
pub use error::FrameworkError;
pub use handler::CommandHandler;
pub use message::{Request, Response};
