//! # Mock Framework & Testing Guide
//!
//! `MockClient<H>` hands out a real [`ActorClient<H>`] whose requests are answered from a
//! queue of expectations instead of by a handler. It lets you test the code *around* a
//! client (reply mapping, error propagation, callers such as the session manager) without
//! wiring a remote store.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **Speed** | Instant (in-memory) | Fast (spawns the handler) |
//! | **State** | No real state (expectations) | Real ledger over a row store |
//! | **Use Case** | Unit testing logic *around* the client | Testing the handler or full system |
//! | **Error Injection** | Easy (`return_err`) | Needs a failing row store |
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut mock = MockClient::<InventoryHandler>::new();
//! mock.expect_command().return_ok(InventoryReply::Logged(entry));
//!
//! let client = InventoryClient::new(mock.client());
//! client.log_transaction(draft).await?;
//! mock.verify(); // Ensures all expectations were met
//! ```
//!
//! Use [`create_mock_client`] plus [`expect_request`] instead when the test needs to
//! inspect the command that was sent.

use crate::framework::client::ActorClient;
use crate::framework::handler::CommandHandler;
use crate::framework::message::Request;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

type Expectations<H> = Arc<
    Mutex<VecDeque<Result<<H as CommandHandler>::Reply, <H as CommandHandler>::Error>>>,
>;

/// A mock client with expectation tracking for fluent testing.
pub struct MockClient<H: CommandHandler> {
    client: ActorClient<H>,
    expectations: Expectations<H>,
    received: Arc<Mutex<Vec<H::Command>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<H: CommandHandler> Default for MockClient<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: CommandHandler> MockClient<H> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<Request<H>>(100);
        let expectations: Expectations<H> = Arc::new(Mutex::new(VecDeque::new()));
        let received = Arc::new(Mutex::new(Vec::new()));
        let expectations_clone = expectations.clone();
        let received_clone = received.clone();

        // Spawn background task to answer requests
        let handle = tokio::spawn(async move {
            while let Some(Request {
                command,
                respond_to,
            }) = receiver.recv().await
            {
                let next = expectations_clone
                    .lock()
                    .expect("mock expectations poisoned")
                    .pop_front();
                received_clone
                    .lock()
                    .expect("mock history poisoned")
                    .push(command);
                match next {
                    Some(response) => {
                        let _ = respond_to.send(response);
                    }
                    None => panic!("Unexpected request: no expectation queued"),
                }
            }
        });

        Self {
            client: ActorClient::new(sender),
            expectations,
            received,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ActorClient<H> {
        self.client.clone()
    }

    /// Expects one more command, answered in FIFO order.
    pub fn expect_command(&mut self) -> CommandExpectationBuilder<H> {
        CommandExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Number of commands received so far.
    pub fn received_count(&self) -> usize {
        self.received.lock().expect("mock history poisoned").len()
    }

    /// Inspect the commands received so far, in order.
    pub fn with_received<R>(&self, f: impl FnOnce(&[H::Command]) -> R) -> R {
        let received = self.received.lock().expect("mock history poisoned");
        f(&received)
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().expect("mock expectations poisoned");
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

/// Builder for one queued reply.
pub struct CommandExpectationBuilder<H: CommandHandler> {
    expectations: Expectations<H>,
}

impl<H: CommandHandler> CommandExpectationBuilder<H> {
    /// Sets the expectation to return a successful reply.
    pub fn return_ok(self, reply: H::Reply) {
        self.expectations
            .lock()
            .expect("mock expectations poisoned")
            .push_back(Ok(reply));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: H::Error) {
        self.expectations
            .lock()
            .expect("mock expectations poisoned")
            .push_back(Err(error));
    }
}

/// Creates a client and the raw receiver its requests arrive on.
///
/// The test plays the actor: it pulls requests with [`expect_request`], asserts on the
/// command, and answers through the returned responder.
pub fn create_mock_client<H: CommandHandler>(
    buffer_size: usize,
) -> (ActorClient<H>, mpsc::Receiver<Request<H>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ActorClient::new(sender), receiver)
}

/// Helper to pull the next request off a mock receiver.
pub async fn expect_request<H: CommandHandler>(
    receiver: &mut mpsc::Receiver<Request<H>>,
) -> Option<(H::Command, oneshot::Sender<Result<H::Reply, H::Error>>)> {
    receiver
        .recv()
        .await
        .map(|request| (request.command, request.respond_to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::{FrameworkError, SerialActor};
    use async_trait::async_trait;

    #[derive(Debug)]
    enum CounterCommand {
        Add(u32),
        Get,
    }

    #[derive(Debug, thiserror::Error)]
    enum CounterError {
        #[error("overflow")]
        Overflow,
        #[error(transparent)]
        Framework(#[from] FrameworkError),
    }

    #[derive(Default)]
    struct Counter {
        total: u32,
    }

    #[async_trait]
    impl CommandHandler for Counter {
        type Command = CounterCommand;
        type Reply = u32;
        type Context = u32;
        type Error = CounterError;

        async fn handle(&mut self, command: CounterCommand, limit: &u32) -> Result<u32, CounterError> {
            match command {
                CounterCommand::Add(n) => {
                    let next = self.total + n;
                    if next > *limit {
                        return Err(CounterError::Overflow);
                    }
                    self.total = next;
                    Ok(self.total)
                }
                CounterCommand::Get => Ok(self.total),
            }
        }
    }

    #[tokio::test]
    async fn test_serial_actor_applies_commands_in_order() {
        let (actor, client) = SerialActor::new(8, Counter::default());
        let handle = tokio::spawn(actor.run(10));

        assert_eq!(client.request(CounterCommand::Add(4)).await.unwrap(), 4);
        assert_eq!(client.request(CounterCommand::Add(5)).await.unwrap(), 9);
        assert!(matches!(
            client.request(CounterCommand::Add(5)).await,
            Err(CounterError::Overflow)
        ));
        assert_eq!(client.request(CounterCommand::Get).await.unwrap(), 9);

        drop(client);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_senders_are_serialized() {
        let (actor, client) = SerialActor::new(4, Counter::default());
        let handle = tokio::spawn(actor.run(1_000));

        let mut tasks = Vec::new();
        for _ in 0..20 {
            let client = client.clone();
            tasks.push(tokio::spawn(async move {
                client.request(CounterCommand::Add(3)).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert_eq!(client.request(CounterCommand::Get).await.unwrap(), 60);

        drop(client);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_actor_reports_framework_error() {
        let (actor, client) = SerialActor::new(1, Counter::default());
        assert!(!client.is_closed());
        drop(actor);
        assert!(client.is_closed());
        let result = client.request(CounterCommand::Get).await;
        assert!(matches!(
            result,
            Err(CounterError::Framework(FrameworkError::ActorClosed))
        ));
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<Counter>::new();
        mock.expect_command().return_ok(7);
        mock.expect_command().return_err(CounterError::Overflow);

        let client = mock.client();
        assert_eq!(client.request(CounterCommand::Get).await.unwrap(), 7);
        assert!(client.request(CounterCommand::Add(1)).await.is_err());

        mock.verify();
        assert_eq!(mock.received_count(), 2);
        mock.with_received(|commands| {
            assert!(matches!(commands[1], CounterCommand::Add(1)));
        });
    }

    #[tokio::test]
    async fn test_raw_mock_client() {
        let (client, mut receiver) = create_mock_client::<Counter>(4);
        let task = tokio::spawn(async move { client.request(CounterCommand::Add(2)).await });

        let (command, responder) = expect_request(&mut receiver)
            .await
            .expect("Expected a request");
        assert!(matches!(command, CounterCommand::Add(2)));
        responder.send(Ok(2)).unwrap();

        assert_eq!(task.await.unwrap().unwrap(), 2);
    }
}
