use tokio::sync::oneshot;

use crate::services::pulse::{PulseError, backend::PulseConnection};

/// What an executed operation meant for the connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Completed,
    ConnectionLost,
}

/// Hands a finished operation's result to its caller
pub(crate) type Completion = Box<dyn FnOnce() + Send>;

/// Type-erased operation
pub(crate) type Operation =
    Box<dyn FnOnce(&mut dyn PulseConnection) -> (Outcome, Completion) + Send>;

/// Work items on the worker queue
pub(crate) enum Request {
    /// Run an operation against the connection
    Call(Operation),
    /// Re-synchronize now and signal once the snapshot is published
    Synchronize(oneshot::Sender<()>),
    /// Stop the worker; nothing queued behind it runs
    Shutdown,
}

impl Request {
    /// Wrap a typed operation, returning the request and the receiver of its result
    pub(crate) fn call<T, F>(operation: F) -> (Self, oneshot::Receiver<Result<T, PulseError>>)
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn PulseConnection) -> Result<T, PulseError> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let erased: Operation = Box::new(move |connection| {
            let result = operation(connection);
            let outcome = match &result {
                Err(e) if e.is_connection_loss() => Outcome::ConnectionLost,
                _ => Outcome::Completed,
            };
            let completion: Completion = Box::new(move || {
                let _ = tx.send(result);
            });
            (outcome, completion)
        });
        (Self::Call(erased), rx)
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call(_) => f.write_str("Call"),
            Self::Synchronize(_) => f.write_str("Synchronize"),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}
