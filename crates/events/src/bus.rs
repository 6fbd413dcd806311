//! Event publishing/subscription abstraction (mechanics only).
//!
//! Publishing is split from subscribing: the order orchestrator only needs the
//! narrow [`Publisher`] capability, while tests and in-process consumers use the
//! full [`EventBus`].
//!
//! Delivery is **at-least-once** and fire-and-forget: a successful `publish`
//! means the transport accepted the message, not that any consumer processed
//! it. Consumers must tolerate duplicates. No ordering is guaranteed across
//! publishers.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to a single topic.
///
/// ```ignore
/// let sub = bus.subscribe("notificationTopic");
/// loop {
///     match sub.recv_timeout(Duration::from_secs(1)) {
///         Ok(envelope) => notify(envelope)?,
///         Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
///         Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
///     }
/// }
/// ```
///
/// Subscriptions are meant for single-threaded consumption.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain everything currently buffered without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Narrow publish capability: hand a message to a named topic.
///
/// `publish()` can fail (bus closed, broker unreachable). Failures are returned
/// to the caller; the publisher never retries on its own.
pub trait Publisher<M>: Send + Sync {
    type Error: core::fmt::Debug + core::fmt::Display + Send + Sync + 'static;

    fn publish(&self, topic: &str, message: M) -> Result<(), Self::Error>;
}

/// Publisher that can also hand out topic subscriptions (broadcast semantics:
/// every subscriber of a topic gets a copy of each message).
pub trait EventBus<M>: Publisher<M> {
    fn subscribe(&self, topic: &str) -> Subscription<M>;
}

impl<M, P> Publisher<M> for Arc<P>
where
    P: Publisher<M> + ?Sized,
{
    type Error = P::Error;

    fn publish(&self, topic: &str, message: M) -> Result<(), Self::Error> {
        (**self).publish(topic, message)
    }
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    fn subscribe(&self, topic: &str) -> Subscription<M> {
        (**self).subscribe(topic)
    }
}
