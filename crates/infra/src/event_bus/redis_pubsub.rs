//! Redis pub/sub publisher (optional).
//!
//! Each topic maps to a Redis channel of the same name. Redis pub/sub is not
//! durable: messages published while no subscriber is connected are lost.
//!
//! One connection is kept and reused. Connecting, writing and reading are all
//! bounded by the configured timeout; a connection that failed is dropped and
//! re-opened on the next publish.

use std::sync::Mutex;
use std::time::Duration;

use redis::Commands;
use serde_json::Value as JsonValue;
use thiserror::Error;

use microshop_events::{EventEnvelope, Publisher};

pub const DEFAULT_REDIS_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum RedisBusError {
    #[error("redis error: {0}")]
    Redis(String),
    #[error("serialization error: {0}")]
    Serialize(String),
    #[error("redis connection lock poisoned")]
    Poisoned,
}

/// Publishes JSON event envelopes to Redis channels.
pub struct RedisPubSubPublisher {
    client: redis::Client,
    timeout: Duration,
    conn: Mutex<Option<redis::Connection>>,
}

impl std::fmt::Debug for RedisPubSubPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisPubSubPublisher")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl RedisPubSubPublisher {
    /// Opens no connection yet; the first publish connects.
    pub fn new(redis_url: impl AsRef<str>, timeout: Duration) -> Result<Self, RedisBusError> {
        let client = redis::Client::open(redis_url.as_ref())
            .map_err(|e| RedisBusError::Redis(e.to_string()))?;
        Ok(Self {
            client,
            timeout,
            conn: Mutex::new(None),
        })
    }

    fn connect(&self) -> Result<redis::Connection, RedisBusError> {
        let redis_err = |e: redis::RedisError| RedisBusError::Redis(e.to_string());

        let conn = self
            .client
            .get_connection_with_timeout(self.timeout)
            .map_err(redis_err)?;
        conn.set_write_timeout(Some(self.timeout)).map_err(redis_err)?;
        conn.set_read_timeout(Some(self.timeout)).map_err(redis_err)?;
        Ok(conn)
    }
}

impl Publisher<EventEnvelope<JsonValue>> for RedisPubSubPublisher {
    type Error = RedisBusError;

    fn publish(&self, topic: &str, message: EventEnvelope<JsonValue>) -> Result<(), Self::Error> {
        let payload = serde_json::to_string(&message)
            .map_err(|e| RedisBusError::Serialize(e.to_string()))?;

        let mut guard = self.conn.lock().map_err(|_| RedisBusError::Poisoned)?;
        let mut conn = match guard.take() {
            Some(conn) => conn,
            None => self.connect()?,
        };

        // A connection is only put back after a successful round trip.
        let receivers: i64 = conn
            .publish(topic, payload)
            .map_err(|e| RedisBusError::Redis(e.to_string()))?;
        *guard = Some(conn);

        tracing::debug!(topic, receivers, "published to redis channel");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use microshop_core::OrderId;
    use microshop_orders::OrderPlacedEvent;

    fn envelope() -> EventEnvelope<JsonValue> {
        EventEnvelope::wrap(OrderPlacedEvent { order_id: OrderId::new() })
            .into_json()
            .unwrap()
    }

    #[test]
    fn unreachable_broker_fails_within_the_timeout() {
        // Non-routable address: connecting would otherwise hang for the OS timeout.
        let bus = RedisPubSubPublisher::new("redis://10.255.255.1:6379", Duration::from_millis(200)).unwrap();

        let started = Instant::now();
        let err = bus.publish("notificationTopic", envelope()).unwrap_err();

        assert!(matches!(err, RedisBusError::Redis(_)), "{err:?}");
        assert!(started.elapsed() < Duration::from_secs(3), "took {:?}", started.elapsed());
        assert!(bus.conn.lock().unwrap().is_none());
    }

    #[test]
    fn invalid_url_is_rejected_up_front() {
        assert!(RedisPubSubPublisher::new("not a url", DEFAULT_REDIS_TIMEOUT).is_err());
    }
}
