//! Infrastructure event bus implementations.
//!
//! The publish/subscribe abstraction lives in `microshop-events` as pure
//! mechanics. This module provides broker-backed publishers.

#[cfg(feature = "redis")]
pub mod redis_pubsub;

#[cfg(feature = "redis")]
pub use redis_pubsub::{DEFAULT_REDIS_TIMEOUT, RedisBusError, RedisPubSubPublisher};
