use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::event::Event;

/// Envelope for a published event, carrying delivery metadata.
///
/// Notes:
/// - `event_id` is unique per publication; consumers can use it to drop
///   duplicates (delivery is at-least-once).
/// - `payload` is the event body exactly as consumers see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    event_type: String,
    event_version: u32,
    published_at: DateTime<Utc>,
    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        event_type: impl Into<String>,
        event_version: u32,
        published_at: DateTime<Utc>,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            event_type: event_type.into(),
            event_version,
            published_at,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn event_version(&self) -> u32 {
        self.event_version
    }

    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

impl<E: Event> EventEnvelope<E> {
    /// Wrap an event with a fresh id and the current time.
    pub fn wrap(event: E) -> Self {
        Self::new(
            Uuid::now_v7(),
            event.event_type(),
            event.version(),
            Utc::now(),
            event,
        )
    }
}

impl<E: Serialize> EventEnvelope<E> {
    /// Convert the payload to JSON so the envelope can travel over a
    /// transport that is agnostic of the concrete event type.
    pub fn into_json(self) -> Result<EventEnvelope<JsonValue>, serde_json::Error> {
        let payload = serde_json::to_value(&self.payload)?;
        Ok(EventEnvelope {
            event_id: self.event_id,
            event_type: self.event_type,
            event_version: self.event_version,
            published_at: self.published_at,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Pinged {
        n: u32,
    }

    impl Event for Pinged {
        fn event_type(&self) -> &'static str {
            "test.pinged"
        }

        fn version(&self) -> u32 {
            2
        }
    }

    #[test]
    fn wrap_copies_type_and_version_from_event() {
        let env = EventEnvelope::wrap(Pinged { n: 7 });
        assert_eq!(env.event_type(), "test.pinged");
        assert_eq!(env.event_version(), 2);
        assert_eq!(env.payload(), &Pinged { n: 7 });
    }

    #[test]
    fn into_json_keeps_metadata() {
        let env = EventEnvelope::wrap(Pinged { n: 1 });
        let id = env.event_id();
        let json = env.into_json().unwrap();
        assert_eq!(json.event_id(), id);
        assert_eq!(json.payload()["n"], 1);
    }
}
