//! Events flowing through the dispatcher while a connection cycle is live.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of event a listener can register for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Raw broker publish.
    MqttPublish,
    /// Periodic tick for polling adapters.
    Timer,
}

/// Raw message from the hub's broker.
///
/// The broker transport itself lives outside this crate; adapters receive
/// the message as-is and decode their own topics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MqttMessage {
    /// Topic the message was published on.
    pub topic: String,
    /// Raw payload bytes.
    pub payload: Vec<u8>,
}

impl MqttMessage {
    /// Create a new message.
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

/// One event dispatched to registered listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayEvent {
    /// Raw broker publish.
    MqttPublish(MqttMessage),
    /// Periodic tick.
    Timer(DateTime<Utc>),
}

impl GatewayEvent {
    /// Kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::MqttPublish(_) => EventKind::MqttPublish,
            Self::Timer(_) => EventKind::Timer,
        }
    }

    /// Timer tick carrying the current time.
    pub fn timer_now() -> Self {
        Self::Timer(Utc::now())
    }
}
