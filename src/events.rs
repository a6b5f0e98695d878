//! Domain event types and publishing.
//!
//! The engine consumes child lifecycle events from the surrounding
//! system and publishes schedule status changes back out. Payloads are
//! carried as JSON inside an envelope; the tenant travels on the
//! envelope, never inside the payload, so handlers receive it as an
//! explicit parameter.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// Topic for [`ChildScheduleStatusChanged`] events.
pub const TOPIC_CHILD_SCHEDULE_STATUS: &str = "child.schedule_status_changed";

/// A child lifecycle event received from the surrounding system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChildLifecycleEvent {
    /// A child was created.
    Added {
        /// Unique identifier for the child
        child_id: Uuid,
        /// Child's given name
        given_name: String,
        /// Child's family name
        family_name: String,
        /// Child's date of birth
        date_of_birth: NaiveDate,
    },
    /// A child's details were changed.
    Updated {
        /// Unique identifier for the child
        child_id: Uuid,
        /// Child's given name
        given_name: String,
        /// Child's family name
        family_name: String,
        /// Child's date of birth
        date_of_birth: NaiveDate,
    },
    /// A child was removed.
    Deleted {
        /// Unique identifier for the child
        child_id: Uuid,
    },
}

impl ChildLifecycleEvent {
    /// Returns the id of the child the event concerns.
    pub fn child_id(&self) -> Uuid {
        match self {
            Self::Added { child_id, .. }
            | Self::Updated { child_id, .. }
            | Self::Deleted { child_id } => *child_id,
        }
    }
}

/// Published whenever the periodic status sync determines a child's
/// current active/inactive status from its schedules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChildScheduleStatusChanged {
    /// Unique identifier for the child
    pub child_id: Uuid,
    /// Whether the child has a schedule active today
    pub is_active: bool,
    /// Last date the child is scheduled to attend, if every schedule ends
    pub last_active_date: Option<NaiveDate>,
}

/// Transport wrapper around an event payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventEnvelope {
    /// Tenant the event belongs to
    pub tenant_id: Uuid,
    /// Topic the event is published on
    pub topic: String,
    /// Encoded event payload
    pub payload: serde_json::Value,
    /// When the envelope was created
    pub published_at: DateTime<Utc>,
    /// Correlates the event with the work that produced it
    pub correlation_id: Uuid,
}

impl EventEnvelope {
    /// Wraps a payload in an envelope for the given tenant and topic.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EventEncodingError`] if the payload cannot
    /// be encoded as JSON.
    pub fn new<T: Serialize>(tenant: Uuid, topic: &str, payload: &T) -> EngineResult<Self> {
        let payload =
            serde_json::to_value(payload).map_err(|source| EngineError::EventEncodingError {
                message: source.to_string(),
            })?;
        Ok(Self {
            tenant_id: tenant,
            topic: topic.to_string(),
            payload,
            published_at: Utc::now(),
            correlation_id: Uuid::new_v4(),
        })
    }

    /// Decodes the payload back into a typed event.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EventDecodingError`] if the payload does
    /// not match the expected shape.
    pub fn decode<T: DeserializeOwned>(&self) -> EngineResult<T> {
        serde_json::from_value(self.payload.clone()).map_err(|source| {
            EngineError::EventDecodingError {
                topic: self.topic.clone(),
                message: source.to_string(),
            }
        })
    }
}

/// Outbound event publishing boundary.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes one envelope.
    async fn publish(&self, envelope: EventEnvelope) -> EngineResult<()>;
}

/// Publisher that records envelopes in memory, for tests and local runs.
#[derive(Debug, Default)]
pub struct InMemoryEventPublisher {
    published: Mutex<Vec<EventEnvelope>>,
}

impl InMemoryEventPublisher {
    /// Creates an empty publisher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every envelope published so far.
    pub async fn published(&self) -> Vec<EventEnvelope> {
        self.published.lock().await.clone()
    }

    /// Returns the envelopes published on one topic.
    pub async fn published_on(&self, topic: &str) -> Vec<EventEnvelope> {
        self.published
            .lock()
            .await
            .iter()
            .filter(|envelope| envelope.topic == topic)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, envelope: EventEnvelope) -> EngineResult<()> {
        self.published.lock().await.push(envelope);
        Ok(())
    }
}
