//! Event types for the AccessFlow event system
//!
//! Provides shared event definitions and the EventBus used to fan out
//! live updates (new access events, enrollment progress, analysis results)
//! to SSE subscribers.

mod enrollment_types;

pub use enrollment_types::EnrollmentStage;

use crate::models::AccessEvent;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// AccessFlow event types
///
/// Events are broadcast via EventBus and serialized for SSE transmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AccessFlowEvent {
    /// A new access event entered the live log buffer
    ///
    /// Triggers:
    /// - SSE: Prepend row to the live access log
    AccessEventRecorded {
        /// The event as stored in the buffer
        event: AccessEvent,
        /// Buffer length after insertion
        buffered: usize,
    },

    /// Enrollment moved to a new stage
    ///
    /// Also emitted on reset (close), with `new_stage` = Capture.
    EnrollmentStageChanged {
        session_id: Uuid,
        old_stage: EnrollmentStage,
        new_stage: EnrollmentStage,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Template-generation progress tick
    EnrollmentProgress {
        session_id: Uuid,
        /// 0..=100
        progress_percent: u8,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Security analysis request dispatched
    AnalysisStarted {
        /// Number of log entries included in the prompt
        events_considered: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Security analysis finished (successfully or with a fallback message)
    AnalysisCompleted {
        report: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl AccessFlowEvent {
    /// Get event type as string for filtering
    pub fn event_type(&self) -> &str {
        match self {
            AccessFlowEvent::AccessEventRecorded { .. } => "AccessEventRecorded",
            AccessFlowEvent::EnrollmentStageChanged { .. } => "EnrollmentStageChanged",
            AccessFlowEvent::EnrollmentProgress { .. } => "EnrollmentProgress",
            AccessFlowEvent::AnalysisStarted { .. } => "AnalysisStarted",
            AccessFlowEvent::AnalysisCompleted { .. } => "AnalysisCompleted",
        }
    }
}

/// Central event distribution bus for application-wide events
///
/// Wraps a `tokio::sync::broadcast` channel: every subscriber receives every
/// event emitted after it subscribed; slow subscribers lag and lose the
/// oldest events rather than blocking emitters.
///
/// # Examples
///
/// ```
/// use accessflow_common::events::{AccessFlowEvent, EventBus};
///
/// let bus = EventBus::new(100);
/// let _rx = bus.subscribe();
///
/// bus.emit_lossy(AccessFlowEvent::AnalysisStarted {
///     events_considered: 20,
///     timestamp: chrono::Utc::now(),
/// });
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AccessFlowEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of events to buffer before lagging subscribers drop old events
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<AccessFlowEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists,
    /// `Err` if no one is listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: AccessFlowEvent,
    ) -> Result<usize, broadcast::error::SendError<AccessFlowEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// The state behind every AccessFlow event is also queryable over HTTP.
    pub fn emit_lossy(&self, event: AccessFlowEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
