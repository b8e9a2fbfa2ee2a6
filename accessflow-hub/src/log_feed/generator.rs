//! Synthetic live access feed
//!
//! Stands in for device push notifications: one fabricated event per tick
//! from the default device (Main Entrance, Downtown HQ).

use std::time::Duration;

use accessflow_common::events::{AccessFlowEvent, EventBus};
use accessflow_common::models::{AccessEvent, AccessOutcome, AuthMethod};
use accessflow_common::time;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::buffer::SharedLogBuffer;

/// Default time between synthetic events
pub const DEFAULT_FEED_INTERVAL: Duration = Duration::from_secs(8);

const DEFAULT_USER_ID: &str = "u1";
const DEFAULT_DEVICE_ID: &str = "d1";
const DEFAULT_DEVICE_NAME: &str = "Main Entrance";
const DEFAULT_BRANCH_ID: &str = "b1";

/// Build one synthetic event from two uniform draws in [0, 1)
///
/// `name_draw > 0.7` picks "John Doe" (30%), otherwise "Visitor 102".
/// `outcome_draw > 0.9` picks Denied (10%), otherwise Granted.
pub fn synthesize(
    id: String,
    timestamp: DateTime<Utc>,
    name_draw: f64,
    outcome_draw: f64,
) -> AccessEvent {
    let user_name = if name_draw > 0.7 { "John Doe" } else { "Visitor 102" };
    let event = if outcome_draw > 0.9 {
        AccessOutcome::Denied
    } else {
        AccessOutcome::Granted
    };

    AccessEvent {
        id,
        timestamp,
        user_id: DEFAULT_USER_ID.to_string(),
        user_name: user_name.to_string(),
        device_id: DEFAULT_DEVICE_ID.to_string(),
        device_name: DEFAULT_DEVICE_NAME.to_string(),
        branch_id: DEFAULT_BRANCH_ID.to_string(),
        event,
        method: AuthMethod::Face,
        image_url: None,
    }
}

/// Random source for synthetic events
pub struct SyntheticEventSource<R: Rng> {
    rng: R,
}

impl<R: Rng> SyntheticEventSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn next_event(&mut self, id: String, timestamp: DateTime<Utc>) -> AccessEvent {
        let name_draw: f64 = self.rng.gen();
        let outcome_draw: f64 = self.rng.gen();
        synthesize(id, timestamp, name_draw, outcome_draw)
    }
}

impl SyntheticEventSource<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

/// Periodic producer feeding the shared log buffer
#[derive(Clone)]
pub struct LogFeed {
    buffer: SharedLogBuffer,
    event_bus: EventBus,
    interval: Duration,
}

impl LogFeed {
    pub fn new(buffer: SharedLogBuffer, event_bus: EventBus, interval: Duration) -> Self {
        Self {
            buffer,
            event_bus,
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Generate and insert one event immediately
    pub async fn fire_once<R: Rng>(&self, source: &mut SyntheticEventSource<R>) -> AccessEvent {
        let mut buffer = self.buffer.write().await;
        self.insert(&mut buffer, source)
    }

    fn insert<R: Rng>(
        &self,
        buffer: &mut super::buffer::AccessLogBuffer,
        source: &mut SyntheticEventSource<R>,
    ) -> AccessEvent {
        let event = source.next_event(buffer.allocate_id(), time::now());
        if let Some(evicted) = buffer.push(event.clone()) {
            debug!(evicted = %evicted.id, "Access log at capacity, evicted oldest entry");
        }
        let buffered = buffer.len();

        debug!(
            id = %event.id,
            outcome = ?event.event,
            user = %event.user_name,
            "Synthetic access event recorded"
        );
        self.event_bus.emit_lossy(AccessFlowEvent::AccessEventRecorded {
            event: event.clone(),
            buffered,
        });
        event
    }

    /// Start the feed with an entropy-seeded random source
    pub fn spawn(self) -> FeedHandle {
        self.spawn_with_source(SyntheticEventSource::from_entropy())
    }

    /// Start the feed with the given random source
    ///
    /// The first event arrives one interval after the call. The returned
    /// handle stops the feed when cancelled or dropped.
    pub fn spawn_with_source<R>(self, mut source: SyntheticEventSource<R>) -> FeedHandle
    where
        R: Rng + Send + 'static,
    {
        let token = CancellationToken::new();
        let task_token = token.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(interval_ms = self.interval.as_millis() as u64, "Live access feed started");

            loop {
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let mut buffer = self.buffer.write().await;
                // Cancellation may have landed while waiting for the lock
                if task_token.is_cancelled() {
                    break;
                }
                self.insert(&mut buffer, &mut source);
            }

            info!("Live access feed stopped");
        });

        FeedHandle {
            token,
            task: Some(task),
        }
    }
}

/// Ownership of a running feed
///
/// Dropping the handle cancels the feed; `shutdown` also waits for the task
/// to finish.
pub struct FeedHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl FeedHandle {
    /// Request cancellation; no buffer mutation happens after this returns
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancel and wait for the task to exit
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Live access feed task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
