//! Enrollment engine: session ownership plus the progress timer task

use std::sync::Arc;
use std::time::Duration;

use accessflow_common::config::EnrollmentSettings;
use accessflow_common::events::{AccessFlowEvent, EnrollmentStage, EventBus};
use accessflow_common::time::millis_to_duration;
use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use super::{EnrollmentCommand, EnrollmentSession, PLACEHOLDER_SAMPLE_REF};

/// Template-generation pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrollmentTiming {
    /// Wall-clock time between progress steps
    pub tick: Duration,
    /// Percentage points added per step (at least 1)
    pub step_percent: u8,
}

impl Default for EnrollmentTiming {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(300),
            step_percent: 10,
        }
    }
}

impl From<&EnrollmentSettings> for EnrollmentTiming {
    fn from(settings: &EnrollmentSettings) -> Self {
        Self {
            tick: millis_to_duration(settings.tick_ms.max(1)),
            step_percent: settings.step_percent.clamp(1, 100),
        }
    }
}

/// What the presentation layer needs to render the wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrollmentSnapshot {
    pub session_id: Uuid,
    pub open: bool,
    pub stage: EnrollmentStage,
    /// One-based wizard step
    pub step: u8,
    pub captured_image_ref: Option<String>,
    pub has_sample: bool,
    pub progress_percent: u8,
}

/// Result of an engine operation
///
/// `applied == false` means the operation was not valid in the current stage,
/// or the workflow is closed, and nothing changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionOutcome {
    pub applied: bool,
    pub snapshot: EnrollmentSnapshot,
}

struct EngineState {
    open: bool,
    session: EnrollmentSession,
    /// Token for the running progress task, if any
    progress_task: Option<CancellationToken>,
}

impl EngineState {
    fn snapshot(&self) -> EnrollmentSnapshot {
        EnrollmentSnapshot {
            session_id: self.session.session_id,
            open: self.open,
            stage: self.session.stage,
            step: self.session.stage.step_number(),
            captured_image_ref: self.session.captured_image_ref.clone(),
            has_sample: self.session.has_sample(),
            progress_percent: self.session.progress_percent,
        }
    }
}

/// Owns one enrollment session and drives its progress timer
///
/// Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct EnrollmentEngine {
    state: Arc<Mutex<EngineState>>,
    timing: EnrollmentTiming,
    event_bus: EventBus,
}

impl EnrollmentEngine {
    pub fn new(timing: EnrollmentTiming, event_bus: EventBus) -> Self {
        Self {
            state: Arc::new(Mutex::new(EngineState {
                open: false,
                session: EnrollmentSession::new(Uuid::new_v4()),
                progress_task: None,
            })),
            timing,
            event_bus,
        }
    }

    pub fn timing(&self) -> EnrollmentTiming {
        self.timing
    }

    /// Current state
    pub async fn snapshot(&self) -> EnrollmentSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Make the workflow visible. Idempotent; does not reset the session.
    pub async fn open(&self) -> TransitionOutcome {
        let mut state = self.state.lock().await;
        let applied = !state.open;
        state.open = true;
        if applied {
            info!(session_id = %state.session.session_id, "Enrollment opened");
        }
        TransitionOutcome {
            applied,
            snapshot: state.snapshot(),
        }
    }

    /// Hide the workflow and reset to a fresh Capture session
    ///
    /// Cancels in-flight template generation. Valid from any stage.
    pub async fn close(&self) -> TransitionOutcome {
        let mut state = self.state.lock().await;

        if let Some(token) = state.progress_task.take() {
            token.cancel();
            debug!(
                session_id = %state.session.session_id,
                "Cancelled template generation on close"
            );
        }

        let old = state.session.clone();
        let reset = old
            .transition(EnrollmentCommand::Reset {
                session_id: Uuid::new_v4(),
            })
            .unwrap_or_else(|| EnrollmentSession::new(Uuid::new_v4()));
        state.session = reset;
        state.open = false;

        self.publish_stage_change(&old, &state.session);
        info!(
            closed_session = %old.session_id,
            stage = ?old.stage,
            "Enrollment closed and reset"
        );

        TransitionOutcome {
            applied: true,
            snapshot: state.snapshot(),
        }
    }

    /// Take a sample (Capture → Preview)
    pub async fn capture(&self) -> TransitionOutcome {
        self.apply(EnrollmentCommand::Capture(PLACEHOLDER_SAMPLE_REF.to_string()))
            .await
    }

    /// Discard the sample (Preview → Capture)
    pub async fn retake(&self) -> TransitionOutcome {
        self.apply(EnrollmentCommand::Retake).await
    }

    /// Commit the sample and start template generation (Preview → Processing)
    pub async fn accept_and_generate(&self) -> TransitionOutcome {
        let mut state = self.state.lock().await;
        let outcome = self.apply_locked(&mut state, EnrollmentCommand::Accept);

        if outcome.applied {
            let token = CancellationToken::new();
            state.progress_task = Some(token.clone());
            tokio::spawn(run_progress(
                Arc::clone(&self.state),
                token,
                state.session.session_id,
                self.timing,
                self.event_bus.clone(),
            ));
        }

        outcome
    }

    async fn apply(&self, command: EnrollmentCommand) -> TransitionOutcome {
        let mut state = self.state.lock().await;
        self.apply_locked(&mut state, command)
    }

    fn apply_locked(&self, state: &mut EngineState, command: EnrollmentCommand) -> TransitionOutcome {
        let label = format!("{:?}", command);
        if !state.open {
            debug!(command = %label, "Ignoring enrollment command while closed");
            return TransitionOutcome {
                applied: false,
                snapshot: state.snapshot(),
            };
        }

        match state.session.transition(command) {
            Some(next) => {
                let old = std::mem::replace(&mut state.session, next);
                debug!(
                    session_id = %old.session_id,
                    from = ?old.stage,
                    to = ?state.session.stage,
                    "Enrollment transition"
                );
                self.publish_stage_change(&old, &state.session);
                TransitionOutcome {
                    applied: true,
                    snapshot: state.snapshot(),
                }
            }
            None => {
                debug!(
                    stage = ?state.session.stage,
                    command = %label,
                    "Ignoring enrollment command not valid in current stage"
                );
                TransitionOutcome {
                    applied: false,
                    snapshot: state.snapshot(),
                }
            }
        }
    }

    fn publish_stage_change(&self, old: &EnrollmentSession, new: &EnrollmentSession) {
        if old.stage != new.stage || old.session_id != new.session_id {
            self.event_bus.emit_lossy(AccessFlowEvent::EnrollmentStageChanged {
                session_id: new.session_id,
                old_stage: old.stage,
                new_stage: new.stage,
                timestamp: Utc::now(),
            });
        }
    }
}

/// Advance progress one step per tick until Complete or cancelled
///
/// Token and session id are re-checked under the state lock before every
/// mutation: a tick that became due just before `close()` sees the cancelled
/// token and exits without touching the reset session.
async fn run_progress(
    state: Arc<Mutex<EngineState>>,
    token: CancellationToken,
    session_id: Uuid,
    timing: EnrollmentTiming,
    event_bus: EventBus,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + timing.tick, timing.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!(session_id = %session_id, "Template generation cancelled");
                return;
            }
            _ = ticker.tick() => {}
        }

        let mut guard = state.lock().await;
        if token.is_cancelled() || guard.session.session_id != session_id {
            return;
        }

        let Some(next) = guard.session.transition(EnrollmentCommand::Tick {
            step_percent: timing.step_percent,
        }) else {
            guard.progress_task = None;
            return;
        };

        let old_stage = guard.session.stage;
        guard.session = next;
        let progress = guard.session.progress_percent;

        event_bus.emit_lossy(AccessFlowEvent::EnrollmentProgress {
            session_id,
            progress_percent: progress,
            timestamp: Utc::now(),
        });

        if guard.session.stage == EnrollmentStage::Complete {
            guard.progress_task = None;
            event_bus.emit_lossy(AccessFlowEvent::EnrollmentStageChanged {
                session_id,
                old_stage,
                new_stage: EnrollmentStage::Complete,
                timestamp: Utc::now(),
            });
            info!(session_id = %session_id, "Biometric template generated");
            return;
        }
    }
}
