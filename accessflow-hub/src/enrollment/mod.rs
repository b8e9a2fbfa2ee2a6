//! Remote biometric enrollment workflow
//!
//! The session value and its transition function are pure; the
//! [`EnrollmentEngine`] owns one session plus the cancellable timer task that
//! drives template-generation progress.
//!
//! ```text
//! Capture --capture--> Preview --accept--> Processing --tick x N--> Complete
//!    ^                    |
//!    +------retake--------+          (close/reset from any stage -> Capture)
//! ```

mod engine;

pub use engine::{EnrollmentEngine, EnrollmentSnapshot, EnrollmentTiming, TransitionOutcome};

pub use accessflow_common::events::EnrollmentStage;

use serde::Serialize;
use uuid::Uuid;

/// Sample reference produced by the simulated capture device
pub const PLACEHOLDER_SAMPLE_REF: &str = "https://picsum.photos/id/1005/300/300";

/// Progress value at which template generation is complete
pub const PROGRESS_COMPLETE: u8 = 100;

/// Input to the enrollment state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentCommand {
    /// A sample was captured (carries its opaque reference)
    Capture(String),
    /// Discard the held sample
    Retake,
    /// Commit the sample and start template generation
    Accept,
    /// One progress step elapsed
    Tick { step_percent: u8 },
    /// Start over with a new session id
    Reset { session_id: Uuid },
}

/// One enrollment attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrollmentSession {
    pub session_id: Uuid,
    pub stage: EnrollmentStage,
    /// Present from Preview onward
    pub captured_image_ref: Option<String>,
    /// 0..=100, meaningful during Processing
    pub progress_percent: u8,
}

impl EnrollmentSession {
    /// Fresh session in the Capture stage
    pub fn new(session_id: Uuid) -> Self {
        Self {
            session_id,
            stage: EnrollmentStage::Capture,
            captured_image_ref: None,
            progress_percent: 0,
        }
    }

    /// Apply a command
    ///
    /// Returns `None` when the command is not valid in the current stage;
    /// callers treat that as a no-op.
    pub fn transition(&self, command: EnrollmentCommand) -> Option<EnrollmentSession> {
        use EnrollmentCommand as Cmd;
        use EnrollmentStage as Stage;

        match (self.stage, command) {
            (_, Cmd::Reset { session_id }) => Some(EnrollmentSession::new(session_id)),

            (Stage::Capture, Cmd::Capture(sample_ref)) => Some(EnrollmentSession {
                stage: Stage::Preview,
                captured_image_ref: Some(sample_ref),
                progress_percent: 0,
                ..self.clone()
            }),

            (Stage::Preview, Cmd::Retake) => Some(EnrollmentSession {
                stage: Stage::Capture,
                captured_image_ref: None,
                progress_percent: 0,
                ..self.clone()
            }),

            (Stage::Preview, Cmd::Accept) => Some(EnrollmentSession {
                stage: Stage::Processing,
                progress_percent: 0,
                ..self.clone()
            }),

            (Stage::Processing, Cmd::Tick { step_percent }) => {
                let progress = self
                    .progress_percent
                    .saturating_add(step_percent.max(1))
                    .min(PROGRESS_COMPLETE);
                let stage = if progress >= PROGRESS_COMPLETE {
                    Stage::Complete
                } else {
                    Stage::Processing
                };
                Some(EnrollmentSession {
                    stage,
                    progress_percent: progress,
                    ..self.clone()
                })
            }

            _ => None,
        }
    }

    /// Whether a captured sample is being held
    pub fn has_sample(&self) -> bool {
        self.captured_image_ref.is_some()
    }
}
