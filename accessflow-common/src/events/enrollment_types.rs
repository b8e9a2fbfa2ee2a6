//! Enrollment-related types shared between the hub and its observers

use serde::{Deserialize, Serialize};

/// Stage of a remote biometric enrollment
///
/// Capture → Preview → Processing → Complete. Retake goes Preview → Capture;
/// closing the workflow returns any stage to Capture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStage {
    /// Waiting for a sample; nothing held
    #[default]
    Capture,
    /// Sample held, not yet committed
    Preview,
    /// Template generation in progress
    Processing,
    /// Template generated; terminal until the session is closed
    Complete,
}

impl EnrollmentStage {
    /// One-based step number shown by the wizard
    pub fn step_number(self) -> u8 {
        match self {
            EnrollmentStage::Capture => 1,
            EnrollmentStage::Preview => 2,
            EnrollmentStage::Processing => 3,
            EnrollmentStage::Complete => 4,
        }
    }
}
