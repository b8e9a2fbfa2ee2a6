//! Enrollment wizard endpoints
//!
//! Every POST answers with the resulting snapshot and whether the operation
//! applied; operations invalid in the current stage are no-ops, not errors.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::enrollment::{EnrollmentSnapshot, TransitionOutcome};
use crate::AppState;

/// GET /enrollment
pub async fn get_enrollment(State(state): State<AppState>) -> Json<EnrollmentSnapshot> {
    Json(state.enrollment.snapshot().await)
}

/// POST /enrollment/open
pub async fn open_enrollment(State(state): State<AppState>) -> Json<TransitionOutcome> {
    Json(state.enrollment.open().await)
}

/// POST /enrollment/close
pub async fn close_enrollment(State(state): State<AppState>) -> Json<TransitionOutcome> {
    Json(state.enrollment.close().await)
}

/// POST /enrollment/capture
pub async fn capture_sample(State(state): State<AppState>) -> Json<TransitionOutcome> {
    Json(state.enrollment.capture().await)
}

/// POST /enrollment/retake
pub async fn retake_sample(State(state): State<AppState>) -> Json<TransitionOutcome> {
    Json(state.enrollment.retake().await)
}

/// POST /enrollment/accept
pub async fn accept_sample(State(state): State<AppState>) -> Json<TransitionOutcome> {
    Json(state.enrollment.accept_and_generate().await)
}

/// Build enrollment routes
pub fn enrollment_routes() -> Router<AppState> {
    Router::new()
        .route("/enrollment", get(get_enrollment))
        .route("/enrollment/open", post(open_enrollment))
        .route("/enrollment/close", post(close_enrollment))
        .route("/enrollment/capture", post(capture_sample))
        .route("/enrollment/retake", post(retake_sample))
        .route("/enrollment/accept", post(accept_sample))
}
