//! Security analysis and policy generation endpoints
//!
//! Analysis requests may overlap. Each one reads the buffer at request time;
//! the tracker reports `busy` while any are in flight and keeps the last
//! finished report for late-joining dashboards.

use accessflow_common::events::AccessFlowEvent;
use accessflow_common::time;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::prompt::RECENT_EVENT_LIMIT;
use crate::analysis::AnalysisReport;
use crate::{ApiError, ApiResult, AppState};

/// GET /analysis response
#[derive(Debug, Serialize)]
pub struct AnalysisStateResponse {
    pub busy: bool,
    pub report: Option<AnalysisReport>,
}

/// POST /analysis response
#[derive(Debug, Serialize)]
pub struct AnalysisRunResponse {
    pub report: AnalysisReport,
}

/// POST /policy request
#[derive(Debug, Deserialize)]
pub struct PolicyRequest {
    pub tenant_name: String,
    pub resource: String,
}

/// POST /policy response; `policy` is the raw model payload
#[derive(Debug, Serialize)]
pub struct PolicyResponse {
    pub policy: String,
}

/// GET /analysis
pub async fn analysis_state(State(state): State<AppState>) -> Json<AnalysisStateResponse> {
    Json(AnalysisStateResponse {
        busy: state.analysis_tracker.is_busy(),
        report: state.analysis_tracker.last_report().await,
    })
}

/// POST /analysis
///
/// Analyzes the newest buffered events against current branch status.
pub async fn run_analysis(State(state): State<AppState>) -> Json<AnalysisRunResponse> {
    let _in_flight = state.analysis_tracker.begin();

    let events = state.log_buffer.recent(RECENT_EVENT_LIMIT).await;
    info!(events = events.len(), "Security analysis requested");
    state.event_bus.emit_lossy(AccessFlowEvent::AnalysisStarted {
        events_considered: events.len(),
        timestamp: time::now(),
    });

    let report = state.analyst.analyze_detailed(&events, &state.branches).await;
    state.analysis_tracker.record(report.clone()).await;

    state.event_bus.emit_lossy(AccessFlowEvent::AnalysisCompleted {
        report: report.text.clone(),
        timestamp: time::now(),
    });

    Json(AnalysisRunResponse { report })
}

/// POST /policy
pub async fn generate_policy(
    State(state): State<AppState>,
    Json(request): Json<PolicyRequest>,
) -> ApiResult<Json<PolicyResponse>> {
    let tenant_name = request.tenant_name.trim();
    let resource = request.resource.trim();
    if tenant_name.is_empty() || resource.is_empty() {
        return Err(ApiError::BadRequest(
            "tenant_name and resource are required".to_string(),
        ));
    }

    let policy = state.analyst.generate_policy(tenant_name, resource).await;
    Ok(Json(PolicyResponse { policy }))
}

/// Build analysis routes
pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/analysis", get(analysis_state).post(run_analysis))
        .route("/policy", post(generate_policy))
}
