//! Reference data endpoints: branches, devices, tenants, users, dashboard totals

use accessflow_common::models::{Branch, BranchStatus, Device, DeviceStatus, Tenant, User};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{ApiError, ApiResult, AppState};

/// Device list filter
#[derive(Debug, Default, Deserialize)]
pub struct DeviceQuery {
    pub branch_id: Option<String>,
}

/// Dashboard header totals
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardStats {
    /// Sum of per-branch tenant counts
    pub total_tenants: u32,
    /// Tenants with a record in the directory
    pub registered_tenants: usize,
    /// Sum of per-branch device counts
    pub total_devices: u32,
    /// Registered devices currently online
    pub online_devices: usize,
    /// Entries in the live access log
    pub buffered_events: usize,
    /// Buffered entries that are not a plain grant
    pub security_alerts: usize,
    pub branches_in_maintenance: usize,
}

/// GET /branches
pub async fn list_branches(State(state): State<AppState>) -> Json<Vec<Branch>> {
    Json(state.branches.to_vec())
}

/// GET /branches/:id
pub async fn get_branch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Branch>> {
    state
        .branches
        .iter()
        .find(|b| b.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("branch {}", id)))
}

/// GET /devices
pub async fn list_devices(
    State(state): State<AppState>,
    Query(query): Query<DeviceQuery>,
) -> ApiResult<Json<Vec<Device>>> {
    if let Some(branch_id) = &query.branch_id {
        if !state.branches.iter().any(|b| &b.id == branch_id) {
            return Err(ApiError::NotFound(format!("branch {}", branch_id)));
        }
    }

    let devices = state
        .devices
        .iter()
        .filter(|d| query.branch_id.as_ref().map_or(true, |b| &d.branch_id == b))
        .cloned()
        .collect();
    Ok(Json(devices))
}

/// GET /tenants
pub async fn list_tenants(State(state): State<AppState>) -> Json<Vec<Tenant>> {
    Json(state.tenants.to_vec())
}

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.users.to_vec())
}

/// GET /dashboard/stats
pub async fn dashboard_stats(State(state): State<AppState>) -> Json<DashboardStats> {
    let log = state.log_buffer.snapshot().await;

    Json(DashboardStats {
        total_tenants: state.branches.iter().map(|b| b.tenant_count).sum(),
        registered_tenants: state.tenants.len(),
        total_devices: state.branches.iter().map(|b| b.device_count).sum(),
        online_devices: state
            .devices
            .iter()
            .filter(|d| d.status == DeviceStatus::Online)
            .count(),
        buffered_events: log.len(),
        security_alerts: log.iter().filter(|e| e.event.is_alert()).count(),
        branches_in_maintenance: state
            .branches
            .iter()
            .filter(|b| b.status == BranchStatus::Maintenance)
            .count(),
    })
}

/// Build reference data routes
pub fn directory_routes() -> Router<AppState> {
    Router::new()
        .route("/branches", get(list_branches))
        .route("/branches/:id", get(get_branch))
        .route("/devices", get(list_devices))
        .route("/tenants", get(list_tenants))
        .route("/users", get(list_users))
        .route("/dashboard/stats", get(dashboard_stats))
}
