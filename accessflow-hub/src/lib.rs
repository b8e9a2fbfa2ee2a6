//! accessflow-hub library interface
//!
//! Exposes the enrollment engine, live log feed, security analysis service
//! and HTTP router for the binary and for integration testing.

pub mod analysis;
pub mod api;
pub mod config;
pub mod enrollment;
pub mod error;
pub mod log_feed;
pub mod logging;

pub use crate::error::{ApiError, ApiResult};

use std::sync::Arc;

use accessflow_common::config::TomlConfig;
use accessflow_common::events::EventBus;
use accessflow_common::fixtures;
use accessflow_common::models::{Branch, Device, Tenant, User};
use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::analysis::{AnalysisTracker, SecurityAnalyst};
use crate::enrollment::{EnrollmentEngine, EnrollmentTiming};
use crate::log_feed::{AccessLogBuffer, LogFeed, SharedLogBuffer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    /// Reference data, immutable for the process lifetime
    pub branches: Arc<[Branch]>,
    pub devices: Arc<[Device]>,
    pub tenants: Arc<[Tenant]>,
    pub users: Arc<[User]>,
    /// Live access log, newest first
    pub log_buffer: SharedLogBuffer,
    pub enrollment: EnrollmentEngine,
    pub analyst: Arc<SecurityAnalyst>,
    pub analysis_tracker: AnalysisTracker,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// State seeded with the built-in reference data and historical log
    pub fn new(config: &TomlConfig, event_bus: EventBus, analyst: SecurityAnalyst) -> Self {
        let log_buffer = SharedLogBuffer::new(AccessLogBuffer::seeded(
            config.feed.capacity,
            fixtures::seed_access_log(),
        ));
        let enrollment = EnrollmentEngine::new(
            EnrollmentTiming::from(&config.enrollment),
            event_bus.clone(),
        );

        Self {
            branches: fixtures::branches().into(),
            devices: fixtures::devices().into(),
            tenants: fixtures::tenants().into(),
            users: fixtures::users().into(),
            log_buffer,
            enrollment,
            analyst: Arc::new(analyst),
            analysis_tracker: AnalysisTracker::new(),
            startup_time: Utc::now(),
            event_bus,
        }
    }

    /// Synthetic feed writing into this state's log buffer
    pub fn log_feed(&self, config: &TomlConfig) -> LogFeed {
        LogFeed::new(
            self.log_buffer.clone(),
            self.event_bus.clone(),
            config.feed.interval(),
        )
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .merge(api::directory_routes())
        .merge(api::log_routes())
        .merge(api::analysis_routes())
        .merge(api::enrollment_routes())
        .merge(api::health_routes())
        .route("/events", get(api::event_stream))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
