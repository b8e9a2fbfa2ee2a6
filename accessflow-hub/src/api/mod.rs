//! HTTP API handlers for accessflow-hub
//!
//! REST endpoints for the dashboard plus an SSE stream of live events.

pub mod analysis;
pub mod directory;
pub mod enrollment;
pub mod health;
pub mod logs;
pub mod sse;

pub use analysis::analysis_routes;
pub use directory::directory_routes;
pub use enrollment::enrollment_routes;
pub use health::health_routes;
pub use logs::log_routes;
pub use sse::event_stream;
