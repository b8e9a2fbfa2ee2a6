//! Test Helper Utilities
//!
//! Shared utilities for testing accessflow-hub

#![allow(dead_code)]

pub mod log_capture;

use accessflow_common::config::TomlConfig;
use accessflow_common::events::EventBus;
use accessflow_hub::analysis::{AnalysisConfig, SecurityAnalyst};
use accessflow_hub::AppState;

pub use log_capture::{capture_logs, LogCapture};

/// Analysis configuration with no credential
pub fn unconfigured_analysis() -> AnalysisConfig {
    AnalysisConfig::default()
}

/// App state with built-in fixtures and analysis disabled
pub fn test_app_state() -> AppState {
    AppState::new(
        &TomlConfig::default(),
        EventBus::new(100),
        SecurityAnalyst::new(unconfigured_analysis()),
    )
}
