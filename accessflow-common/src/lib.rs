//! # AccessFlow Common Library
//!
//! Shared code for the AccessFlow services including:
//! - Domain models (branches, devices, tenants, users, access events)
//! - Reference fixtures loaded at startup
//! - Event types (AccessFlowEvent enum) and the EventBus
//! - Configuration loading
//! - Timestamp helpers

pub mod config;
pub mod error;
pub mod events;
pub mod fixtures;
pub mod models;
pub mod time;

pub use error::{Error, Result};
