//! Log filter setup
//!
//! The subscriber goes in before configuration is read so config-loading
//! diagnostics are not lost. The config file's level is applied afterwards
//! through a reload handle, unless RUST_LOG or `--log-level` already chose.

use tracing_subscriber::{reload, EnvFilter, Registry};

/// Level used until the config file has been read
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Filter directives covering the hub, its common crate and request tracing
pub fn directives(level: &str) -> String {
    format!("accessflow_hub={level},accessflow_common={level},tower_http={level}")
}

/// Reload handle for the startup filter
pub struct LogLevelControl {
    handle: reload::Handle<EnvFilter, Registry>,
    pinned: bool,
}

impl LogLevelControl {
    /// Switch to the config file's level
    ///
    /// Returns `Ok(false)` without touching the filter when RUST_LOG or the
    /// command line fixed it.
    pub fn apply_config_level(&self, level: &str) -> Result<bool, reload::Error> {
        if self.pinned {
            return Ok(false);
        }
        self.handle.reload(EnvFilter::new(directives(level)))?;
        Ok(true)
    }
}

/// Startup filter from the process environment and `--log-level`
pub fn filter_layer(
    cli_level: Option<&str>,
) -> (reload::Layer<EnvFilter, Registry>, LogLevelControl) {
    filter_layer_from(std::env::var(EnvFilter::DEFAULT_ENV).ok(), cli_level)
}

/// Startup filter with precedence RUST_LOG > `cli_level` > [`DEFAULT_LOG_LEVEL`]
///
/// A blank or unparsable RUST_LOG is ignored.
pub fn filter_layer_from(
    rust_log: Option<String>,
    cli_level: Option<&str>,
) -> (reload::Layer<EnvFilter, Registry>, LogLevelControl) {
    let from_env = rust_log
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| EnvFilter::try_new(v).ok());

    let (filter, pinned) = match (from_env, cli_level) {
        (Some(filter), _) => (filter, true),
        (None, Some(level)) => (EnvFilter::new(directives(level)), true),
        (None, None) => (EnvFilter::new(directives(DEFAULT_LOG_LEVEL)), false),
    };

    let (layer, handle) = reload::Layer::new(filter);
    (layer, LogLevelControl { handle, pinned })
}
