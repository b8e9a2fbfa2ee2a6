//! Configuration resolution for accessflow-hub
//!
//! Provides multi-tier API key resolution with ENV → TOML priority.

use accessflow_common::config::{AnalysisSettings, TomlConfig};
use tracing::{info, warn};

use crate::analysis::AnalysisConfig;

/// Service-specific API key variable
pub const API_KEY_ENV_VAR: &str = "ACCESSFLOW_API_KEY";
/// Generic API key variable honored for compatibility
pub const FALLBACK_API_KEY_ENV_VAR: &str = "API_KEY";

/// Resolve the analysis API key
///
/// **Priority:** `ACCESSFLOW_API_KEY` → `API_KEY` → TOML `analysis.api_key`
///
/// Returns `None` when no source holds a non-blank key; analysis then runs
/// in its not-configured mode.
pub fn resolve_api_key(settings: &AnalysisSettings) -> Option<String> {
    let candidates = [
        (API_KEY_ENV_VAR, std::env::var(API_KEY_ENV_VAR).ok()),
        (FALLBACK_API_KEY_ENV_VAR, std::env::var(FALLBACK_API_KEY_ENV_VAR).ok()),
        ("TOML config", settings.api_key.clone()),
    ];

    let mut valid = candidates
        .into_iter()
        .filter_map(|(source, key)| key.filter(|k| is_valid_key(k)).map(|k| (source, k)));

    let (source, key) = valid.next()?;
    let others: Vec<&str> = valid.map(|(s, _)| s).collect();

    if !others.is_empty() {
        warn!(
            "Analysis API key found in multiple sources: {}, {}. Using {} (highest priority).",
            source,
            others.join(", "),
            source
        );
    }
    info!("Analysis API key loaded from {}", source);
    Some(key.trim().to_string())
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Analysis configuration with the resolved API key
pub fn analysis_config(config: &TomlConfig) -> AnalysisConfig {
    AnalysisConfig::from_settings(&config.analysis, resolve_api_key(&config.analysis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var(API_KEY_ENV_VAR);
        std::env::remove_var(FALLBACK_API_KEY_ENV_VAR);
    }

    fn settings(key: Option<&str>) -> AnalysisSettings {
        AnalysisSettings {
            api_key: key.map(str::to_string),
            ..AnalysisSettings::default()
        }
    }

    #[test]
    #[serial]
    fn test_no_sources_yields_none() {
        clear_env();
        assert_eq!(resolve_api_key(&settings(None)), None);
        assert_eq!(resolve_api_key(&settings(Some("   "))), None);
    }

    #[test]
    #[serial]
    fn test_toml_key_used_when_env_absent() {
        clear_env();
        assert_eq!(
            resolve_api_key(&settings(Some("toml-key"))),
            Some("toml-key".to_string())
        );
    }

    #[test]
    #[serial]
    fn test_env_priority_order() {
        clear_env();
        std::env::set_var(FALLBACK_API_KEY_ENV_VAR, "generic-key");
        assert_eq!(
            resolve_api_key(&settings(Some("toml-key"))),
            Some("generic-key".to_string())
        );

        std::env::set_var(API_KEY_ENV_VAR, "service-key");
        assert_eq!(
            resolve_api_key(&settings(Some("toml-key"))),
            Some("service-key".to_string())
        );
        clear_env();
    }

    #[test]
    #[serial]
    fn test_blank_env_falls_through() {
        clear_env();
        std::env::set_var(API_KEY_ENV_VAR, "");
        assert_eq!(
            resolve_api_key(&settings(Some("toml-key"))),
            Some("toml-key".to_string())
        );
        clear_env();
    }

    #[test]
    #[serial]
    fn test_analysis_config_carries_model_settings() {
        clear_env();
        let mut toml = TomlConfig::default();
        toml.analysis.model = "gemini-test".to_string();
        toml.analysis.timeout_secs = 5;

        let config = analysis_config(&toml);
        assert_eq!(config.model, "gemini-test");
        assert_eq!(config.timeout, std::time::Duration::from_secs(5));
        assert!(config.credential().is_none());
    }
}
