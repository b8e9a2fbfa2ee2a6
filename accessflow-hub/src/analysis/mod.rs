//! Security analysis call-through
//!
//! Turns the newest access events plus branch status into a short Markdown
//! briefing, and generates JSON access-policy drafts, via a text-generation
//! backend. Failures never escape [`SecurityAnalyst`]: callers always receive
//! displayable text.

pub mod gemini;
pub mod prompt;
pub mod tracker;

use std::sync::Arc;
use std::time::Duration;

use accessflow_common::config::{
    AnalysisSettings, DEFAULT_ANALYSIS_BASE_URL, DEFAULT_ANALYSIS_MODEL,
};
use accessflow_common::models::{AccessEvent, Branch};
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub use gemini::GeminiClient;
pub use tracker::{AnalysisTracker, InFlightGuard};

/// Returned by `analyze` when no API key is configured
pub const ANALYSIS_NOT_CONFIGURED: &str = "AI Configuration Missing: Please set API_KEY.";
/// Returned by `analyze` when the backend call fails
pub const ANALYSIS_UNAVAILABLE: &str =
    "Unable to generate security analysis at this time. Please try again later.";
/// Returned by `generate_policy` when no API key is configured
pub const POLICY_NOT_CONFIGURED: &str = "AI Configuration Missing.";
/// Returned by `generate_policy` when the backend call fails
pub const POLICY_UNAVAILABLE: &str = "{}";

/// Analysis backend errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No API key configured")]
    MissingCredential,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Empty response: {0}")]
    EmptyResponse(&'static str),

    #[error("Failed to encode prompt data: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Requested shape of the generated text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    Json,
}

/// One prompt for the text-generation backend
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub format: ResponseFormat,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            format: ResponseFormat::Text,
        }
    }

    pub fn json(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            format: ResponseFormat::Json,
        }
    }
}

/// Text-generation backend
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, AnalysisError>;
}

/// Credential and model selection, fixed at construction
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_ANALYSIS_MODEL.to_string(),
            base_url: DEFAULT_ANALYSIS_BASE_URL.to_string(),
            timeout: gemini::DEFAULT_TIMEOUT,
        }
    }
}

impl AnalysisConfig {
    /// Model settings from TOML with an already-resolved API key
    pub fn from_settings(settings: &AnalysisSettings, api_key: Option<String>) -> Self {
        Self {
            api_key,
            model: settings.model.clone(),
            base_url: settings.base_url.clone(),
            timeout: Duration::from_secs(settings.timeout_secs.max(1)),
        }
    }

    /// Usable API key; blank counts as absent
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// How an analysis request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Ok,
    NotConfigured,
    Failed,
}

/// Analysis text plus the outcome that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub status: AnalysisStatus,
    pub text: String,
    pub generated_at: chrono::DateTime<Utc>,
}

impl AnalysisReport {
    fn new(status: AnalysisStatus, text: impl Into<String>) -> Self {
        Self {
            status,
            text: text.into(),
            generated_at: Utc::now(),
        }
    }
}

/// Analysis backend as resolved at construction
#[derive(Clone)]
enum Backend {
    Ready(Arc<dyn TextGenerator>),
    NotConfigured,
    /// A credential exists but the client could not be built
    Unavailable(String),
}

/// Security analysis service
///
/// Without a usable credential no backend exists and every call returns the
/// configuration-missing text without any network activity.
#[derive(Clone)]
pub struct SecurityAnalyst {
    config: AnalysisConfig,
    backend: Backend,
}

impl SecurityAnalyst {
    /// Analyst backed by the Gemini API
    pub fn new(config: AnalysisConfig) -> Self {
        let client = GeminiClient::new(&config).map(|c| Arc::new(c) as Arc<dyn TextGenerator>);
        Self::from_client(config, client)
    }

    fn from_client(
        config: AnalysisConfig,
        client: Result<Arc<dyn TextGenerator>, AnalysisError>,
    ) -> Self {
        let backend = match client {
            Ok(client) => {
                info!(model = %config.model, "Security analysis enabled");
                Backend::Ready(client)
            }
            Err(AnalysisError::MissingCredential) => {
                warn!("No analysis API key configured; security analysis disabled");
                Backend::NotConfigured
            }
            Err(e) => {
                error!("Failed to initialize analysis client: {}", e);
                Backend::Unavailable(e.to_string())
            }
        };
        Self { config, backend }
    }

    /// Analyst with an explicit backend
    ///
    /// The backend is still only used when `config` carries a credential.
    pub fn with_generator(config: AnalysisConfig, generator: Arc<dyn TextGenerator>) -> Self {
        let backend = match config.credential() {
            Some(_) => Backend::Ready(generator),
            None => Backend::NotConfigured,
        };
        Self { config, backend }
    }

    /// True when a credential is present, even if the client failed to start
    pub fn is_configured(&self) -> bool {
        !matches!(self.backend, Backend::NotConfigured)
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Security briefing with its outcome status
    ///
    /// `events` must be newest first.
    pub async fn analyze_detailed(&self, events: &[AccessEvent], branches: &[Branch]) -> AnalysisReport {
        let backend = match &self.backend {
            Backend::Ready(backend) => backend,
            Backend::NotConfigured => {
                warn!("Security analysis requested without an API key");
                return AnalysisReport::new(AnalysisStatus::NotConfigured, ANALYSIS_NOT_CONFIGURED);
            }
            Backend::Unavailable(reason) => {
                error!("Security analysis failed: client unavailable ({})", reason);
                return AnalysisReport::new(AnalysisStatus::Failed, ANALYSIS_UNAVAILABLE);
            }
        };

        let result = match prompt::security_briefing(events, branches) {
            Ok(p) => {
                debug!(
                    events = events.len().min(prompt::RECENT_EVENT_LIMIT),
                    branches = branches.len(),
                    "Requesting security briefing"
                );
                backend.generate(GenerationRequest::text(p)).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(text) => AnalysisReport::new(AnalysisStatus::Ok, text),
            Err(e) => {
                error!("Security analysis failed: {}", e);
                AnalysisReport::new(AnalysisStatus::Failed, ANALYSIS_UNAVAILABLE)
            }
        }
    }

    /// Security briefing text, or a fixed message when unavailable
    pub async fn analyze(&self, events: &[AccessEvent], branches: &[Branch]) -> String {
        self.analyze_detailed(events, branches).await.text
    }

    /// Raw JSON access-policy draft, or a fixed message when unavailable
    pub async fn generate_policy(&self, tenant_name: &str, resource: &str) -> String {
        let backend = match &self.backend {
            Backend::Ready(backend) => backend,
            Backend::NotConfigured => {
                warn!("Policy generation requested without an API key");
                return POLICY_NOT_CONFIGURED.to_string();
            }
            Backend::Unavailable(reason) => {
                error!(tenant = %tenant_name, "Policy generation failed: client unavailable ({})", reason);
                return POLICY_UNAVAILABLE.to_string();
            }
        };

        let p = prompt::access_policy(tenant_name, resource, Utc::now());
        match backend.generate(GenerationRequest::json(p)).await {
            Ok(text) => text,
            Err(e) => {
                error!(tenant = %tenant_name, "Policy generation failed: {}", e);
                POLICY_UNAVAILABLE.to_string()
            }
        }
    }
}
