//! Google Gemini text-generation client
//!
//! Thin wrapper over the `generateContent` REST endpoint. The API key travels
//! in the `x-goog-api-key` header so request URLs are safe to log.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{AnalysisConfig, AnalysisError, GenerationRequest, ResponseFormat, TextGenerator};

const USER_AGENT: &str = concat!("AccessFlow/", env!("CARGO_PKG_VERSION"));
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
    #[serde(default)]
    total_token_count: Option<u32>,
}

impl GeminiResponse {
    /// Concatenated text parts of the first candidate
    fn into_text(self) -> Result<String, AnalysisError> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or(AnalysisError::EmptyResponse("no candidates"))?;

        if let Some(reason) = &candidate.finish_reason {
            debug!(finish_reason = %reason, "Gemini candidate finished");
        }

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AnalysisError::EmptyResponse("candidate has no text"));
        }
        Ok(text)
    }
}

/// Gemini API client
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Build a client from analysis configuration
    ///
    /// Fails with `MissingCredential` when no usable API key is configured.
    pub fn new(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        let api_key = config
            .credential()
            .ok_or(AnalysisError::MissingCredential)?
            .to_string();

        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(AnalysisError::Http)?;

        Ok(Self {
            http_client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }

    fn request_body(request: GenerationRequest) -> GeminiRequest {
        let generation_config = match request.format {
            ResponseFormat::Text => None,
            ResponseFormat::Json => Some(GeminiGenerationConfig {
                response_mime_type: "application/json",
            }),
        };

        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: request.prompt,
                }],
            }],
            generation_config,
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, AnalysisError> {
        let url = self.endpoint();
        let format = request.format;
        debug!(url = %url, ?format, "Sending request to Gemini API");

        let started = std::time::Instant::now();
        let response = self
            .http_client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&Self::request_body(request))
            .send()
            .await
            .map_err(AnalysisError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(AnalysisError::Http)?;
        let parsed: GeminiResponse =
            serde_json::from_str(&body).map_err(|e| AnalysisError::Decode(e.to_string()))?;

        if let Some(usage) = &parsed.usage_metadata {
            info!(
                model = %self.model,
                prompt_tokens = ?usage.prompt_token_count,
                response_tokens = ?usage.candidates_token_count,
                total_tokens = ?usage.total_token_count,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Gemini generation completed"
            );
        }

        parsed.into_text()
    }
}

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> AnalysisConfig {
        AnalysisConfig {
            api_key: api_key.map(str::to_string),
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_client_creation() {
        let client = GeminiClient::new(&config(Some("test-key"))).unwrap();
        assert_eq!(client.model(), "gemini-2.5-flash");
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_client_requires_credential() {
        assert!(matches!(
            GeminiClient::new(&config(None)),
            Err(AnalysisError::MissingCredential)
        ));
        assert!(matches!(
            GeminiClient::new(&config(Some("   "))),
            Err(AnalysisError::MissingCredential)
        ));
    }

    #[test]
    fn test_request_body_text() {
        let body = GeminiClient::request_body(GenerationRequest::text("hello"));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn test_request_body_json_sets_mime_type() {
        let body = GeminiClient::request_body(GenerationRequest::json("policy"));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let raw = r###"{
            "candidates": [{
                "content": {"parts": [{"text": "## Briefing\n"}, {"text": "All clear."}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 40, "totalTokenCount": 160}
        }"###;
        let parsed: GeminiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.into_text().unwrap(), "## Briefing\nAll clear.");
    }

    #[test]
    fn test_response_without_candidates_is_error() {
        let parsed: GeminiResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(
            parsed.into_text(),
            Err(AnalysisError::EmptyResponse(_))
        ));
    }
}
