//! Gemini Client — the single point of entry for all Generative Language API
//! calls in this service.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! All model interactions MUST go through this module.
//!
//! Model: gemini-2.5-flash-preview-04-17 (hardcoded — do not make
//! configurable to prevent drift)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// The model used for all analysis calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-2.5-flash-preview-04-17";

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types — generateContent request
// ────────────────────────────────────────────────────────────────────────────

/// One `generateContent` request body. The REST API expects camelCase keys.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// A single request part: either inline binary data or plain text.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
    Text {
        text: String,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// Inline binary content. `data` must already be base64-encoded.
    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Part::InlineData {
            inline_data: Blob {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub temperature: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types — generateContent response
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Extracts the text of the first candidate's first text part.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|p| p.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: String,
}

/// Pulls the human-readable message out of the API's error envelope.
fn extract_api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<GoogleError>(body)
        .ok()
        .map(|e| e.error.message)
}

// ────────────────────────────────────────────────────────────────────────────
// Transport trait + HTTP implementation
// ────────────────────────────────────────────────────────────────────────────

/// The outbound transport seam. The analyzer talks to the inference service
/// through this trait so tests can script replies and count invocations.
#[async_trait]
pub trait GenerateContent: Send + Sync {
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError>;
}

/// The HTTP client for the Gemini `generateContent` endpoint.
/// One request per call; no retry, no caching.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
}

impl GeminiClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

#[async_trait]
impl GenerateContent for GeminiClient {
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let url = format!("{GEMINI_API_BASE}/models/{MODEL}:generateContent");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_api_error_message(&body).unwrap_or(body);
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: GenerateContentResponse = response.json().await?;

        debug!("Gemini call succeeded: candidates={}", reply.candidates.len());

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_with_camel_case_keys() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::inline_data("application/pdf", "QUJD"),
                    Part::text("job description"),
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                // 0.5 is exactly representable, so the whole-value comparison
                // below stays stable across the f32 -> f64 conversion.
                temperature: 0.5,
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{
                    "parts": [
                        {"inlineData": {"mimeType": "application/pdf", "data": "QUJD"}},
                        {"text": "job description"}
                    ]
                }],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "temperature": 0.5
                }
            })
        );
    }

    #[test]
    fn test_response_text_returns_first_text_part() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "first"}, {"text": "second"}]}}
            ]
        }"#;
        let reply: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(reply.text(), Some("first"));
    }

    #[test]
    fn test_response_text_none_when_no_candidates() {
        let reply: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(reply.text(), None);
    }

    #[test]
    fn test_response_text_none_when_candidate_has_no_content() {
        let raw = r#"{"candidates": [{}]}"#;
        let reply: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(reply.text(), None);
    }

    #[test]
    fn test_extract_api_error_message_from_envelope() {
        let body = r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(
            extract_api_error_message(body),
            Some("Quota exceeded".to_string())
        );
    }

    #[test]
    fn test_extract_api_error_message_falls_through_on_plain_body() {
        assert_eq!(extract_api_error_message("Bad Gateway"), None);
    }
}
