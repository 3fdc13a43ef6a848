//! Resume analysis — encodes the uploaded document, builds the multi-part
//! Gemini request, and validates the model's JSON verdict.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::analysis::prompts::ANALYSIS_PROMPT;
use crate::analysis::result::AnalysisResult;
use crate::errors::AppError;
use crate::gemini::{Content, GenerateContent, GenerateContentRequest, GenerationConfig, Part};

/// Sampling temperature for analysis calls. Low on purpose: scoring should
/// be factual, not creative.
const ANALYSIS_TEMPERATURE: f32 = 0.3;

/// Turns an uploaded resume plus a job description into one scored
/// [`AnalysisResult`] via the inference service.
///
/// Holds no mutable state: every call is an independent request/response
/// round-trip with no caching and no retry.
#[derive(Clone)]
pub struct ResumeAnalyzer {
    api_key: Option<String>,
    transport: Arc<dyn GenerateContent>,
}

impl ResumeAnalyzer {
    pub fn new(api_key: Option<String>, transport: Arc<dyn GenerateContent>) -> Self {
        Self { api_key, transport }
    }

    /// Runs one analysis. The credential check comes first so a
    /// misconfigured deployment never sends a request.
    pub async fn analyze(
        &self,
        document: &[u8],
        document_mime_type: &str,
        job_description: &str,
    ) -> Result<AnalysisResult, AppError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Configuration(
                "Gemini API key is not configured. Please set the GEMINI_API_KEY environment variable."
                    .to_string(),
            )
        })?;

        let request = build_request(document, document_mime_type, job_description);

        let reply = self
            .transport
            .generate(api_key, &request)
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to analyze resume: {e}")))?;

        let text = reply.text().ok_or_else(|| {
            AppError::MalformedResponse("model returned no text content".to_string())
        })?;

        let payload = extract_json_payload(text)?;

        let value: serde_json::Value = serde_json::from_str(payload).map_err(|e| {
            AppError::MalformedResponse(format!("model reply was not valid JSON: {e}"))
        })?;

        AnalysisResult::from_reply(&value)
    }
}

/// Assembles the multi-part request: document first, then the raw job
/// description, then the instruction prompt.
fn build_request(
    document: &[u8],
    document_mime_type: &str,
    job_description: &str,
) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part::inline_data(document_mime_type, BASE64.encode(document)),
                Part::text(job_description),
                Part::text(ANALYSIS_PROMPT),
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            temperature: ANALYSIS_TEMPERATURE,
        },
    }
}

/// Returns the JSON payload of a model reply.
///
/// Edge cases, spelled out:
/// - no fence: the trimmed text as-is
/// - ```` ```tag ... ``` ````: the inner content, trimmed
/// - an opening fence with no closing fence: rejected as malformed
fn extract_json_payload(text: &str) -> Result<&str, AppError> {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return Ok(trimmed);
    };

    // An optional language tag sits between the opening fence and the payload.
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());

    match rest.strip_suffix("```") {
        Some(inner) => Ok(inner.trim()),
        None => Err(AppError::MalformedResponse(
            "model reply opened a code fence without closing it".to_string(),
        )),
    }
}
