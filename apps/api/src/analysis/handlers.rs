//! Axum route handlers for the Analysis API.

use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;

use crate::analysis::result::AnalysisResult;
use crate::errors::AppError;
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";
const JOB_DESCRIPTION_FIELD: &str = "job_description";
const PDF_MIME_TYPE: &str = "application/pdf";

/// POST /api/v1/analyze
///
/// Multipart form: a `resume` PDF part and a `job_description` text part.
/// Input validation happens here, before the analyzer is ever invoked; the
/// analyzer itself only checks its own credential.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let mut resume: Option<(Bytes, String)> = None;
    let mut job_description = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        // The field name is copied out first because reading the body
        // consumes the field.
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            RESUME_FIELD => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Could not read the resume upload: {e}"))
                })?;
                resume = Some((data, content_type));
            }
            JOB_DESCRIPTION_FIELD => {
                job_description = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Could not read the job description: {e}"))
                })?;
            }
            _ => {} // unknown fields are ignored
        }
    }

    let (document, content_type) = validate_resume_upload(resume)?;
    validate_job_description(&job_description)?;

    let result = state
        .analyzer
        .analyze(&document, &content_type, &job_description)
        .await?;

    Ok(Json(result))
}

fn validate_resume_upload(resume: Option<(Bytes, String)>) -> Result<(Bytes, String), AppError> {
    let (document, content_type) =
        resume.ok_or_else(|| AppError::Validation("Please upload a resume PDF.".to_string()))?;

    if content_type != PDF_MIME_TYPE {
        return Err(AppError::Validation("Please upload a PDF file.".to_string()));
    }

    if document.is_empty() {
        return Err(AppError::Validation(
            "The uploaded resume file is empty.".to_string(),
        ));
    }

    Ok((document, content_type))
}

fn validate_job_description(job_description: &str) -> Result<(), AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter the job description.".to_string(),
        ));
    }
    Ok(())
}
