use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;

/// The structured outcome of one analysis request.
///
/// `strengths` and `improvements` keep the model's ordering — the order the
/// client presents them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: i64,
    pub analysis: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

impl AnalysisResult {
    /// Builds a result from the model's parsed JSON reply.
    ///
    /// Shape checks only: `score` must be an integer, `analysis` a string,
    /// `strengths` and `improvements` lists of strings (either may be empty).
    /// Any mismatch rejects the whole reply — a partially-valid result is
    /// never produced. The 0–100 score range is a prompt contract, not a
    /// validation rule, and is intentionally not enforced here.
    pub fn from_reply(value: &Value) -> Result<Self, AppError> {
        let score = value
            .get("score")
            .and_then(Value::as_i64)
            .ok_or_else(|| invalid_structure("`score` must be an integer"))?;

        let analysis = value
            .get("analysis")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid_structure("`analysis` must be a string"))?
            .to_string();

        let strengths = string_list(value, "strengths")?;
        let improvements = string_list(value, "improvements")?;

        Ok(AnalysisResult {
            score,
            analysis,
            strengths,
            improvements,
        })
    }
}

fn string_list(value: &Value, field: &str) -> Result<Vec<String>, AppError> {
    let items = value
        .get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| invalid_structure(&format!("`{field}` must be a list")))?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| invalid_structure(&format!("`{field}` must contain only strings")))
        })
        .collect()
}

fn invalid_structure(detail: &str) -> AppError {
    AppError::MalformedResponse(format!("model reply has invalid structure: {detail}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_reply_preserves_field_values() {
        let reply = json!({
            "score": 87,
            "analysis": "Strong match",
            "strengths": ["A", "B"],
            "improvements": ["C"]
        });

        let result = AnalysisResult::from_reply(&reply).unwrap();
        assert_eq!(result.score, 87);
        assert_eq!(result.analysis, "Strong match");
        assert_eq!(result.strengths, vec!["A", "B"]);
        assert_eq!(result.improvements, vec!["C"]);
    }

    #[test]
    fn test_from_reply_allows_empty_lists() {
        let reply = json!({
            "score": 0,
            "analysis": "No overlap at all.",
            "strengths": [],
            "improvements": []
        });

        let result = AnalysisResult::from_reply(&reply).unwrap();
        assert!(result.strengths.is_empty());
        assert!(result.improvements.is_empty());
    }

    #[test]
    fn test_from_reply_ignores_extra_fields() {
        let reply = json!({
            "score": 55,
            "analysis": "Partial match.",
            "strengths": ["A"],
            "improvements": ["B"],
            "confidence": 0.9
        });

        assert!(AnalysisResult::from_reply(&reply).is_ok());
    }

    #[test]
    fn test_from_reply_rejects_missing_strengths() {
        let reply = json!({
            "score": 87,
            "analysis": "Strong match",
            "improvements": ["C"]
        });

        let err = AnalysisResult::from_reply(&reply).unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn test_from_reply_rejects_strengths_as_string() {
        let reply = json!({
            "score": 87,
            "analysis": "Strong match",
            "strengths": "A, B",
            "improvements": ["C"]
        });

        let err = AnalysisResult::from_reply(&reply).unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn test_from_reply_rejects_non_string_list_items() {
        let reply = json!({
            "score": 87,
            "analysis": "Strong match",
            "strengths": ["A", 2],
            "improvements": ["C"]
        });

        let err = AnalysisResult::from_reply(&reply).unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn test_from_reply_rejects_textual_score() {
        let reply = json!({
            "score": "87",
            "analysis": "Strong match",
            "strengths": ["A"],
            "improvements": ["C"]
        });

        let err = AnalysisResult::from_reply(&reply).unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn test_from_reply_rejects_fractional_score() {
        let reply = json!({
            "score": 87.5,
            "analysis": "Strong match",
            "strengths": ["A"],
            "improvements": ["C"]
        });

        let err = AnalysisResult::from_reply(&reply).unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn test_from_reply_rejects_numeric_analysis() {
        let reply = json!({
            "score": 87,
            "analysis": 42,
            "strengths": ["A"],
            "improvements": ["C"]
        });

        let err = AnalysisResult::from_reply(&reply).unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }
}
