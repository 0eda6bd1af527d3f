use std::fmt::Display;

use serde::Serialize;
use thiserror::Error;

use crate::llm::ProviderError;

pub const UNKNOWN_ERROR: &str = "Unknown error";

pub const DEPRECATED_MODEL_HINT: &str =
    "Model gemini-pro is deprecated. Remove GEMINI_MODEL or set it to a Gemini 1.5 model.";

/// Failures after the request has been accepted and handed to the provider.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("JSON array markers not found in completion")]
    Extraction,

    #[error("Completion is not a valid JSON array: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("No well-formed niche records in completion: {0}")]
    Invalid(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// The only error shape that crosses the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub status_code: u16,
}

struct ClassificationRule {
    matches: fn(&str) -> bool,
    status_code: u16,
    hint: &'static str,
}

// First match wins. Unmatched messages are 500 with no hint.
const RULES: &[ClassificationRule] = &[ClassificationRule {
    matches: mentions_deprecated_model,
    status_code: 400,
    hint: DEPRECATED_MODEL_HINT,
}];

fn mentions_deprecated_model(message: &str) -> bool {
    message.contains("models/gemini-pro")
}

impl NormalizedError {
    /// Never fails. A missing or blank failure becomes `"Unknown error"`.
    pub fn from_failure(failure: Option<&dyn Display>) -> Self {
        let message = failure
            .map(|f| f.to_string())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string());

        match RULES.iter().find(|rule| (rule.matches)(&message)) {
            Some(rule) => Self {
                message,
                hint: Some(rule.hint.to_string()),
                status_code: rule.status_code,
            },
            None => Self {
                message,
                hint: None,
                status_code: 500,
            },
        }
    }
}

impl From<&GenerationError> for NormalizedError {
    fn from(error: &GenerationError) -> Self {
        Self::from_failure(Some(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deprecated_model_message_is_client_error_with_hint() {
        let err = GenerationError::Provider(ProviderError::Api {
            status: 404,
            body: "models/gemini-pro is not found for API version v1beta".into(),
        });
        let normalized = NormalizedError::from(&err);
        assert_eq!(normalized.status_code, 400);
        assert_eq!(normalized.hint.as_deref(), Some(DEPRECATED_MODEL_HINT));
        assert!(normalized.message.contains("models/gemini-pro"));
    }

    #[test]
    fn other_messages_are_server_errors_without_hint() {
        let err = GenerationError::Provider(ProviderError::Api {
            status: 403,
            body: "API key not valid".into(),
        });
        let normalized = NormalizedError::from(&err);
        assert_eq!(normalized.status_code, 500);
        assert!(normalized.hint.is_none());

        let normalized = NormalizedError::from(&GenerationError::Extraction);
        assert_eq!(normalized.status_code, 500);
        assert_eq!(normalized.message, "JSON array markers not found in completion");
    }

    #[test]
    fn plain_string_failure_keeps_its_text() {
        let normalized = NormalizedError::from_failure(Some(&"socket hang up"));
        assert_eq!(normalized.message, "socket hang up");
        assert_eq!(normalized.status_code, 500);
    }

    #[test]
    fn plain_string_mentioning_deprecated_model_is_classified() {
        let normalized =
            NormalizedError::from_failure(Some(&"[404] models/gemini-pro-vision unavailable"));
        assert_eq!(normalized.status_code, 400);
        assert!(normalized.hint.is_some());
    }

    #[test]
    fn missing_or_blank_failure_is_unknown_error() {
        let missing = NormalizedError::from_failure(None);
        assert_eq!(missing.message, UNKNOWN_ERROR);
        assert_eq!(missing.status_code, 500);

        let blank = NormalizedError::from_failure(Some(&"   "));
        assert_eq!(blank.message, UNKNOWN_ERROR);
    }

    #[test]
    fn serializes_without_absent_hint() {
        let normalized = NormalizedError::from_failure(Some(&"boom"));
        let json = serde_json::to_value(&normalized).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "boom", "statusCode": 500 }));
    }
}
