use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    pub text: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to send request to Gemini API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Gemini API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse Gemini API response: {0}")]
    Decode(String),

    #[error("Gemini blocked the prompt: {0}")]
    Blocked(String),

    #[error("Gemini returned an empty completion")]
    EmptyCompletion,
}

impl ProviderError {
    /// Rate limits, server-side failures and transport hiccups. Worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// One prompt in, one non-streamed completion out.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
    ) -> Result<LlmResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_and_server_errors_are_transient() {
        let rate_limited = ProviderError::Api {
            status: 429,
            body: "quota".into(),
        };
        let unavailable = ProviderError::Api {
            status: 503,
            body: "overloaded".into(),
        };
        assert!(rate_limited.is_transient());
        assert!(unavailable.is_transient());
    }

    #[test]
    fn client_errors_are_not_transient() {
        let not_found = ProviderError::Api {
            status: 404,
            body: "models/gemini-pro is not found".into(),
        };
        assert!(!not_found.is_transient());
        assert!(!ProviderError::EmptyCompletion.is_transient());
        assert!(!ProviderError::Blocked("SAFETY".into()).is_transient());
    }

    #[test]
    fn api_error_message_carries_provider_body() {
        let err = ProviderError::Api {
            status: 404,
            body: "models/gemini-pro is not found for API version v1beta".into(),
        };
        assert!(err.to_string().contains("models/gemini-pro"));
        assert!(err.to_string().contains("404"));
    }
}
