use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::provider::{CompletionProvider, LlmResponse, ProviderError};

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
}

// generateContent wire format
#[derive(Debug, Clone, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

impl GeminiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        if model.starts_with("models/") {
            format!("{}/{}:generateContent", self.base_url, model)
        } else {
            format!("{}/models/{}:generateContent", self.base_url, model)
        }
    }
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    async fn complete(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
    ) -> Result<LlmResponse, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        parse_generate_content(&body)
    }
}

fn parse_generate_content(body: &str) -> Result<LlmResponse, ProviderError> {
    let api_response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;

    if api_response.candidates.is_empty() {
        if let Some(reason) = api_response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
        {
            return Err(ProviderError::Blocked(reason));
        }
    }

    let text = api_response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ProviderError::EmptyCompletion);
    }

    let (input_tokens, output_tokens) = api_response
        .usage_metadata
        .map(|u| (u.prompt_token_count, u.candidates_token_count))
        .unwrap_or((0, 0));

    Ok(LlmResponse {
        text,
        input_tokens,
        output_tokens,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_prefixes_bare_model_ids() {
        let client = GeminiClient::new("https://example.test/v1beta/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(
            client.endpoint("models/gemini-2.5-flash"),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn joins_candidate_parts_and_reads_usage() {
        let body = r#"{
            "candidates": [{"content": {"role": "model", "parts": [{"text": "[{\"a\":"}, {"text": "1}]"}]}}],
            "usageMetadata": {"promptTokenCount": 310, "candidatesTokenCount": 42}
        }"#;
        let response = parse_generate_content(body).unwrap();
        assert_eq!(response.text, "[{\"a\":1}]");
        assert_eq!(response.input_tokens, 310);
        assert_eq!(response.output_tokens, 42);
    }

    #[test]
    fn blocked_prompt_without_candidates() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let err = parse_generate_content(body).unwrap_err();
        assert!(matches!(err, ProviderError::Blocked(reason) if reason == "SAFETY"));
    }

    #[test]
    fn candidate_without_text_is_empty_completion() {
        let body = r#"{"candidates": [{"content": {"parts": []}}]}"#;
        assert!(matches!(
            parse_generate_content(body),
            Err(ProviderError::EmptyCompletion)
        ));
    }

    #[test]
    fn non_json_body_is_decode_error() {
        assert!(matches!(
            parse_generate_content("<html>bad gateway</html>"),
            Err(ProviderError::Decode(_))
        ));
    }
}
