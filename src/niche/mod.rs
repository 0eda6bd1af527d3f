pub mod error;
pub mod extract;
pub mod model;
pub mod prompt;
pub mod record;

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{error, info};

use crate::config::Config;
use crate::instrumentation::GenerationLog;
use crate::llm::{CompletionProvider, GeminiClient, RetryingProvider};

pub use error::{GenerationError, NormalizedError};
pub use record::{NicheRecord, Potential, Validation};

pub const PROMPT_REQUIRED: &str = "Prompt is required";
pub const MISSING_API_KEY: &str = "GEMINI_API_KEY is not defined in environment variables";
pub const GENERATION_FAILED: &str = "AI Generation failed";
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorBody {
    fn message(error: &str) -> Self {
        Self {
            error: error.to_string(),
            details: None,
            hint: None,
        }
    }

    pub fn generation_failed(normalized: &NormalizedError) -> Self {
        Self {
            error: GENERATION_FAILED.to_string(),
            details: Some(normalized.message.clone()),
            hint: normalized.hint.clone(),
        }
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self {
            error: INTERNAL_SERVER_ERROR.to_string(),
            details: Some(details.into()),
            hint: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerateReply {
    Niches(Vec<NicheRecord>),
    Failed { status_code: u16, body: ErrorBody },
}

impl GenerateReply {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Niches(_) => 200,
            Self::Failed { status_code, .. } => *status_code,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Niches(niches) => serde_json::json!({ "niches": niches }),
            Self::Failed { body, .. } => serde_json::to_value(body).unwrap_or_else(|e| {
                serde_json::json!({ "error": INTERNAL_SERVER_ERROR, "details": e.to_string() })
            }),
        }
    }
}

pub struct NichePipeline {
    config: Config,
    provider: Arc<dyn CompletionProvider>,
}

impl NichePipeline {
    pub fn new(config: Config, provider: Arc<dyn CompletionProvider>) -> Self {
        Self { config, provider }
    }

    /// Gemini client from `config`, wrapped for retries when `max_retries > 0`.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let client = GeminiClient::new(&config.gemini_base_url, config.request_timeout)?;
        let provider: Arc<dyn CompletionProvider> = if config.max_retries > 0 {
            Arc::new(RetryingProvider::new(client, config.max_retries))
        } else {
            Arc::new(client)
        };
        Ok(Self::new(config, provider))
    }

    pub async fn generate(&self, term: &str) -> GenerateReply {
        self.generate_with_log(term).await.0
    }

    /// Like `generate`, also returning the summary when the provider was reached.
    pub async fn generate_with_log(&self, term: &str) -> (GenerateReply, Option<GenerationLog>) {
        // Blank check only; the prompt carries the term as given.
        if term.trim().is_empty() {
            info!("Rejecting request without prompt");
            return (
                GenerateReply::Failed {
                    status_code: 400,
                    body: ErrorBody::message(PROMPT_REQUIRED),
                },
                None,
            );
        }

        let Some(api_key) = self.config.gemini_api_key.as_deref() else {
            error!("GEMINI_API_KEY is not configured");
            return (
                GenerateReply::Failed {
                    status_code: 500,
                    body: ErrorBody::message(MISSING_API_KEY),
                },
                None,
            );
        };

        let model = model::resolve_model(self.config.gemini_model.as_deref());
        let mut log = GenerationLog::start(&model, term);

        let reply = match self.run(api_key, &model, term, &mut log).await {
            Ok(niches) => GenerateReply::Niches(niches),
            Err(e) => {
                let normalized = NormalizedError::from(&e);
                error!(
                    status_code = normalized.status_code,
                    message = %normalized.message,
                    hint = normalized.hint.as_deref().unwrap_or(""),
                    "AI Generation failed"
                );
                GenerateReply::Failed {
                    status_code: normalized.status_code,
                    body: ErrorBody::generation_failed(&normalized),
                }
            }
        };

        log.status_code = reply.status_code();
        log.emit();
        (reply, Some(log))
    }

    async fn run(
        &self,
        api_key: &str,
        model: &str,
        term: &str,
        log: &mut GenerationLog,
    ) -> Result<Vec<NicheRecord>, GenerationError> {
        let prompt = prompt::build_prompt(term);

        let llm_start = Instant::now();
        let response = self.provider.complete(api_key, model, &prompt).await?;
        log.record_completion(&response, llm_start.elapsed().as_millis() as u64);

        let items = extract::extract_array(&response.text)?;
        let total = items.len();

        let mut niches = match record::validate(items) {
            Validation::Valid(records) => records,
            Validation::Invalid(reason) => return Err(GenerationError::Invalid(reason)),
        };
        log.dropped_count = total - niches.len();
        log.truncated_count = niches.len().saturating_sub(prompt::NICHE_COUNT);
        niches.truncate(prompt::NICHE_COUNT);
        log.niche_count = niches.len();

        Ok(niches)
    }
}
