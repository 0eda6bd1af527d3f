use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::provider::{CompletionProvider, LlmResponse, ProviderError};

const INITIAL_BACKOFF: Duration = Duration::from_millis(500);
pub const MAX_BACKOFF: Duration = Duration::from_secs(8);

/// Wraps a provider and retries transient failures with exponential backoff.
pub struct RetryingProvider<P> {
    inner: P,
    max_retries: u32,
    initial_backoff: Duration,
}

impl<P> RetryingProvider<P> {
    pub fn new(inner: P, max_retries: u32) -> Self {
        Self {
            inner,
            max_retries,
            initial_backoff: INITIAL_BACKOFF,
        }
    }

    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }
}

#[async_trait]
impl<P: CompletionProvider> CompletionProvider for RetryingProvider<P> {
    async fn complete(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
    ) -> Result<LlmResponse, ProviderError> {
        let mut attempt = 0;
        let mut backoff = self.initial_backoff;
        loop {
            match self.inner.complete(api_key, model, prompt).await {
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        attempt,
                        max_retries = self.max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Transient provider failure, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
                result => return result,
            }
        }
    }
}
