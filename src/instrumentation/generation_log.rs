use tracing::info;

use crate::llm::LlmResponse;

/// Per-request summary. Emitted through `tracing` only; the term itself is not recorded.
#[derive(Debug, Clone)]
pub struct GenerationLog {
    pub id: String,
    pub timestamp: String,
    pub model: String,
    pub term_chars: usize,
    pub provider_latency_ms: u64,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub niche_count: usize,
    pub dropped_count: usize,
    /// Well-formed records cut by the 50-record cap.
    pub truncated_count: usize,
    pub status_code: u16,
}

impl GenerationLog {
    pub fn start(model: &str, term: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            model: model.to_string(),
            term_chars: term.chars().count(),
            provider_latency_ms: 0,
            input_tokens: 0,
            output_tokens: 0,
            niche_count: 0,
            dropped_count: 0,
            truncated_count: 0,
            status_code: 200,
        }
    }

    pub fn record_completion(&mut self, response: &LlmResponse, latency_ms: u64) {
        self.provider_latency_ms = latency_ms;
        self.input_tokens = response.input_tokens;
        self.output_tokens = response.output_tokens;
    }

    pub fn total_tokens(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    pub fn summary(&self) -> String {
        format!(
            "Status: {} | Model: {} | Niches: {} (dropped {}, truncated {}) | Provider latency: {:.1}s | Tokens: {}",
            self.status_code,
            self.model,
            self.niche_count,
            self.dropped_count,
            self.truncated_count,
            self.provider_latency_ms as f64 / 1000.0,
            self.total_tokens(),
        )
    }

    pub fn emit(&self) {
        info!(
            id = %self.id,
            timestamp = %self.timestamp,
            model = %self.model,
            term_chars = self.term_chars,
            provider_latency_ms = self.provider_latency_ms,
            input_tokens = self.input_tokens,
            output_tokens = self.output_tokens,
            niche_count = self.niche_count,
            dropped_count = self.dropped_count,
            truncated_count = self.truncated_count,
            status_code = self.status_code,
            "Generation finished"
        );
    }
}
