pub mod client;
pub mod provider;
pub mod retry;

pub use client::GeminiClient;
pub use provider::{CompletionProvider, LlmResponse, ProviderError};
pub use retry::RetryingProvider;
