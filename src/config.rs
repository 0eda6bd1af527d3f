use std::time::Duration;

use anyhow::{Context, Result};

/// Upper bound for `GEMINI_MAX_RETRIES`.
pub const MAX_RETRIES_LIMIT: u32 = 10;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct Config {
    /// Absent when `GEMINI_API_KEY` is unset or blank. Checked per request, not at startup.
    pub gemini_api_key: Option<String>,
    /// Raw `GEMINI_MODEL` override; resolved per request by `niche::model::resolve_model`.
    pub gemini_model: Option<String>,
    pub gemini_base_url: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            gemini_api_key: non_blank_var("GEMINI_API_KEY"),
            gemini_model: std::env::var("GEMINI_MODEL").ok(),
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.into()),
            request_timeout: Duration::from_secs(
                std::env::var("GEMINI_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "120".into())
                    .parse()
                    .context("GEMINI_TIMEOUT_SECS must be a number")?,
            ),
            max_retries: parse_max_retries(
                &std::env::var("GEMINI_MAX_RETRIES").unwrap_or_else(|_| "0".into()),
            )?,
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".into())
                .parse()
                .context("API_PORT must be a port number")?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: None,
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.into(),
            request_timeout: Duration::from_secs(120),
            max_retries: 0,
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

fn parse_max_retries(raw: &str) -> Result<u32> {
    let retries: u32 = raw
        .trim()
        .parse()
        .context("GEMINI_MAX_RETRIES must be a number")?;
    if retries > MAX_RETRIES_LIMIT {
        anyhow::bail!("GEMINI_MAX_RETRIES must be at most {MAX_RETRIES_LIMIT}, got {retries}");
    }
    Ok(retries)
}

fn non_blank_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
