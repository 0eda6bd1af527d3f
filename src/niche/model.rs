use tracing::warn;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

const DEPRECATED_MODELS: &[&str] = &["gemini-pro", "models/gemini-pro", "gemini-pro-vision"];

/// Picks the model for a request. Blank or deprecated overrides fall back to the default.
pub fn resolve_model(configured: Option<&str>) -> String {
    let trimmed = configured.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return DEFAULT_GEMINI_MODEL.to_string();
    }

    if DEPRECATED_MODELS.contains(&trimmed) {
        warn!(
            configured = trimmed,
            fallback = DEFAULT_GEMINI_MODEL,
            "GEMINI_MODEL is deprecated, falling back to default"
        );
        return DEFAULT_GEMINI_MODEL.to_string();
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_uses_default() {
        assert_eq!(resolve_model(None), DEFAULT_GEMINI_MODEL);
        assert_eq!(resolve_model(Some("")), DEFAULT_GEMINI_MODEL);
        assert_eq!(resolve_model(Some(" ")), DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn deprecated_ids_use_default() {
        assert_eq!(resolve_model(Some("gemini-pro")), DEFAULT_GEMINI_MODEL);
        assert_eq!(resolve_model(Some(" models/gemini-pro ")), DEFAULT_GEMINI_MODEL);
        assert_eq!(resolve_model(Some("gemini-pro-vision")), DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn custom_model_passes_through_trimmed() {
        assert_eq!(resolve_model(Some("custom-model-x")), "custom-model-x");
        assert_eq!(resolve_model(Some("  gemini-1.5-pro\n")), "gemini-1.5-pro");
    }
}
