use serde_json::Value;
use tracing::error;

use super::error::GenerationError;

const FENCE: &str = "```";
const JSON_TAG: &str = "json";

/// Strips markdown code fences (```` ``` ```` and ```` ```json ````, any case) and trims.
pub fn defence(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find(FENCE) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + FENCE.len()..];
        if rest
            .get(..JSON_TAG.len())
            .is_some_and(|tag| tag.eq_ignore_ascii_case(JSON_TAG))
        {
            rest = &rest[JSON_TAG.len()..];
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

/// Slice from the first `[` to the last `]`, inclusive.
pub fn isolate_array(text: &str) -> Result<&str, GenerationError> {
    match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if end > start => Ok(&text[start..=end]),
        _ => Err(GenerationError::Extraction),
    }
}

pub fn parse_array(payload: &str) -> Result<Vec<Value>, GenerationError> {
    serde_json::from_str(payload).map_err(GenerationError::Parse)
}

/// De-fence, isolate and parse a raw completion into its array elements.
pub fn extract_array(raw: &str) -> Result<Vec<Value>, GenerationError> {
    let cleaned = defence(raw);
    let result = isolate_array(&cleaned).and_then(parse_array);
    if let Err(e) = &result {
        error!(error = %e, raw = %raw, "{}", failure_context(e));
    }
    result
}

fn failure_context(error: &GenerationError) -> &'static str {
    match error {
        GenerationError::Extraction => "Failed to isolate JSON array from completion",
        GenerationError::Parse(_) => "Failed to parse JSON array from completion",
        _ => "Failed to extract JSON array from completion",
    }
}
