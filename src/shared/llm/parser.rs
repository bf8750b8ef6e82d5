use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use thiserror::Error;

lazy_static! {
    /// Regex for trailing commas before } or ]
    static ref TRAILING_COMMA_RE: Regex = Regex::new(r",(\s*[}\]])").unwrap();

    /// Regex for JavaScript string concatenation ("str1" + "str2")
    static ref JS_STRING_CONCAT_RE: Regex = Regex::new(r#""\s*\+\s*""#).unwrap();
}

/// Why a model reply could not be turned into the requested type.
///
/// Parse failures are surfaced to the caller (the request is not retried), so
/// the outcome is an explicit result instead of a panic or a silent default.
#[derive(Debug, Error)]
pub enum LlmParseError {
    #[error("no JSON object found in response")]
    NoJsonFound,

    #[error("incomplete JSON object in response")]
    IncompleteJson,

    #[error("invalid JSON after all repair attempts: {0}")]
    Invalid(String),
}

/// Parse a model reply into `T`.
///
/// Strategies, in order:
/// 1. Strict parse of the whole (trimmed) reply
/// 2. Extraction: ```json fence, generic fence, or embedded `{`..`}` span
/// 3. Quick fixes (trailing commas, JS string concatenation), then reparse
/// 4. `llm_json` repair, then reparse
pub fn parse_llm_json<T>(text: &str) -> Result<T, LlmParseError>
where
    T: DeserializeOwned,
{
    // Fast path: the model did exactly what it was told
    if let Ok(parsed) = serde_json::from_str::<T>(text.trim()) {
        return Ok(parsed);
    }

    let json_str = extract_json_string(text)?;

    tracing::debug!(
        "Extracted JSON (first 500 chars): {}",
        json_str.chars().take(500).collect::<String>()
    );

    if let Ok(parsed) = serde_json::from_str::<T>(&json_str) {
        return Ok(parsed);
    }

    let fixed_json = apply_quick_fixes(&json_str);
    if let Ok(parsed) = serde_json::from_str::<T>(&fixed_json) {
        tracing::debug!("JSON parsed successfully after quick fixes");
        return Ok(parsed);
    }

    if let Some(repaired) = repair_json(&json_str) {
        match serde_json::from_str::<T>(&repaired) {
            Ok(parsed) => {
                tracing::debug!("JSON parsed successfully after llm_json repair");
                return Ok(parsed);
            }
            Err(e) => return Err(LlmParseError::Invalid(e.to_string())),
        }
    }

    Err(LlmParseError::Invalid(format!(
        "unparseable payload (first 200 chars): {}",
        json_str.chars().take(200).collect::<String>()
    )))
}

/// Extract a JSON string from free-form model text.
///
/// Tries, in order: a ```json fence, a generic ``` fence, a reply that is
/// already plain JSON, and finally the span from the first `{` to the last
/// `}` anywhere in the text.
fn extract_json_string(text: &str) -> Result<String, LlmParseError> {
    if text.contains("```json") {
        return text
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(|s| s.trim().to_string())
            .ok_or(LlmParseError::IncompleteJson);
    }

    if text.contains("```") {
        if let Some(start) = text.find("```") {
            let block_start = start + 3;
            // Skip optional language identifier on the same line
            if let Some(newline_offset) = text[block_start..].find('\n') {
                let json_start = block_start + newline_offset + 1;
                if let Some(end_offset) = text[json_start..].find("```") {
                    return Ok(text[json_start..json_start + end_offset].trim().to_string());
                }
            }
        }
    }

    let trimmed = text.trim();
    if trimmed.starts_with('{') {
        return Ok(trimmed.to_string());
    }

    let start = text.find('{').ok_or(LlmParseError::NoJsonFound)?;
    let end = text.rfind('}').ok_or(LlmParseError::IncompleteJson)?;

    if start < end {
        Ok(text[start..=end].to_string())
    } else {
        Err(LlmParseError::IncompleteJson)
    }
}

/// Fix trailing commas in JSON (common LLM mistake)
///
/// Example: `{"name": "John",}` -> `{"name": "John"}`
fn fix_trailing_commas(json_str: &str) -> String {
    TRAILING_COMMA_RE.replace_all(json_str, "$1").to_string()
}

/// Fix JavaScript string concatenation which is invalid in JSON
///
/// LLMs sometimes output: `"str1" + "str2"` which is invalid JSON.
/// This merges them into: `"str1str2"`
fn fix_js_string_concatenation(json_str: &str) -> String {
    JS_STRING_CONCAT_RE.replace_all(json_str, "").to_string()
}

fn apply_quick_fixes(json_str: &str) -> String {
    let fixed = fix_js_string_concatenation(json_str);
    fix_trailing_commas(&fixed)
}

/// Attempt to repair JSON using the llm_json crate.
///
/// Returns the repaired JSON string, or None if repair fails or panics.
fn repair_json(json_str: &str) -> Option<String> {
    let options = llm_json::RepairOptions::default();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        llm_json::repair_json(json_str, &options)
    }));

    match result {
        Ok(Ok(repaired)) => Some(repaired),
        Ok(Err(e)) => {
            tracing::debug!("JSON repair failed: {:?}", e);
            None
        }
        Err(_) => {
            tracing::warn!("JSON repair panicked");
            None
        }
    }
}
