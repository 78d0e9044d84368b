/*!
 * Structured output parsing.
 *
 * Models often wrap JSON in markdown fences or add a sentence around it.
 * The parser extracts the JSON object, deserializes it into the target
 * content type and checks the invariants serde cannot express.
 */

use crate::content::ContentSchema;
use crate::errors::GenerationError;

/// Extract the JSON object from a raw model response.
///
/// Accepts a bare object (with or without trailing prose), a ```json fence, a
/// plain ``` fence, or falls back to the first complete object after the first
/// `{`, then to the span between the first `{` and the last `}`.
pub fn extract_json(response: &str) -> Option<&str> {
    let trimmed = response.trim();

    if trimmed.starts_with('{') {
        if let Some(object) = leading_value(trimmed) {
            return Some(object);
        }
    }

    if let Some(start) = trimmed.find("```json") {
        if let Some(end) = trimmed[start + 7..].find("```") {
            return Some(trimmed[start + 7..start + 7 + end].trim());
        }
    }

    if let Some(start) = trimmed.find("```") {
        if let Some(end) = trimmed[start + 3..].find("```") {
            let json = trimmed[start + 3..start + 3 + end].trim();
            if json.starts_with('{') {
                return Some(json);
            }
        }
    }

    if let Some(start) = trimmed.find('{') {
        if let Some(object) = leading_value(&trimmed[start..]) {
            return Some(object);
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if end > start {
            return Some(&trimmed[start..=end]);
        }
    }

    None
}

/// The first complete JSON value at the start of `text`, ignoring whatever follows it.
fn leading_value(text: &str) -> Option<&str> {
    let mut values =
        serde_json::Deserializer::from_str(text).into_iter::<serde::de::IgnoredAny>();
    match values.next() {
        Some(Ok(_)) => Some(&text[..values.byte_offset()]),
        _ => None,
    }
}

/// Parse and validate a raw model response as `T`.
pub fn parse_content<T: ContentSchema>(response: &str) -> Result<T, GenerationError> {
    if response.trim().is_empty() {
        return Err(GenerationError::schema(T::KIND, "model returned an empty response"));
    }

    let json = extract_json(response).ok_or_else(|| {
        GenerationError::schema(T::KIND, "response does not contain a JSON object")
    })?;

    let content: T = serde_json::from_str(json)
        .map_err(|e| GenerationError::schema(T::KIND, e.to_string()))?;

    content
        .validate()
        .map_err(|violation| GenerationError::schema(T::KIND, violation.to_string()))?;

    Ok(content)
}
