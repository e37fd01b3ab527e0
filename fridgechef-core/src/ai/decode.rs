//! Decoding of schema-constrained endpoint replies.
//!
//! The endpoint is asked for JSON matching a schema, but its text is untrusted.
//! Malformed JSON and shape mismatches are errors; a missing or null list
//! field is treated as an empty list.

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use super::AiError;

/// Strip surrounding whitespace and a Markdown code fence, if present.
pub(crate) fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };

    // Drop the info string ("json") on the opening fence line.
    match body.split_once('\n') {
        Some((_, inner)) => inner.trim(),
        None => body.trim(),
    }
}

/// Decode `{ "<field>": [T, ...] }` from a reply.
pub(crate) fn decode_list_field<T: DeserializeOwned>(
    content: &str,
    field: &str,
) -> Result<Vec<T>, AiError> {
    let json = strip_code_fences(content);

    let value: JsonValue = serde_json::from_str(json)
        .map_err(|e| AiError::ParseError(format!("Response is not valid JSON: {}", e)))?;

    let JsonValue::Object(mut object) = value else {
        return Err(AiError::ParseError(format!(
            "Expected a JSON object with a \"{}\" field",
            field
        )));
    };

    match object.remove(field) {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(list) => serde_json::from_value(list).map_err(|e| {
            AiError::ParseError(format!("Field \"{}\" does not match schema: {}", field, e))
        }),
    }
}
