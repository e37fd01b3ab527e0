use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize};

/// A recipe suggested by the inference endpoint.
///
/// Immutable once received. Recipes have no identity beyond their position in
/// the session's recipe list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub title: String,
    pub description: String,
    /// Cooking time in whole minutes.
    #[serde(deserialize_with = "deserialize_minutes")]
    pub cooking_time: u32,
    pub ingredients: Vec<String>,
    /// Steps in the order they should be carried out.
    pub instructions: Vec<String>,
}

/// Accept `30` as well as `30.0`; models occasionally emit whole numbers as floats.
fn deserialize_minutes<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = serde_json::Number::deserialize(deserializer)?;

    if let Some(minutes) = value.as_u64() {
        return u32::try_from(minutes)
            .map_err(|_| D::Error::custom(format!("cookingTime out of range: {}", minutes)));
    }

    match value.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) => Ok(f as u32),
        _ => Err(D::Error::custom(format!(
            "cookingTime must be a non-negative whole number of minutes, got {}",
            value
        ))),
    }
}

/// A still frame grabbed from the camera.
///
/// Consumed by ingredient identification and not kept afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    /// Encoded image bytes.
    pub data: Vec<u8>,
    /// MIME type of `data` (e.g., "image/jpeg").
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
}

impl CapturedImage {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Standard base64 encoding of the image bytes.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    /// `data:` URL suitable for inlining the image in a request.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}
