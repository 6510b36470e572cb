//! Gemini `generateContent` wire format.
//!
//! - Request: `contents[0].parts` holds the instruction text and the inline image.
//! - `generationConfig` carries `temperature` and `maxOutputTokens`.
//! - Response: `candidates[0].content.parts[0].text`.
//! - The API key travels as the `?key=` query parameter, not in headers.

use serde::{Deserialize, Serialize};

use crate::config::ClassifierConfig;
use crate::image::ImagePayload;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
    /// functionCall, executableCode and the like.
    Other(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationConfig {
    pub temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: u32,
}

impl GenerateRequest {
    pub fn new(instruction: String, image: &ImagePayload, config: &ClassifierConfig) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: instruction },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type().to_string(),
                            data: image.base64().to_string(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: config.temperature,
                max_output_tokens: config.max_output_tokens,
            },
        }
    }
}

/// Only the fields the client reads; everything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(rename = "finishReason", default)]
    pub finish_reason: Option<String>,
}

impl GenerateResponse {
    pub fn candidate_count(&self) -> usize {
        self.candidates.as_ref().map_or(0, Vec::len)
    }

    /// Text of the first part of the first candidate.
    pub fn first_text(&self) -> Option<&str> {
        let candidate = self.candidates.as_ref()?.first()?;
        match candidate.content.as_ref()?.parts.first()? {
            Part::Text { text } => Some(text.as_str()),
            Part::InlineData { .. } | Part::Other(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::SelectedFile;

    #[test]
    fn request_serializes_to_gemini_shape() {
        let image =
            ImagePayload::from_file(SelectedFile::new("a.jpg", "image/jpeg", vec![1, 2, 3]))
                .unwrap();
        let req = GenerateRequest::new("describe".into(), &image, &ClassifierConfig::default());
        let body = serde_json::to_value(&req).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "describe");
        assert_eq!(
            body["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "image/jpeg"
        );
        assert_eq!(body["contents"][0]["parts"][1]["inline_data"]["data"], "AQID");
        assert_eq!(body["generationConfig"]["temperature"], 0.1);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1000);
    }

    #[test]
    fn response_first_text() {
        let body = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{"text": "{}"}], "role": "model" },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "totalTokenCount": 8 }
        });
        let resp: GenerateResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.candidate_count(), 1);
        assert_eq!(resp.first_text(), Some("{}"));
    }

    #[test]
    fn response_without_candidates() {
        let resp: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.candidate_count(), 0);
        assert_eq!(resp.first_text(), None);

        let resp: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert_eq!(resp.candidate_count(), 1);
        assert_eq!(resp.first_text(), None);

        let resp: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"functionCall":{"name":"f"}}]}}]}"#,
        )
        .unwrap();
        assert_eq!(resp.candidate_count(), 1);
        assert_eq!(resp.first_text(), None);
    }
}
