use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(
        rename = "inlineData",
        alias = "inline_data",
        skip_serializing_if = "Option::is_none"
    )]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default, alias = "mime_type")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    fn first_parts(&self) -> Option<&[Part]> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| content.parts.as_slice())
            .filter(|parts| !parts.is_empty())
    }

    /// Concatenated text of the first candidate, if it has any.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .first_parts()?
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        Some(text).filter(|t| !t.trim().is_empty())
    }

    /// First inline image of the first candidate.
    pub fn inline_image(&self) -> Option<&InlineData> {
        self.first_parts()?
            .iter()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|d| !d.data.is_empty())
    }

    /// Why nothing usable came back, for logging.
    pub fn describe_empty(&self) -> String {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return format!("prompt blocked: {}", reason);
        }
        match self.candidates.first() {
            None => "no candidates".to_string(),
            Some(c) => match (&c.content, c.finish_reason.as_deref()) {
                (_, Some(reason)) if reason != "STOP" => format!("finish reason {}", reason),
                (None, _) => "candidate has no content".to_string(),
                _ => "candidate has no usable parts".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "A neon " }, { "text": "city" }] },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("A neon city"));
        assert!(response.inline_image().is_none());
    }

    #[test]
    fn test_inline_image_skips_text_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "Here is your image" },
                    { "inlineData": { "mimeType": "image/jpeg", "data": "/9j/4AAQ" } }
                ]}
            }]
        }))
        .unwrap();
        let image = response.inline_image().unwrap();
        assert_eq!(image.mime_type.as_deref(), Some("image/jpeg"));
        assert_eq!(image.data, "/9j/4AAQ");
    }

    #[test]
    fn test_describe_empty_responses() {
        let blocked: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();
        assert!(blocked.text().is_none());
        assert_eq!(blocked.describe_empty(), "prompt blocked: SAFETY");

        let stopped: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "IMAGE_SAFETY" }]
        }))
        .unwrap();
        assert!(stopped.inline_image().is_none());
        assert_eq!(stopped.describe_empty(), "finish reason IMAGE_SAFETY");
    }

    #[test]
    fn test_request_serialization_omits_empty_fields() {
        let request = GenerateContentRequest {
            contents: vec![Content::user("hello")],
            system_instruction: None,
            generation_config: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({ "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }] })
        );
    }
}
