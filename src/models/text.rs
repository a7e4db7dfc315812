use super::Style;
use serde::{Deserialize, Serialize};

/// Input of the first pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptOptimizationRequest {
    pub text: String,
    pub style: Style,
    pub model_id: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}

impl PromptOptimizationRequest {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
            model_id: None,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature.or(self.temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<i32>) -> Self {
        self.max_tokens = max_tokens.or(self.max_tokens);
        self
    }
}

#[derive(Serialize, Deserialize)]
pub struct LlamaResponse {
    pub generation: String,
    pub prompt_token_count: Option<i32>,
    pub generation_token_count: Option<i32>,
    pub stop_reason: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct TitanTextResult {
    #[serde(rename = "outputText")]
    pub output_text: String,
    #[serde(rename = "completionReason")]
    pub completion_reason: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct TitanTextResponse {
    pub results: Vec<TitanTextResult>,
}

#[derive(Serialize, Deserialize)]
pub struct ClaudeContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ClaudeResponse {
    pub content: Vec<ClaudeContentBlock>,
    pub stop_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_keep_existing_values_on_none() {
        let request = PromptOptimizationRequest::new("Spring sale", Style::Anime)
            .with_model("gemini-2.5-pro")
            .with_temperature(Some(0.2))
            .with_max_tokens(Some(256))
            .with_temperature(None);
        assert_eq!(request.model_id.as_deref(), Some("gemini-2.5-pro"));
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.max_tokens, Some(256));
    }
}
