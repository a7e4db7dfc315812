use super::{
    types::{Content, GenerateContentRequest, GenerationConfig, Part},
    GeminiHttp,
};
use crate::{
    error::{Result, SmartMatchError},
    models::{ModelCategory, ModelInfo, ModelProvider, PromptOptimizationRequest, Style},
    provider::{system_instruction, ModelCatalog, PromptOptimizer},
};
use async_trait::async_trait;

const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Clone)]
pub struct TextClient {
    http: GeminiHttp,
    model: String,
    temperature: Option<f32>,
    max_output_tokens: Option<i32>,
}

impl TextClient {
    pub fn new(http: GeminiHttp, model: &str, temperature: Option<f32>) -> Self {
        Self {
            http,
            model: model.to_string(),
            temperature,
            max_output_tokens: None,
        }
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: Option<i32>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Request carrying this client's configured model and sampling settings.
    pub fn request_for(&self, text: &str, style: Style) -> PromptOptimizationRequest {
        PromptOptimizationRequest::new(text, style)
            .with_model(self.model.as_str())
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_output_tokens)
    }

    pub fn build_request(request: &PromptOptimizationRequest, temperature: f32) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user(request.text.clone())],
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::text(system_instruction(request.style))],
            }),
            generation_config: Some(GenerationConfig {
                temperature: Some(request.temperature.unwrap_or(temperature)),
                max_output_tokens: request.max_tokens,
            }),
        }
    }

    /// Returns the trimmed prompt; an empty answer is an error.
    pub async fn generate(&self, request: PromptOptimizationRequest) -> Result<String> {
        let model = request.model_id.as_deref().unwrap_or(&self.model);
        let payload = Self::build_request(&request, DEFAULT_TEMPERATURE);

        log::info!("Optimizing prompt with model: {}", model);
        let response = self.http.generate_content(model, &payload).await?;

        response
            .text()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| {
                SmartMatchError::ResponseError(format!(
                    "Failed to generate optimized prompt ({})",
                    response.describe_empty()
                ))
            })
    }
}

#[async_trait]
impl PromptOptimizer for TextClient {
    async fn optimize(&self, text: &str, style: Style) -> Result<String> {
        self.generate(self.request_for(text, style)).await
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

impl ModelCatalog for TextClient {
    fn supported_models() -> Vec<ModelInfo> {
        vec![
            ModelInfo::new(
                "gemini-2.5-flash",
                "Gemini 2.5 Flash",
                ModelProvider::Google,
                ModelCategory::Text,
                "Fast multimodal model, default prompt optimizer",
            ),
            ModelInfo::new(
                "gemini-2.5-pro",
                "Gemini 2.5 Pro",
                ModelProvider::Google,
                ModelCategory::Text,
                "Higher quality reasoning, slower",
            ),
            ModelInfo::new(
                "gemini-2.5-flash-lite",
                "Gemini 2.5 Flash-Lite",
                ModelProvider::Google,
                ModelCategory::Text,
                "Lowest latency",
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeminiConfig;
    use crate::gemini::test_server;
    use serde_json::json;

    #[test]
    fn test_build_request_auto_style() {
        let request = PromptOptimizationRequest::new("Five tips to improve sleep", Style::Auto);
        let body = serde_json::to_value(TextClient::build_request(&request, 0.7)).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Five tips to improve sleep");
        assert_eq!(body["generationConfig"]["temperature"], json!(0.7f32));
        let instruction = body["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
        assert!(instruction.starts_with("You are an expert visual director"));
        assert!(!instruction.contains("The user has chosen"));
    }

    #[test]
    fn test_build_request_with_style() {
        let request = PromptOptimizationRequest::new("Five tips to improve sleep", Style::Watercolor);
        let body = serde_json::to_value(TextClient::build_request(&request, 0.7)).unwrap();
        let instruction = body["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
        assert!(instruction.contains("Artistic Watercolor painting"));
        // the user text itself is never rewritten
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Five tips to improve sleep");
    }

    #[test]
    fn test_configured_settings_reach_the_payload() {
        let config = GeminiConfig::new().with_api_key("k");
        let client = TextClient::new(GeminiHttp::new(&config).unwrap(), "gemini-2.5-pro", Some(0.2))
            .with_max_output_tokens(Some(300));

        let request = client.request_for("Spring sale", Style::Auto);
        assert_eq!(request.model_id.as_deref(), Some("gemini-2.5-pro"));

        let body = serde_json::to_value(TextClient::build_request(&request, DEFAULT_TEMPERATURE)).unwrap();
        assert_eq!(body["generationConfig"]["temperature"], json!(0.2f32));
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 300);
    }

    #[tokio::test]
    async fn test_optimize_trims_model_output() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "\n  A calm bedroom at dusk  \n" }] } }]
        })
        .to_string();
        let (endpoint, server) = test_server::serve_once(200, body).await;
        let config = GeminiConfig::new().with_api_key("k").with_endpoint(endpoint);
        let client = TextClient::new(GeminiHttp::new(&config).unwrap(), "gemini-2.5-flash", None);

        let prompt = client.optimize("Sleep better", Style::Auto).await.unwrap();
        assert_eq!(prompt, "A calm bedroom at dusk");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_optimize_empty_answer_is_error() {
        let body = json!({ "candidates": [{ "content": { "parts": [{ "text": "   " }] } }] }).to_string();
        let (endpoint, server) = test_server::serve_once(200, body).await;
        let config = GeminiConfig::new().with_api_key("k").with_endpoint(endpoint);
        let client = TextClient::new(GeminiHttp::new(&config).unwrap(), "gemini-2.5-flash", None);

        let err = client.optimize("Sleep better", Style::Auto).await.unwrap_err();
        assert!(matches!(err, SmartMatchError::ResponseError(_)));
        server.await.unwrap();
    }
}
