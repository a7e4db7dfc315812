use super::invoke_json;
use crate::{
    error::{Result, SmartMatchError},
    models::{
        ClaudeResponse, LlamaResponse, ModelCategory, ModelInfo, ModelProvider,
        PromptOptimizationRequest, Style, TitanTextResponse,
    },
    provider::{system_instruction, ModelCatalog, PromptOptimizer},
};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client;
use serde_json::json;

const DEFAULT_MAX_TOKENS: i32 = 512;
const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Clone)]
pub struct TextClient {
    client: Client,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<i32>,
}

impl TextClient {
    pub fn new(client: Client, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_sampling(mut self, temperature: Option<f32>, max_tokens: Option<i32>) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Request carrying this client's configured model and sampling settings.
    pub fn request_for(&self, text: &str, style: Style) -> PromptOptimizationRequest {
        PromptOptimizationRequest::new(text, style)
            .with_model(self.model.as_str())
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
    }

    pub async fn generate(&self, request: PromptOptimizationRequest) -> Result<String> {
        let model_id = request.model_id.as_deref().unwrap_or(&self.model);
        let payload = Self::build_request_payload(&request, model_id)?;

        log::info!("Optimizing prompt with Bedrock model: {}", model_id);
        let body = invoke_json(&self.client, model_id, &payload).await?;

        let text = Self::parse_response(&body, model_id)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(SmartMatchError::ResponseError(
                "Failed to generate optimized prompt (empty output)".into(),
            ));
        }
        Ok(text.to_string())
    }

    pub fn build_request_payload(
        request: &PromptOptimizationRequest,
        model_id: &str,
    ) -> Result<serde_json::Value> {
        let instruction = system_instruction(request.style);
        let max_tokens = request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
        let temperature = request.temperature.unwrap_or(DEFAULT_TEMPERATURE);
        // families without a system field get the instruction inline
        let inline_prompt = format!("{}\n\nText:\n{}\n\nPrompt:", instruction, request.text);

        let provider = ModelProvider::from_model_id(model_id).ok_or_else(|| {
            SmartMatchError::RequestError(format!("Unsupported model ID: {}", model_id))
        })?;

        let payload = match provider {
            ModelProvider::Anthropic => json!({
                "anthropic_version": "bedrock-2023-05-31",
                "system": instruction,
                "messages": [
                    {
                        "role": "user",
                        "content": request.text
                    }
                ],
                "max_tokens": max_tokens,
                "temperature": temperature
            }),
            ModelProvider::Amazon => json!({
                "inputText": inline_prompt,
                "textGenerationConfig": {
                    "maxTokenCount": max_tokens,
                    "temperature": temperature,
                    "topP": 0.9
                }
            }),
            ModelProvider::Meta => json!({
                "prompt": inline_prompt,
                "max_gen_len": max_tokens,
                "temperature": temperature,
                "top_p": 0.9
            }),
            ModelProvider::Mistral => json!({
                "prompt": format!("<s>[INST] {} [/INST]", inline_prompt),
                "max_tokens": max_tokens,
                "temperature": temperature,
                "top_p": 0.9
            }),
            ModelProvider::Cohere => json!({
                "prompt": inline_prompt,
                "max_tokens": max_tokens,
                "temperature": temperature,
                "p": 0.9
            }),
            ModelProvider::AI21 => json!({
                "prompt": inline_prompt,
                "maxTokens": max_tokens,
                "temperature": temperature,
                "topP": 0.9
            }),
            ModelProvider::Google | ModelProvider::Stability => {
                return Err(SmartMatchError::RequestError(format!(
                    "{} is not a Bedrock text model",
                    model_id
                )))
            }
        };

        Ok(payload)
    }

    pub fn parse_response(body: &str, model_id: &str) -> Result<String> {
        let text = match ModelProvider::from_model_id(model_id) {
            Some(ModelProvider::Anthropic) => {
                let response: ClaudeResponse = serde_json::from_str(body)
                    .map_err(|e| SmartMatchError::ResponseError(e.to_string()))?;
                response
                    .content
                    .into_iter()
                    .filter(|block| block.kind == "text")
                    .filter_map(|block| block.text)
                    .collect::<String>()
            }
            Some(ModelProvider::Amazon) => {
                let response: TitanTextResponse = serde_json::from_str(body)
                    .map_err(|e| SmartMatchError::ResponseError(e.to_string()))?;
                response
                    .results
                    .into_iter()
                    .next()
                    .map(|r| r.output_text)
                    .unwrap_or_default()
            }
            Some(ModelProvider::Meta) => {
                let response: LlamaResponse = serde_json::from_str(body)
                    .map_err(|e| SmartMatchError::ResponseError(e.to_string()))?;
                response.generation
            }
            Some(ModelProvider::Mistral) => {
                let json: serde_json::Value = serde_json::from_str(body)?;
                json["outputs"][0]["text"].as_str().unwrap_or("").to_string()
            }
            Some(ModelProvider::Cohere) => {
                let json: serde_json::Value = serde_json::from_str(body)?;
                json["generations"][0]["text"].as_str().unwrap_or("").to_string()
            }
            Some(ModelProvider::AI21) => {
                let json: serde_json::Value = serde_json::from_str(body)?;
                json["completions"][0]["data"]["text"]
                    .as_str()
                    .unwrap_or("")
                    .to_string()
            }
            _ => {
                return Err(SmartMatchError::ResponseError(format!(
                    "Unexpected model type in response: {}",
                    model_id
                )))
            }
        };

        Ok(text)
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
        [
            ("anthropic.claude-3-haiku-20240307-v1:0", "Claude 3 Haiku"),
            ("anthropic.claude-3-5-sonnet-20240620-v1:0", "Claude 3.5 Sonnet"),
            ("amazon.titan-text-express-v1", "Titan Text Express"),
            ("meta.llama3-8b-instruct-v1:0", "Llama 3 8B Instruct"),
            ("mistral.mistral-7b-instruct-v0:2", "Mistral 7B Instruct"),
            ("cohere.command-text-v14", "Command"),
        ]
        .into_iter()
        .filter_map(|(id, name)| {
            let provider = ModelProvider::from_model_id(id)?;
            Some(ModelInfo::new(
                id,
                name,
                provider,
                ModelCategory::Text,
                "Bedrock prompt optimizer",
            ))
        })
        .collect()
    }
}
