use super::invoke_json;
use crate::{
    error::{Result, SmartMatchError},
    models::{
        ImagePayload, ModelCategory, ModelInfo, ModelProvider, StabilityImageResponse,
        TitanImageResponse,
    },
    provider::{ImageRenderer, ModelCatalog},
};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client;
use serde_json::json;

const IMAGE_SIZE: u32 = 1024;
// Titan rejects prompts longer than this
const TITAN_PROMPT_LIMIT: usize = 512;

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    model: String,
}

impl ImageClient {
    pub fn new(client: Client, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    pub fn build_request_payload(prompt: &str, model_id: &str) -> Result<serde_json::Value> {
        let payload = match ModelProvider::from_model_id(model_id) {
            Some(ModelProvider::Amazon) if model_id.contains("image-generator") => {
                if prompt.chars().count() > TITAN_PROMPT_LIMIT {
                    log::warn!(
                        "Prompt exceeds {} characters, Titan may reject it",
                        TITAN_PROMPT_LIMIT
                    );
                }
                json!({
                    "taskType": "TEXT_IMAGE",
                    "textToImageParams": {
                        "text": prompt
                    },
                    "imageGenerationConfig": {
                        "numberOfImages": 1,
                        "width": IMAGE_SIZE,
                        "height": IMAGE_SIZE,
                        "quality": "standard",
                        "cfgScale": 8.0
                    }
                })
            }
            Some(ModelProvider::Stability) => json!({
                "text_prompts": [{ "text": prompt, "weight": 1.0 }],
                "width": IMAGE_SIZE,
                "height": IMAGE_SIZE,
                "cfg_scale": 7,
                "steps": 30,
                "samples": 1
            }),
            _ => {
                return Err(SmartMatchError::RequestError(format!(
                    "Unsupported image model: {}",
                    model_id
                )))
            }
        };
        Ok(payload)
    }

    pub fn parse_response(body: &str, model_id: &str) -> Result<ImagePayload> {
        let data = match ModelProvider::from_model_id(model_id) {
            Some(ModelProvider::Stability) => {
                let response: StabilityImageResponse = serde_json::from_str(body)
                    .map_err(|e| SmartMatchError::ResponseError(e.to_string()))?;
                response.artifacts.into_iter().next().map(|a| a.base64)
            }
            _ => {
                let response: TitanImageResponse = serde_json::from_str(body)
                    .map_err(|e| SmartMatchError::ResponseError(e.to_string()))?;
                if let Some(error) = response.error.filter(|e| !e.is_empty()) {
                    return Err(SmartMatchError::ResponseError(error));
                }
                response.images.into_iter().next()
            }
        };

        data.filter(|d| !d.is_empty())
            .map(|d| ImagePayload::new(Some("image/png"), d))
            .ok_or_else(|| SmartMatchError::ResponseError("No images generated".into()))
    }

    pub async fn generate(&self, prompt: &str) -> Result<ImagePayload> {
        let payload = Self::build_request_payload(prompt, &self.model)?;

        log::info!("Generating image with Bedrock model: {}", self.model);
        let body = invoke_json(&self.client, &self.model, &payload).await?;
        Self::parse_response(&body, &self.model)
    }
}

#[async_trait]
impl ImageRenderer for ImageClient {
    async fn render(&self, prompt: &str) -> Result<ImagePayload> {
        self.generate(prompt).await
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

impl ModelCatalog for ImageClient {
    fn supported_models() -> Vec<ModelInfo> {
        vec![
            ModelInfo::new(
                "amazon.titan-image-generator-v1",
                "Titan Image Generator G1",
                ModelProvider::Amazon,
                ModelCategory::Image,
                "Default Bedrock renderer",
            ),
            ModelInfo::new(
                "amazon.titan-image-generator-v2:0",
                "Titan Image Generator G1 v2",
                ModelProvider::Amazon,
                ModelCategory::Image,
                "Improved composition and text rendering",
            ),
            ModelInfo::new(
                "stability.stable-diffusion-xl-v1",
                "Stable Diffusion XL",
                ModelProvider::Stability,
                ModelCategory::Image,
                "SDXL 1.0",
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titan_payload_carries_prompt() {
        let payload =
            ImageClient::build_request_payload("A quiet harbor", "amazon.titan-image-generator-v1").unwrap();
        assert_eq!(payload["taskType"], "TEXT_IMAGE");
        assert_eq!(payload["textToImageParams"]["text"], "A quiet harbor");
        assert_eq!(payload["imageGenerationConfig"]["width"], 1024);
    }

    #[test]
    fn test_stability_payload() {
        let payload =
            ImageClient::build_request_payload("A quiet harbor", "stability.stable-diffusion-xl-v1").unwrap();
        assert_eq!(payload["text_prompts"][0]["text"], "A quiet harbor");
    }

    #[test]
    fn test_text_models_rejected() {
        assert!(ImageClient::build_request_payload("x", "amazon.titan-text-express-v1").is_err());
        assert!(ImageClient::build_request_payload("x", "anthropic.claude-v2").is_err());
    }

    #[test]
    fn test_parse_titan_response() {
        let image = ImageClient::parse_response(
            r#"{"images":["iVBORw0KGgo="],"error":null}"#,
            "amazon.titan-image-generator-v1",
        )
        .unwrap();
        assert_eq!(image.to_data_url(), "data:image/png;base64,iVBORw0KGgo=");

        assert!(ImageClient::parse_response(r#"{"images":[]}"#, "amazon.titan-image-generator-v1").is_err());
        assert!(ImageClient::parse_response(
            r#"{"images":[],"error":"blocked by content filter"}"#,
            "amazon.titan-image-generator-v1"
        )
        .is_err());
    }

    #[test]
    fn test_parse_stability_response() {
        let image = ImageClient::parse_response(
            r#"{"result":"success","artifacts":[{"seed":1,"base64":"AAAA","finishReason":"SUCCESS"}]}"#,
            "stability.stable-diffusion-xl-v1",
        )
        .unwrap();
        assert_eq!(image.data, "AAAA");
    }
}
