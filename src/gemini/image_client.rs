use super::{
    types::{Content, GenerateContentRequest, GenerateContentResponse},
    GeminiHttp,
};
use crate::{
    error::{Result, SmartMatchError},
    models::{ImagePayload, ModelCategory, ModelInfo, ModelProvider},
    provider::{ImageRenderer, ModelCatalog},
};
use async_trait::async_trait;

#[derive(Clone)]
pub struct ImageClient {
    http: GeminiHttp,
    model: String,
}

impl ImageClient {
    pub fn new(http: GeminiHttp, model: &str) -> Self {
        Self {
            http,
            model: model.to_string(),
        }
    }

    /// Image models take the bare prompt, with no generation config.
    pub fn build_request(prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            system_instruction: None,
            generation_config: None,
        }
    }

    pub fn extract_image(response: &GenerateContentResponse) -> Result<ImagePayload> {
        if response.candidates.is_empty() {
            return Err(SmartMatchError::ResponseError(
                "No content received from image model".into(),
            ));
        }
        response
            .inline_image()
            .map(|data| ImagePayload::new(data.mime_type.as_deref(), data.data.clone()))
            .ok_or_else(|| {
                SmartMatchError::ResponseError(format!(
                    "No image data found in response ({})",
                    response.describe_empty()
                ))
            })
    }

    pub async fn generate(&self, prompt: &str) -> Result<ImagePayload> {
        log::info!("Generating image with model: {}", self.model);
        let response = self
            .http
            .generate_content(&self.model, &Self::build_request(prompt))
            .await?;
        let image = Self::extract_image(&response)?;
        log::debug!(
            "Received {} image, {} base64 chars",
            image.mime_type,
            image.data.len()
        );
        Ok(image)
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
                "gemini-2.5-flash-image",
                "Gemini 2.5 Flash Image",
                ModelProvider::Google,
                ModelCategory::Image,
                "Native image generation, default renderer",
            ),
            ModelInfo::new(
                "gemini-2.0-flash-preview-image-generation",
                "Gemini 2.0 Flash Image (preview)",
                ModelProvider::Google,
                ModelCategory::Image,
                "Earlier image generation preview",
            ),
        ]
    }
}
