//! Text → descriptive prompt → image, one stage after the other.

use crate::{
    bedrock::BedrockClient,
    config::{Config, ProviderKind},
    error::{Result, SmartMatchError},
    gemini::GeminiClient,
    logger,
    models::{GeneratedResult, ImagePayload, Style},
    provider::{ImageRenderer, PromptOptimizer},
};
use std::sync::Arc;

pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze text. Please try again.";
pub const RENDER_FAILED_MESSAGE: &str = "Failed to generate image. Please try again.";

#[derive(Clone)]
pub struct GenerationPipeline {
    optimizer: Arc<dyn PromptOptimizer>,
    renderer: Arc<dyn ImageRenderer>,
}

impl GenerationPipeline {
    pub fn new(optimizer: Arc<dyn PromptOptimizer>, renderer: Arc<dyn ImageRenderer>) -> Self {
        Self {
            optimizer,
            renderer,
        }
    }

    /// Wires both stages to the configured provider.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let pipeline = match config.provider {
            ProviderKind::Gemini => {
                let client = GeminiClient::new(config.gemini.clone().unwrap_or_default())?;
                Self::new(
                    Arc::new(client.text().clone()),
                    Arc::new(client.image().clone()),
                )
            }
            ProviderKind::Bedrock => {
                let client = BedrockClient::new(config.bedrock.clone().unwrap_or_default()).await?;
                Self::new(
                    Arc::new(client.text().clone()),
                    Arc::new(client.image().clone()),
                )
            }
        };

        log::info!(
            "Pipeline ready: provider={} optimizer={} renderer={}",
            config.provider,
            pipeline.optimizer.model_id(),
            pipeline.renderer.model_id()
        );
        Ok(pipeline)
    }

    /// Stage one. Any provider failure becomes `AnalysisFailed`.
    pub async fn optimize(&self, text: &str, style: Style) -> Result<String> {
        let _timer = logger::timer("optimize prompt");
        self.optimizer.optimize(text, style).await.map_err(|e| {
            log::error!("Error optimizing prompt: {}", e);
            SmartMatchError::AnalysisFailed(ANALYSIS_FAILED_MESSAGE.to_string())
        })
    }

    /// Stage two. The prompt is passed through untouched.
    pub async fn render(&self, prompt: &str) -> Result<ImagePayload> {
        let _timer = logger::timer("render image");
        self.renderer.render(prompt).await.map_err(|e| {
            log::error!("Error generating image: {}", e);
            SmartMatchError::RenderFailed(RENDER_FAILED_MESSAGE.to_string())
        })
    }

    /// Runs both stages; the renderer is never called if optimizing fails.
    pub async fn run(&self, text: &str, style: Style) -> Result<GeneratedResult> {
        let prompt = self.optimize(text, style).await?;
        let image = self.render(&prompt).await?;
        Ok(GeneratedResult::new(text, prompt, &image, style))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::fakes::{FakeOptimizer, FakeRenderer};

    #[tokio::test]
    async fn test_renderer_receives_optimizer_output_verbatim() {
        let optimizer = Arc::new(FakeOptimizer::default());
        let renderer = Arc::new(FakeRenderer::default());
        let pipeline = GenerationPipeline::new(optimizer.clone(), renderer.clone());

        let result = pipeline
            .run("Five tips to improve sleep", Style::Cyberpunk)
            .await
            .unwrap();

        assert_eq!(
            optimizer.calls(),
            vec![("Five tips to improve sleep".to_string(), Style::Cyberpunk)]
        );
        assert_eq!(renderer.prompts(), vec![result.optimized_prompt.clone()]);
        assert_eq!(result.original_text, "Five tips to improve sleep");
        assert_eq!(result.style, Style::Cyberpunk);
        assert_eq!(result.image_data_url, "data:image/png;base64,iVBORw0KGgo=");
    }

    #[tokio::test]
    async fn test_analysis_failure_skips_render() {
        let renderer = Arc::new(FakeRenderer::default());
        let pipeline = GenerationPipeline::new(Arc::new(FakeOptimizer::failing()), renderer.clone());

        let err = pipeline.run("Hello", Style::Auto).await.unwrap_err();
        assert!(matches!(err, SmartMatchError::AnalysisFailed(_)));
        assert_eq!(err.to_string(), ANALYSIS_FAILED_MESSAGE);
        assert!(renderer.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_render_failure_is_collapsed() {
        let pipeline = GenerationPipeline::new(
            Arc::new(FakeOptimizer::default()),
            Arc::new(FakeRenderer::failing()),
        );

        let err = pipeline.run("Hello", Style::Auto).await.unwrap_err();
        assert_eq!(err.to_string(), RENDER_FAILED_MESSAGE);
        assert_eq!(err.code(), Some("RENDER_FAILED"));
    }

    #[tokio::test]
    async fn test_from_config_without_key_still_builds() {
        let pipeline = GenerationPipeline::from_config(&Config::new()).await.unwrap();
        let err = pipeline.run("Hello", Style::Auto).await.unwrap_err();
        assert!(matches!(err, SmartMatchError::AnalysisFailed(_)));
    }
}
