//! The two hosted capabilities the pipeline depends on.
//!
//! Back ends implement both traits; the pipeline only sees trait objects, so
//! tests can script each stage.

use crate::{
    error::Result,
    models::{ImagePayload, ModelInfo, Style},
};
use async_trait::async_trait;

pub const PROMPT_SYSTEM_INSTRUCTION: &str = "You are an expert visual director and AI art prompter.
Your task is to analyze the user's input text (which could be a blog title, a marketing slogan, a poem, or a snippet of an article in any language) and convert it into a highly effective, descriptive English image generation prompt.

Guidelines:
1. Identify the core mood, subject matter, and metaphor of the text.
2. Determine an appropriate art style (e.g., minimalist vector, cinematic photorealism, warm watercolor, cyberpunk, 3D isometric) that fits the context of the text.
3. Describe the lighting, composition, and color palette.
4. Output ONLY the English prompt string. Do not include explanations.";

/// System instruction for the optimizer. `Style::Auto` leaves the choice of
/// style to the model; any other style is imposed.
pub fn system_instruction(style: Style) -> String {
    match style.directive() {
        None => PROMPT_SYSTEM_INSTRUCTION.to_string(),
        Some(directive) => format!(
            "{}\n\nThe user has chosen the art style: \"{}\". Use this style instead of choosing one yourself, and make it explicit in the prompt.",
            PROMPT_SYSTEM_INSTRUCTION, directive
        ),
    }
}

/// Turns user copy into a descriptive English image prompt.
#[async_trait]
pub trait PromptOptimizer: Send + Sync {
    async fn optimize(&self, text: &str, style: Style) -> Result<String>;

    fn model_id(&self) -> &str;
}

/// Renders a descriptive prompt into an image.
#[async_trait]
pub trait ImageRenderer: Send + Sync {
    async fn render(&self, prompt: &str) -> Result<ImagePayload>;

    fn model_id(&self) -> &str;
}

/// Models a back end can be pointed at.
pub trait ModelCatalog {
    fn supported_models() -> Vec<ModelInfo>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_uses_plain_instruction() {
        assert_eq!(system_instruction(Style::Auto), PROMPT_SYSTEM_INSTRUCTION);
    }

    #[test]
    fn test_style_is_appended() {
        let instruction = system_instruction(Style::Cyberpunk);
        assert!(instruction.starts_with(PROMPT_SYSTEM_INSTRUCTION));
        assert!(instruction.contains("Cyberpunk, neon lights, futuristic city, high contrast"));
    }
}
