use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub provider: ModelProvider,
    pub category: ModelCategory,
    pub description: String,
}

impl ModelInfo {
    pub fn new(
        id: &str,
        name: &str,
        provider: ModelProvider,
        category: ModelCategory,
        description: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            provider,
            category,
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModelCategory {
    Text,
    Image,
}

/// Vendor of a model, which decides the request and response shape on Bedrock.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ModelProvider {
    Google,
    Amazon,
    Anthropic,
    Cohere,
    AI21,
    Meta,
    Mistral,
    Stability,
}

impl ModelProvider {
    /// Infers the vendor from a model id such as `anthropic.claude-3-haiku...`.
    /// Cross-region `us.` prefixes are ignored; inference-profile ARNs are
    /// assumed to front Anthropic models.
    pub fn from_model_id(model_id: &str) -> Option<Self> {
        let id = model_id.strip_prefix("us.").unwrap_or(model_id);

        match id {
            id if id.starts_with("gemini") => Some(ModelProvider::Google),
            id if id.starts_with("amazon.") => Some(ModelProvider::Amazon),
            id if id.starts_with("anthropic.") || id.starts_with("arn:aws:bedrock") => {
                Some(ModelProvider::Anthropic)
            }
            id if id.starts_with("cohere.") => Some(ModelProvider::Cohere),
            id if id.starts_with("ai21.") => Some(ModelProvider::AI21),
            id if id.starts_with("meta.") => Some(ModelProvider::Meta),
            id if id.starts_with("mistral.") => Some(ModelProvider::Mistral),
            id if id.starts_with("stability.") => Some(ModelProvider::Stability),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelProvider::Google => "Google",
            ModelProvider::Amazon => "Amazon",
            ModelProvider::Anthropic => "Anthropic",
            ModelProvider::Cohere => "Cohere",
            ModelProvider::AI21 => "AI21 Labs",
            ModelProvider::Meta => "Meta",
            ModelProvider::Mistral => "Mistral AI",
            ModelProvider::Stability => "Stability AI",
        }
    }
}
