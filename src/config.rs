use crate::error::{Result, SmartMatchError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Which hosted model family backs the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    Bedrock,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Bedrock => "bedrock",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = SmartMatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "bedrock" | "aws" => Ok(ProviderKind::Bedrock),
            other => Err(SmartMatchError::ConfigError(format!(
                "Unknown provider '{}', expected 'gemini' or 'bedrock'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub text_model: Option<String>,
    pub image_model: Option<String>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<i32>,
    pub timeout_secs: Option<u64>,
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `API_KEY` (falling back to `GEMINI_API_KEY`). A missing key is
    /// logged, not rejected: requests fail later at call time.
    pub fn from_env() -> Self {
        let api_key = env::var("API_KEY")
            .or_else(|_| env::var("GEMINI_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            log::error!("API_KEY is missing from environment variables");
        }

        GeminiConfig {
            api_key,
            endpoint: env::var("GEMINI_ENDPOINT").ok(),
            text_model: env::var("GEMINI_TEXT_MODEL").ok(),
            image_model: env::var("GEMINI_IMAGE_MODEL").ok(),
            temperature: None,
            max_output_tokens: None,
            timeout_secs: timeout_from_env(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_models(
        mut self,
        text_model: impl Into<String>,
        image_model: impl Into<String>,
    ) -> Self {
        self.text_model = Some(text_model.into());
        self.image_model = Some(image_model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_output_tokens(mut self, max_tokens: i32) -> Self {
        self.max_output_tokens = Some(max_tokens);
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub text_model: Option<String>,
    pub image_model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let region = env::var("AWS_REGION")
            .or_else(|_| env::var("AWS_DEFAULT_REGION"))
            .ok();

        BedrockConfig {
            region,
            access_key: env::var("AWS_ACCESS_KEY_ID").ok(),
            secret_key: env::var("AWS_SECRET_ACCESS_KEY").ok(),
            text_model: env::var("BEDROCK_TEXT_MODEL").ok(),
            image_model: env::var("BEDROCK_IMAGE_MODEL").ok(),
            temperature: None,
            max_tokens: env::var("BEDROCK_MAX_TOKENS")
                .ok()
                .and_then(|tokens| tokens.parse().ok()),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_models(
        mut self,
        text_model: impl Into<String>,
        image_model: impl Into<String>,
    ) -> Self {
        self.text_model = Some(text_model.into());
        self.image_model = Some(image_model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: i32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub provider: ProviderKind,
    pub gemini: Option<GeminiConfig>,
    pub bedrock: Option<BedrockConfig>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the config for the provider named by `SMARTMATCH_PROVIDER`
    /// (Gemini when unset). Only the selected provider's section is read.
    pub fn from_env() -> Result<Self> {
        let provider = match env::var("SMARTMATCH_PROVIDER") {
            Ok(name) => name.parse()?,
            Err(_) => ProviderKind::default(),
        };
        Ok(Self::for_provider_from_env(provider))
    }

    pub fn for_provider_from_env(provider: ProviderKind) -> Self {
        let config = Config::new().with_provider(provider);
        match provider {
            ProviderKind::Gemini => config.with_gemini(GeminiConfig::from_env()),
            ProviderKind::Bedrock => config.with_bedrock(BedrockConfig::from_env()),
        }
    }

    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = Some(config);
        self
    }

    pub fn with_bedrock(mut self, config: BedrockConfig) -> Self {
        self.bedrock = Some(config);
        self
    }
}

fn timeout_from_env() -> Option<u64> {
    env::var("SMARTMATCH_TIMEOUT_SECS")
        .ok()
        .and_then(|secs| secs.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!("gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!(" Bedrock ".parse::<ProviderKind>().unwrap(), ProviderKind::Bedrock);
        assert_eq!("aws".parse::<ProviderKind>().unwrap(), ProviderKind::Bedrock);
        assert!("openai".parse::<ProviderKind>().is_err());
        assert_eq!(ProviderKind::default(), ProviderKind::Gemini);
    }

    #[test]
    fn test_gemini_builder() {
        let config = GeminiConfig::new()
            .with_api_key("secret")
            .with_models("text-model", "image-model")
            .with_temperature(0.3)
            .with_timeout_secs(5);
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.text_model.as_deref(), Some("text-model"));
        assert_eq!(config.image_model.as_deref(), Some("image-model"));
        assert_eq!(config.temperature, Some(0.3));
        assert_eq!(config.timeout_secs, Some(5));
    }

    #[test]
    fn test_bedrock_sampling_builder() {
        let config = BedrockConfig::new()
            .with_models("meta.llama3-8b-instruct-v1:0", "amazon.titan-image-generator-v2:0")
            .with_temperature(0.4)
            .with_max_tokens(256);
        assert_eq!(config.temperature, Some(0.4));
        assert_eq!(config.max_tokens, Some(256));
        assert_eq!(config.text_model.as_deref(), Some("meta.llama3-8b-instruct-v1:0"));
    }

    #[test]
    fn test_config_builder() {
        let config = Config::new()
            .with_provider(ProviderKind::Bedrock)
            .with_bedrock(BedrockConfig::new().with_region("eu-west-1"));
        assert_eq!(config.provider, ProviderKind::Bedrock);
        assert!(config.gemini.is_none());
        assert_eq!(
            config.bedrock.and_then(|b| b.region).as_deref(),
            Some("eu-west-1")
        );
    }
}
