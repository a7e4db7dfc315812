//! SmartMatch: turn a headline or slogan into a matching image.
//!
//! A [`GenerationSession`] drives a [`GenerationPipeline`]: a text model
//! rewrites the copy into a descriptive English prompt, then an image model
//! renders it. Google Gemini and AWS Bedrock back ends are included.
//!
//! ```no_run
//! use smartmatch::{Config, GenerationPipeline, GenerationSession, Style};
//!
//! # async fn run() -> smartmatch::Result<()> {
//! let config = Config::from_env()?;
//! let session = GenerationSession::new(GenerationPipeline::from_config(&config).await?);
//! let result = session.generate("Five tips to improve sleep", Style::Cyberpunk).await?;
//! println!("{}", result.optimized_prompt);
//! # Ok(())
//! # }
//! ```

pub mod bedrock;
pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod pipeline;
pub mod provider;
pub mod session;

pub use bedrock::BedrockClient;
pub use config::{BedrockConfig, Config, GeminiConfig, ProviderKind};
pub use error::{Result, SmartMatchError};
pub use gemini::GeminiClient;
pub use models::{
    AppError, GeneratedResult, GenerationStatus, ImagePayload, ModelCategory, ModelInfo,
    ModelProvider, Style,
};
pub use pipeline::GenerationPipeline;
pub use provider::{ImageRenderer, ModelCatalog, PromptOptimizer};
pub use session::GenerationSession;
