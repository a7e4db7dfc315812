use super::{ImagePayload, Style};
use crate::error::{Result, SmartMatchError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Outcome of one successful pipeline run. Never mutated; the next run
/// replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedResult {
    pub original_text: String,
    pub optimized_prompt: String,
    pub image_data_url: String,
    pub timestamp: DateTime<Utc>,
    pub style: Style,
}

impl GeneratedResult {
    pub fn new(
        original_text: impl Into<String>,
        optimized_prompt: impl Into<String>,
        image: &ImagePayload,
        style: Style,
    ) -> Self {
        Self {
            original_text: original_text.into(),
            optimized_prompt: optimized_prompt.into(),
            image_data_url: image.to_data_url(),
            timestamp: Utc::now(),
            style,
        }
    }

    pub fn image(&self) -> Result<ImagePayload> {
        ImagePayload::from_data_url(&self.image_data_url)
    }

    /// Download name, e.g. `smart-match-1718000000000.png`.
    pub fn file_name(&self) -> String {
        let extension = self
            .image()
            .map(|image| image.file_extension())
            .unwrap_or("png");
        format!(
            "smart-match-{}.{}",
            self.timestamp.timestamp_millis(),
            extension
        )
    }

    /// Writes the decoded image into `dir` (created if missing) under
    /// [`file_name`](Self::file_name) and returns the full path.
    pub async fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        let bytes = self.image()?.decode()?;
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(self.file_name());
        tokio::fs::write(&path, bytes).await?;
        log::info!("💾 Image saved to: {}", path.display());
        Ok(path)
    }
}

/// User-facing failure of the last attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl AppError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }
}

impl From<&SmartMatchError> for AppError {
    fn from(err: &SmartMatchError) -> Self {
        let message = err.to_string();
        Self {
            message: if message.is_empty() {
                "An unexpected error occurred. Please try again.".to_string()
            } else {
                message
            },
            code: err.code().map(String::from),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AppError {}
