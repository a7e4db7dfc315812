use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmartMatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("HTTP error: {0}")]
    HttpError(String),
    #[error("AWS error: {0}")]
    AwsError(String),
    #[error("AWS service error: {0}")]
    AwsServiceError(String),
    #[error("{0}")]
    AnalysisFailed(String),
    #[error("{0}")]
    RenderFailed(String),
    #[error("A generation is already in progress")]
    Busy,
    #[error("Input text is empty")]
    EmptyInput,
    #[error("No previous result to retry")]
    NothingToRetry,
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<reqwest::Error> for SmartMatchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SmartMatchError::ResponseError(e.to_string())
        } else {
            SmartMatchError::HttpError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SmartMatchError {
    fn from(e: serde_json::Error) -> Self {
        SmartMatchError::SerializationError(e.to_string())
    }
}

impl SmartMatchError {
    /// Stage code surfaced on `AppError`, if this error ended a pipeline stage.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            SmartMatchError::AnalysisFailed(_) => Some("ANALYSIS_FAILED"),
            SmartMatchError::RenderFailed(_) => Some("RENDER_FAILED"),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SmartMatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_errors_display_only_the_message() {
        let err = SmartMatchError::AnalysisFailed("Failed to analyze text. Please try again.".into());
        assert_eq!(err.to_string(), "Failed to analyze text. Please try again.");
        assert_eq!(err.code(), Some("ANALYSIS_FAILED"));
    }

    #[test]
    fn test_other_errors_have_no_code() {
        let err = SmartMatchError::ConfigError("missing key".into());
        assert_eq!(err.to_string(), "Configuration error: missing key");
        assert!(err.code().is_none());
        assert!(SmartMatchError::Busy.code().is_none());
    }
}
