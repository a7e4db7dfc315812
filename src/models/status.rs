use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the current generation stands. Moves Idle → Optimizing → Generating
/// → Success | Error, and back to Optimizing on the next attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenerationStatus {
    #[default]
    Idle,
    /// Analyzing the text and writing a visual prompt.
    Optimizing,
    /// Rendering the image from the prompt.
    Generating,
    Success,
    Error,
}

impl GenerationStatus {
    pub fn is_processing(&self) -> bool {
        matches!(
            self,
            GenerationStatus::Optimizing | GenerationStatus::Generating
        )
    }

    /// A new generation may only start from a resting state.
    pub fn accepts_input(&self) -> bool {
        !self.is_processing()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStatus::Idle => "IDLE",
            GenerationStatus::Optimizing => "OPTIMIZING",
            GenerationStatus::Generating => "GENERATING",
            GenerationStatus::Success => "SUCCESS",
            GenerationStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_states_reject_input() {
        assert!(GenerationStatus::Idle.accepts_input());
        assert!(GenerationStatus::Success.accepts_input());
        assert!(GenerationStatus::Error.accepts_input());
        assert!(!GenerationStatus::Optimizing.accepts_input());
        assert!(!GenerationStatus::Generating.accepts_input());
    }

    #[test]
    fn test_serializes_like_display() {
        let json = serde_json::to_string(&GenerationStatus::Optimizing).unwrap();
        assert_eq!(json, "\"OPTIMIZING\"");
        assert_eq!(GenerationStatus::default().to_string(), "IDLE");
    }
}
