use crate::error::{Result, SmartMatchError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

pub const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Rendered image as returned by a provider: base64 data plus its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: String, // Base64 encoded
}

impl ImagePayload {
    pub fn new(mime_type: Option<&str>, data: impl Into<String>) -> Self {
        let mime_type = mime_type
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_IMAGE_MIME);
        Self {
            mime_type: mime_type.to_string(),
            data: data.into(),
        }
    }

    pub fn from_bytes(mime_type: Option<&str>, bytes: &[u8]) -> Self {
        Self::new(mime_type, STANDARD.encode(bytes))
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Parses a `data:<mime>;base64,<data>` URI.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| SmartMatchError::ResponseError("Not a data URI".into()))?;
        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| SmartMatchError::ResponseError("Data URI has no payload".into()))?;
        let mime_type = header.strip_suffix(";base64").ok_or_else(|| {
            SmartMatchError::ResponseError("Data URI is not base64 encoded".into())
        })?;

        Ok(Self::new(Some(mime_type), data))
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| SmartMatchError::ResponseError(format!("Invalid base64 image: {}", e)))
    }

    pub fn file_extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct TitanImageResponse {
    pub images: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct StabilityArtifact {
    pub base64: String,
    #[serde(rename = "finishReason", default)]
    pub finish_reason: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct StabilityImageResponse {
    pub artifacts: Vec<StabilityArtifact>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_format() {
        let payload = ImagePayload::new(Some("image/jpeg"), "AAAA");
        assert_eq!(payload.to_data_url(), "data:image/jpeg;base64,AAAA");
        assert_eq!(payload.file_extension(), "jpg");
    }

    #[test]
    fn test_missing_mime_defaults_to_png() {
        let payload = ImagePayload::new(None, "AAAA");
        assert_eq!(payload.mime_type, "image/png");
        let payload = ImagePayload::new(Some("  "), "AAAA");
        assert_eq!(payload.to_data_url(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_parse_data_url() {
        let payload = ImagePayload::from_data_url("data:image/webp;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(payload.mime_type, "image/webp");
        assert_eq!(payload.data, "iVBORw0KGgo=");
        assert_eq!(payload.decode().unwrap(), vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);

        assert!(ImagePayload::from_data_url("https://example.com/a.png").is_err());
        assert!(ImagePayload::from_data_url("data:image/png,raw").is_err());
        assert!(ImagePayload::from_data_url("data:image/png;base64").is_err());
    }

    #[test]
    fn test_bad_base64_is_an_error() {
        let payload = ImagePayload::new(None, "not base64!!");
        assert!(payload.decode().is_err());
    }
}
