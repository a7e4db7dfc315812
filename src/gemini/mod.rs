//! Google Gemini back end over the public `generateContent` REST endpoint.

pub mod image_client;
pub mod text_client;
pub mod types;

use crate::{
    config::{GeminiConfig, DEFAULT_TIMEOUT_SECS},
    error::{Result, SmartMatchError},
};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use std::time::Duration;
use types::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse};

pub use image_client::ImageClient;
pub use text_client::TextClient;

pub const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
const ERROR_BODY_LIMIT: usize = 200;

/// HTTP plumbing shared by the text and image clients.
#[derive(Clone)]
pub struct GeminiHttp {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GeminiHttp {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SmartMatchError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config
                .endpoint
                .clone()
                .unwrap_or_else(|| GEMINI_ENDPOINT.to_string()),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn url_for(&self, model: &str) -> String {
        format!(
            "{}/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            model
        )
    }

    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SmartMatchError::ConfigError("API_KEY is not set".into()))?;
        let api_key = HeaderValue::from_str(api_key)
            .map_err(|e| SmartMatchError::ConfigError(format!("Invalid API key header: {}", e)))?;

        log::debug!(
            "Gemini request payload: {}",
            serde_json::to_string(request).unwrap_or_default()
        );

        let response = self
            .client
            .post(self.url_for(model))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Gemini API error {} for model {}", status, model);
            let detail = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(parsed) if !parsed.error.message.is_empty() => parsed.error.message,
                _ => truncate_body(&body, ERROR_BODY_LIMIT).to_string(),
            };
            return Err(SmartMatchError::HttpError(format!(
                "Gemini API error {}: {}",
                status, detail
            )));
        }

        Ok(response.json::<GenerateContentResponse>().await?)
    }
}

/// Cuts an error body to at most `limit` bytes on a char boundary.
fn truncate_body(body: &str, limit: usize) -> &str {
    if body.len() <= limit {
        return body;
    }
    let mut end = limit;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[derive(Clone)]
pub struct GeminiClient {
    text_client: TextClient,
    image_client: ImageClient,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.is_none() {
            log::warn!("Gemini client created without an API key; requests will fail");
        }
        let http = GeminiHttp::new(&config)?;

        Ok(Self {
            text_client: TextClient::new(
                http.clone(),
                config.text_model.as_deref().unwrap_or(DEFAULT_TEXT_MODEL),
                config.temperature,
            )
            .with_max_output_tokens(config.max_output_tokens),
            image_client: ImageClient::new(
                http,
                config.image_model.as_deref().unwrap_or(DEFAULT_IMAGE_MODEL),
            ),
        })
    }

    pub fn text(&self) -> &TextClient {
        &self.text_client
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }
}

/// Single-shot HTTP responder for exercising the clients without the network.
#[cfg(test)]
pub(crate) mod test_server {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves one request with `status` and a JSON `body`; the handle yields
    /// the raw request text.
    pub async fn serve_once(status: u16, body: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                if request_complete(&raw) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {} TEST\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&raw).to_string()
        });

        (format!("http://{}/v1beta/models", addr), handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        raw.len() >= header_end + 4 + content_length
    }
}
