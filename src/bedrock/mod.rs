pub mod image_client;
pub mod text_client;

use crate::{
    config::BedrockConfig,
    error::{Result, SmartMatchError},
};
use aws_sdk_bedrockruntime::{error::ProvideErrorMetadata, primitives::Blob, Client};

pub use image_client::ImageClient;
pub use text_client::TextClient;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_TEXT_MODEL: &str = "anthropic.claude-3-haiku-20240307-v1:0";
pub const DEFAULT_IMAGE_MODEL: &str = "amazon.titan-image-generator-v1";

#[derive(Clone)]
pub struct BedrockClient {
    text_client: TextClient,
    image_client: ImageClient,
}

impl BedrockClient {
    pub async fn new(bedrock_config: BedrockConfig) -> Result<Self> {
        let region = bedrock_config
            .region
            .clone()
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let aws_config = if let (Some(access_key), Some(secret_key)) =
            (&bedrock_config.access_key, &bedrock_config.secret_key)
        {
            aws_config::from_env()
                .credentials_provider(aws_sdk_bedrockruntime::config::Credentials::new(
                    access_key,
                    secret_key,
                    None,
                    None,
                    "smartmatch",
                ))
                .region(aws_sdk_bedrockruntime::config::Region::new(region))
                .load()
                .await
        } else {
            log::warn!("No AWS credentials configured, using the default credential chain");
            aws_config::from_env()
                .region(aws_sdk_bedrockruntime::config::Region::new(region))
                .load()
                .await
        };

        let client = Client::new(&aws_config);

        Ok(Self {
            text_client: TextClient::new(
                client.clone(),
                bedrock_config
                    .text_model
                    .as_deref()
                    .unwrap_or(DEFAULT_TEXT_MODEL),
            )
            .with_sampling(bedrock_config.temperature, bedrock_config.max_tokens),
            image_client: ImageClient::new(
                client,
                bedrock_config
                    .image_model
                    .as_deref()
                    .unwrap_or(DEFAULT_IMAGE_MODEL),
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

/// Sends a JSON payload through `InvokeModel` and returns the raw body.
pub(crate) async fn invoke_json(
    client: &Client,
    model_id: &str,
    payload: &serde_json::Value,
) -> Result<String> {
    let request_json = serde_json::to_string(payload)?;
    log::debug!("Bedrock request payload for {}: {}", model_id, request_json);

    let response = client
        .invoke_model()
        .model_id(model_id)
        .content_type("application/json")
        .accept("application/json")
        .body(Blob::new(request_json.into_bytes()))
        .send()
        .await
        .map_err(|e| {
            log::error!("Bedrock InvokeModel error details: {:?}", e);

            if let Some(service_error) = e.as_service_error() {
                SmartMatchError::AwsServiceError(format!(
                    "Bedrock service error: {} - {}",
                    service_error.code().unwrap_or("unknown"),
                    service_error.message().unwrap_or("no message")
                ))
            } else {
                SmartMatchError::AwsError(format!("AWS SDK error: {}", e))
            }
        })?;

    String::from_utf8(response.body.into_inner())
        .map_err(|e| SmartMatchError::ResponseError(e.to_string()))
}
