//! Google Document AI client.
//!
//! Calls the `:process` method of a single, fixed processor with the image as
//! an inline raw document. Authentication uses a service-account key loaded
//! once at startup; tokens are cached and refreshed by `gcp_auth`.
//!
//! No retries: any failure is returned to the caller as-is.

use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use base64::Engine;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{
    normalize_entities, DocumentExtractor, ExtractedEntity, ExtractionError, NormalizedRecord,
    IMAGE_MIME_TYPE,
};
use crate::config::ProcessorConfig;

const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessRequest<'a> {
    name: &'a str,
    raw_document: RawDocument<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument<'a> {
    content: String,
    mime_type: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ProcessResponse {
    #[serde(default)]
    document: Option<Document>,
}

#[derive(Debug, Default, Deserialize)]
struct Document {
    #[serde(default)]
    entities: Vec<ExtractedEntity>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Document AI backed [`DocumentExtractor`].
pub struct DocumentAiClient {
    client: reqwest::Client,
    credentials: CustomServiceAccount,
    resource_name: String,
    url: String,
}

impl DocumentAiClient {
    /// Create a client for `processor`, authenticating with the key file at
    /// `credentials_path`.
    pub fn new(
        processor: &ProcessorConfig,
        credentials_path: &Path,
    ) -> Result<Self, ExtractionError> {
        let credentials = CustomServiceAccount::from_file(credentials_path).map_err(|e| {
            ExtractionError::Auth(format!(
                "failed to load credentials from {}: {}",
                credentials_path.display(),
                e
            ))
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            credentials,
            resource_name: processor.resource_name(),
            url: processor.process_url(),
        })
    }

    /// Processor this client sends documents to.
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    async fn access_token(&self) -> Result<String, ExtractionError> {
        let token = self
            .credentials
            .token(&[CLOUD_PLATFORM_SCOPE])
            .await
            .map_err(|e| ExtractionError::Auth(e.to_string()))?;
        Ok(token.as_str().to_string())
    }

    /// Run the processor and return the raw entity list.
    pub async fn process(&self, image: &[u8]) -> Result<Vec<ExtractedEntity>, ExtractionError> {
        let request = ProcessRequest {
            name: &self.resource_name,
            raw_document: RawDocument {
                content: base64::engine::general_purpose::STANDARD.encode(image),
                mime_type: IMAGE_MIME_TYPE,
            },
        };

        let token = self.access_token().await?;

        info!(
            "Sending {} bytes to Document AI processor {}",
            image.len(),
            self.resource_name
        );
        let start = Instant::now();

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        let entities = parse_entities(&body)?;
        info!(
            "Document AI answered in {}ms with {} entities",
            start.elapsed().as_millis(),
            entities.len()
        );
        Ok(entities)
    }
}

#[async_trait]
impl DocumentExtractor for DocumentAiClient {
    async fn extract(&self, image: &[u8]) -> Result<NormalizedRecord, ExtractionError> {
        let entities = self.process(image).await?;
        Ok(normalize_entities(&entities))
    }
}

/// Pull the entity list out of a successful `:process` response body.
fn parse_entities(body: &str) -> Result<Vec<ExtractedEntity>, ExtractionError> {
    let parsed: ProcessResponse = serde_json::from_str(body).map_err(|e| {
        ExtractionError::InvalidResponse(format!("failed to parse response: {}", e))
    })?;
    Ok(parsed.document.unwrap_or_default().entities)
}

/// Build an error from a non-2xx response, preferring Google's own message.
fn api_error(status: u16, body: &str) -> ExtractionError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    ExtractionError::Api { status, message }
}
