//! Chat completion HTTP client
//!
//! Sends a single chat completion request to an OpenAI-compatible endpoint.
//! There is no retry: any failure is returned to the caller as-is.

use crate::models::openai::{ChatCompletionRequest, ChatCompletionResponse};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{debug, error};

/// Error types that can occur during chat completion API interactions
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Failed to build HTTP client: {0}")]
    Build(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response body: {0}")]
    InvalidResponse(String),

    #[error("Response has no message content in its first choice")]
    MissingContent,
}

/// Client for one chat completion endpoint
pub struct ChatClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl ChatClient {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `api_key` - Bearer token
    /// * `endpoint` - Full chat completion URL
    /// * `timeout` - Request timeout in seconds; `None` keeps the reqwest default
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Option<u64>,
    ) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(secs) = timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        })
    }

    /// Endpoint this client posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a chat completion request
    ///
    /// # Errors
    ///
    /// Returns `ClientError` for transport failures, non-success statuses
    /// and bodies that do not decode as a chat completion response.
    pub async fn create_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ClientError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        debug!(status = status.as_u16(), "Received chat completion response");

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = status.as_u16(), "Chat completion request failed");
            let classified_error = Self::classify_error(&error_text);

            return Err(match status.as_u16() {
                401 => ClientError::Authentication(classified_error),
                429 => ClientError::RateLimit(classified_error),
                400 => ClientError::BadRequest(classified_error),
                code => ClientError::Api {
                    status: code,
                    message: classified_error,
                },
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        serde_json::from_str(&body)
            .map_err(|e| ClientError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    /// Classify API errors and provide helpful messages
    fn classify_error(error_detail: &str) -> String {
        let error_lower = error_detail.to_lowercase();

        if error_lower.contains("invalid_api_key") || error_lower.contains("unauthorized") {
            return "Invalid API key. Please check your API_KEY environment variable.".to_string();
        }

        if error_lower.contains("rate_limit") || error_lower.contains("quota") {
            return "Rate limit exceeded. Please wait and try again, or upgrade your API plan."
                .to_string();
        }

        if error_lower.contains("model")
            && (error_lower.contains("not found")
                || error_lower.contains("does not exist")
                || error_lower.contains("decommissioned"))
        {
            return "Model not found. Please check the configured model name.".to_string();
        }

        error_detail.to_string()
    }
}
