//! REST client for the Vertex AI prediction endpoint.
//!
//! Wraps the publisher model's `:predict` call using [`reqwest`].

use std::time::Duration;

use serde::Deserialize;

use crate::config::VertexConfig;

/// HTTP client for a single Vertex AI prediction endpoint.
pub struct VertexApi {
    client: reqwest::Client,
    endpoint_url: String,
    access_token: String,
}

/// Response returned by the `:predict` endpoint.
#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    /// One prediction per requested sample; may be empty.
    #[serde(default)]
    pub predictions: Vec<serde_json::Value>,
}

/// Errors from the Vertex REST layer.
#[derive(Debug, thiserror::Error)]
pub enum VertexApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Vertex returned a non-2xx status code.
    #[error("Vertex API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl VertexApi {
    /// Create an API client from connection configuration.
    ///
    /// The configured request timeout bounds every `:predict` call made
    /// through this client.
    pub fn new(config: &VertexConfig) -> Result<Self, VertexApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint_url: config.endpoint_url(),
            access_token: config.access_token.clone(),
        })
    }

    /// Issue one prediction request.
    ///
    /// Sends `POST {endpoint}:predict` with the given instances and
    /// parameters. The upstream model may take tens of seconds; the
    /// client timeout is the only bound.
    pub async fn predict(
        &self,
        instances: &[serde_json::Value],
        parameters: &serde_json::Value,
    ) -> Result<PredictResponse, VertexApiError> {
        let body = serde_json::json!({
            "instances": instances,
            "parameters": parameters,
        });

        let response = self
            .client
            .post(&self.endpoint_url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`VertexApiError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, VertexApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(VertexApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, VertexApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
