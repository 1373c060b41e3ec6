//! Embedder backed by a remote embedding service over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::domain::search::traits::Embedder;
use crate::domain::{DomainError, Result};

/// Calls `POST <endpoint> {"text": ...}` and expects `{"embedding": [...]}`.
///
/// The vector length is checked against the configured dimension; a
/// provider that returns a different size is treated as malformed.
#[derive(Clone)]
pub struct HttpEmbedder {
    client: reqwest::Client,
    endpoint: Url,
    dimensions: usize,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    pub fn new(
        endpoint: Url,
        dimensions: usize,
        timeout: Duration,
    ) -> std::result::Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            dimensions,
        })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(chars = text.len(), "Requesting embedding");

        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(&EmbeddingRequest { text })
            .send()
            .await
            .map_err(|e| {
                error!(endpoint = %self.endpoint, error = %e, "Embedding request failed");
                DomainError::embedding(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(endpoint = %self.endpoint, %status, body = %body, "Embedding provider returned an error");
            return Err(DomainError::embedding(format!(
                "provider returned {status}: {body}"
            )));
        }

        let parsed: EmbeddingResponse = resp.json().await.map_err(|e| {
            error!(endpoint = %self.endpoint, error = %e, "Malformed embedding response");
            DomainError::embedding(format!("malformed response: {e}"))
        })?;

        if parsed.embedding.len() != self.dimensions {
            error!(
                expected = self.dimensions,
                actual = parsed.embedding.len(),
                "Embedding has unexpected dimensions"
            );
            return Err(DomainError::embedding(format!(
                "expected {} dimensions, got {}",
                self.dimensions,
                parsed.embedding.len()
            )));
        }

        Ok(parsed.embedding)
    }
}
