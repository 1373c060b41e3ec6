//! Generator backed by an Ollama-style `/api/generate` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, error};
use url::Url;

use crate::domain::ingest::traits::Generator;
use crate::domain::retry::{retry, RetryPolicy};
use crate::domain::{DomainError, Result};

/// Which kind of text-generation backend to talk to.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Display)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationProvider {
    /// Self-hosted model server (e.g. Ollama), no credentials.
    #[strum(serialize = "local-llm")]
    LocalLlm,
    /// Hosted endpoint speaking the same protocol, authenticated with a bearer token.
    #[strum(serialize = "hosted")]
    Hosted,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Why a single generation attempt failed.
#[derive(Debug, thiserror::Error)]
enum AttemptError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("provider returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("provider returned an empty response")]
    Empty,
}

/// Text generator calling `POST <endpoint> {"model", "prompt", "stream": false}`.
///
/// Every failed attempt, including a blank `response`, is retried according
/// to the configured [`RetryPolicy`].
#[derive(Clone)]
pub struct HttpGenerator {
    client: reqwest::Client,
    provider: GenerationProvider,
    endpoint: Url,
    model: String,
    api_key: Option<String>,
    policy: RetryPolicy,
}

impl HttpGenerator {
    pub fn new(
        provider: GenerationProvider,
        endpoint: Url,
        model: impl Into<String>,
        timeout: Duration,
    ) -> std::result::Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            provider,
            endpoint,
            model: model.into(),
            api_key: None,
            policy: RetryPolicy::new(3, Duration::from_secs(2)),
        })
    }

    /// Bearer token sent to the hosted provider.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    async fn request(&self, prompt: &str) -> std::result::Result<String, AttemptError> {
        let mut request = self.client.post(self.endpoint.clone()).json(&GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        });

        if let (GenerationProvider::Hosted, Some(key)) = (self.provider, &self.api_key) {
            request = request.bearer_auth(key);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| AttemptError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AttemptError::Status { status, body });
        }

        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| AttemptError::Malformed(e.to_string()))?;

        let content = parsed.response.trim();
        if content.is_empty() {
            return Err(AttemptError::Empty);
        }

        Ok(content.to_string())
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let content = retry(self.policy, "text generation", |attempt| {
            debug!(
                attempt,
                provider = %self.provider,
                model = %self.model,
                "Requesting generation"
            );
            self.request(prompt)
        })
        .await
        .map_err(|exhausted| {
            error!(
                attempts = exhausted.attempts,
                error = %exhausted.last_error,
                "Generation provider gave no usable response"
            );
            DomainError::GenerationFailed {
                attempts: exhausted.attempts,
                last_error: exhausted.last_error.to_string(),
            }
        })?;

        debug!(chars = content.len(), "Generated paragraph");
        Ok(content)
    }
}
