use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{ClusterInfo, ElasticURL, ErrorResponse, IndexResponse, SearchResponse};

/// Async client for the Elasticsearch REST API.
///
/// Only the handful of endpoints the search service needs are covered:
/// cluster info, index existence/creation, document indexing and search.
#[derive(Debug, Clone)]
pub struct ElasticClient {
    client: reqwest::Client,
    base_url: ElasticURL,
}

#[derive(Error, Debug)]
pub enum ElasticError {
    #[error("RequestError: {0}")]
    RequestError(String),
    #[error("ResponseError: {status}: {body}")]
    ResponseError { status: u16, body: String },
    #[error("ParsingError: {0}")]
    ParsingError(String),
}

impl ElasticClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ElasticError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ElasticError::RequestError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: ElasticURL::new(base_url),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.base_url.append_path(path);
        debug!(%method, url = url.as_ref(), "Elasticsearch request");
        self.client.request(method, url.as_ref())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ElasticError> {
        request
            .send()
            .await
            .map_err(|e| ElasticError::RequestError(e.to_string()))
    }

    async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T, ElasticError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ElasticError::ResponseError {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<T>().await.map_err(|e| {
            ElasticError::ParsingError(format!("Failed to parse response as JSON: {}", e))
        })
    }

    /// `GET /`: basic cluster information. Succeeds only when the
    /// node is up and answering requests.
    pub async fn info(&self) -> Result<ClusterInfo, ElasticError> {
        let resp = self.send(self.request(Method::GET, "/")).await?;
        Self::parse(resp).await
    }

    /// `HEAD /{index}`
    pub async fn index_exists(&self, index: &str) -> Result<bool, ElasticError> {
        let resp = self.send(self.request(Method::HEAD, index)).await?;

        match resp.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(ElasticError::ResponseError {
                status: status.as_u16(),
                body: String::new(),
            }),
        }
    }

    /// `PUT /{index}` with the given settings/mappings body.
    ///
    /// Returns `Ok(false)` when the index already exists, so concurrent
    /// creators all succeed and exactly one of them sees `Ok(true)`.
    pub async fn create_index(
        &self,
        index: &str,
        body: &serde_json::Value,
    ) -> Result<bool, ElasticError> {
        let resp = self
            .send(self.request(Method::PUT, index).json(body))
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(true);
        }

        let text = resp.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(error) if error.is_already_exists() => Ok(false),
            _ => Err(ElasticError::ResponseError {
                status: status.as_u16(),
                body: text,
            }),
        }
    }

    /// `POST /{index}/_doc`, letting the store assign the id.
    pub async fn index_document<T: Serialize + ?Sized>(
        &self,
        index: &str,
        document: &T,
    ) -> Result<IndexResponse, ElasticError> {
        let path = format!("{}/_doc", index);
        let resp = self
            .send(self.request(Method::POST, &path).json(document))
            .await?;
        Self::parse(resp).await
    }

    /// `POST /{index}/_search`
    pub async fn search<T: DeserializeOwned>(
        &self,
        index: &str,
        body: &serde_json::Value,
    ) -> Result<SearchResponse<T>, ElasticError> {
        let path = format!("{}/_search", index);
        let resp = self
            .send(self.request(Method::POST, &path).json(body))
            .await?;
        Self::parse(resp).await
    }
}
