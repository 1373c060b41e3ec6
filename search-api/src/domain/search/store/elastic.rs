//! Elasticsearch-backed document store.

use async_trait::async_trait;
use elastic_client::{ElasticClient, ElasticError};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::domain::search::traits::{DocumentStore, StoreError, StoreResult};
use crate::domain::search::types::{Document, HybridQuery, IndexSchema, SearchResult};

/// Script scoring each document by cosine similarity to the query vector.
///
/// Shifted by +1.0 because the store rejects negative scores.
const COSINE_SCRIPT: &str = "cosineSimilarity(params.query_vector, 'vector') + 1.0";

#[derive(Clone)]
pub struct ElasticStore {
    client: ElasticClient,
}

impl ElasticStore {
    pub fn new(client: ElasticClient) -> Self {
        Self { client }
    }
}

impl From<ElasticError> for StoreError {
    fn from(e: ElasticError) -> Self {
        match e {
            ElasticError::RequestError(msg) => StoreError::Unavailable(msg),
            ElasticError::ResponseError { status, body } => {
                StoreError::Rejected(format!("{}: {}", status, body))
            }
            ElasticError::ParsingError(msg) => StoreError::Malformed(msg),
        }
    }
}

/// Index creation body for the given schema.
pub(crate) fn index_mappings(schema: &IndexSchema) -> Value {
    let mut properties = json!({
        "content": {
            "type": "text",
            "fields": {
                "keyword": { "type": "keyword" }
            }
        }
    });

    if let Some(dims) = schema.vector_dimensions {
        properties["vector"] = json!({
            "type": "dense_vector",
            "dims": dims
        });
    }

    json!({ "mappings": { "properties": properties } })
}

/// Search body combining a full-text match with vector similarity.
///
/// Both clauses sit under `bool.should`, so a document matching either one
/// is a hit and the scores of matching clauses add up.
pub(crate) fn hybrid_search_body(query: &HybridQuery) -> Value {
    json!({
        "size": query.size,
        "query": {
            "bool": {
                "should": [
                    { "match": { "content": query.text } },
                    {
                        "script_score": {
                            "query": { "match_all": {} },
                            "script": {
                                "source": COSINE_SCRIPT,
                                "params": { "query_vector": query.vector }
                            }
                        }
                    }
                ]
            }
        }
    })
}

#[async_trait]
impl DocumentStore for ElasticStore {
    async fn ping(&self) -> StoreResult<()> {
        let info = self.client.info().await?;
        debug!(
            cluster = %info.cluster_name,
            version = %info.version.number,
            "Store answered liveness probe"
        );
        Ok(())
    }

    async fn index_exists(&self, index: &str) -> StoreResult<bool> {
        Ok(self.client.index_exists(index).await?)
    }

    async fn create_index(&self, index: &str, schema: &IndexSchema) -> StoreResult<bool> {
        let created = self
            .client
            .create_index(index, &index_mappings(schema))
            .await?;
        if created {
            info!(index, dims = ?schema.vector_dimensions, "Created index");
        }
        Ok(created)
    }

    async fn index_document(&self, index: &str, document: &Document) -> StoreResult<String> {
        let response = self.client.index_document(index, document).await?;
        Ok(response.id)
    }

    async fn search(&self, index: &str, query: &HybridQuery) -> StoreResult<Vec<SearchResult>> {
        let response = self
            .client
            .search::<Document>(index, &hybrid_search_body(query))
            .await?;

        debug!(index, took_ms = response.took, "Hybrid search executed");

        Ok(response
            .into_hits()
            .into_iter()
            .map(|hit| SearchResult {
                content: hit.source.content,
                score: hit.score.unwrap_or_default(),
            })
            .collect())
    }
}
