//! Search service combining embedding generation and hybrid search.

use tracing::{error, info, warn};

use super::traits::{DocumentStore, Embedder};
use super::types::{HybridQuery, SearchResult};
use crate::domain::{DomainError, Result};

/// Configuration for the search service.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Index queried by every search
    pub index: String,
    /// Default number of results to return
    pub default_limit: usize,
    /// Maximum number of results allowed
    pub max_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index: "resumes".to_string(),
            default_limit: 10,
            max_limit: 100,
        }
    }
}

/// Search service that combines embedding generation with hybrid search.
///
/// # Type Parameters
///
/// * `E` - Embedder implementation for generating query embeddings
/// * `S` - DocumentStore implementation executing the query
pub struct SearchService<E, S>
where
    E: Embedder,
    S: DocumentStore,
{
    embedder: E,
    store: S,
    config: SearchConfig,
}

impl<E, S> SearchService<E, S>
where
    E: Embedder,
    S: DocumentStore,
{
    /// Create a new search service.
    pub fn new(embedder: E, store: S, config: SearchConfig) -> Self {
        Self {
            embedder,
            store,
            config,
        }
    }

    /// Create a search service with default configuration.
    #[cfg(test)]
    pub fn with_defaults(embedder: E, store: S) -> Self {
        Self::new(embedder, store, SearchConfig::default())
    }

    /// Execute a hybrid search.
    ///
    /// Embeds the query once, then runs a single store query that matches
    /// the text lexically OR scores documents by vector similarity.
    ///
    /// # Arguments
    ///
    /// * `query` - Raw query text, passed through unchanged
    /// * `limit` - Maximum number of results (None uses default, capped at max_limit)
    ///
    /// # Returns
    ///
    /// Results sorted by store relevance score, highest first.
    pub async fn search(&self, query: &str, limit: Option<usize>) -> Result<Vec<SearchResult>> {
        let size = limit
            .unwrap_or(self.config.default_limit)
            .min(self.config.max_limit)
            .max(1);

        let vector = self.embedder.embed(query).await.inspect_err(|e| {
            warn!(error = %e, "Could not embed search query");
        })?;

        let hybrid = HybridQuery {
            text: query.to_string(),
            vector,
            size,
        };

        let mut results = self
            .store
            .search(&self.config.index, &hybrid)
            .await
            .map_err(|e| {
                error!(index = %self.config.index, error = %e, "Search query failed");
                DomainError::SearchFailed(e.to_string())
            })?;

        // Stable sort keeps the store's own order for equal scores
        results.sort_by(|a, b| b.score.total_cmp(&a.score));

        info!(
            index = %self.config.index,
            size,
            hits = results.len(),
            "Search completed"
        );

        Ok(results)
    }
}
