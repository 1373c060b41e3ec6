//! Ingestion pipeline: generate, optionally embed, validate, index.

use tracing::{debug, error, info, warn};

use super::traits::Generator;
use crate::domain::search::{Document, DocumentStore, Embedder, IndexSchema};
use crate::domain::{DomainError, Result};

/// Configuration for the ingestion pipeline.
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    /// Index new documents are written to
    pub index: String,
    /// Prompt sent to the generator for every document
    pub prompt: String,
    /// Whether documents are embedded before indexing
    pub embed_documents: bool,
}

/// An item of a batch that was generated but could not be indexed.
#[derive(Debug)]
pub struct IndexingFailure {
    /// 1-based position within the batch
    pub position: usize,
    pub error: DomainError,
}

/// Result of a batch that ran to completion.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Successfully indexed documents, in generation order
    pub documents: Vec<Document>,
    pub failures: Vec<IndexingFailure>,
}

/// Pipeline producing new documents and writing them to the ingestion index.
///
/// # Type Parameters
///
/// * `G` - Generator producing document content
/// * `E` - Embedder used when `embed_documents` is enabled
/// * `S` - DocumentStore the documents are written to
pub struct IngestionPipeline<G, E, S>
where
    G: Generator,
    E: Embedder,
    S: DocumentStore,
{
    generator: G,
    embedder: E,
    store: S,
    schema: IndexSchema,
    config: IngestionConfig,
}

impl<G, E, S> IngestionPipeline<G, E, S>
where
    G: Generator,
    E: Embedder,
    S: DocumentStore,
{
    pub fn new(generator: G, embedder: E, store: S, schema: IndexSchema, config: IngestionConfig) -> Self {
        Self {
            generator,
            embedder,
            store,
            schema,
            config,
        }
    }

    /// Generate and index `count` documents, one at a time.
    ///
    /// A generation failure aborts the batch and is returned; documents
    /// indexed before it stay indexed. Any later step failing only skips
    /// that item and is recorded in [`BatchOutcome::failures`].
    pub async fn ingest_batch(&self, count: usize) -> Result<BatchOutcome> {
        let mut outcome = BatchOutcome::default();

        info!(count, index = %self.config.index, "Starting ingestion batch");

        for position in 1..=count {
            let content = self
                .generator
                .generate(&self.config.prompt)
                .await
                .inspect_err(|e| {
                    error!(
                        position,
                        indexed = outcome.documents.len(),
                        error = %e,
                        "Generation failed, aborting batch"
                    );
                })?;

            match self.index_one(content).await {
                Ok(document) => outcome.documents.push(document),
                Err(e) => {
                    warn!(position, error = %e, "Skipping document that could not be indexed");
                    outcome.failures.push(IndexingFailure { position, error: e });
                }
            }
        }

        info!(
            index = %self.config.index,
            indexed = outcome.documents.len(),
            failed = outcome.failures.len(),
            "Ingestion batch completed"
        );

        Ok(outcome)
    }

    async fn index_one(&self, content: String) -> Result<Document> {
        let document = if self.config.embed_documents {
            let vector = self
                .embedder
                .embed(&content)
                .await
                .map_err(|e| DomainError::indexing(format!("could not embed document: {e}")))?;
            Document::embedded(content, vector)
        } else {
            Document::text(content)
        };

        self.schema.validate(&document)?;

        let id = self
            .store
            .index_document(&self.config.index, &document)
            .await
            .map_err(|e| DomainError::indexing(e.to_string()))?;

        debug!(id, index = %self.config.index, "Indexed document");
        Ok(document)
    }
}
