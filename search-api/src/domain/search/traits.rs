//! Trait definitions for search domain abstractions.
//!
//! These traits enable dependency injection and easy testing through mocking.

use std::sync::Arc;

use async_trait::async_trait;

use super::types::{Document, HybridQuery, IndexSchema, SearchResult};
use crate::domain::Result;

/// Error reported by a document store adapter.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store rejected request: {0}")]
    Rejected(String),

    #[error("malformed store response: {0}")]
    Malformed(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Trait for text embedding generation.
///
/// Implementations return `DomainError::EmbeddingUnavailable` on any
/// provider failure and never retry on their own.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Trait for the document store backing both search and ingestion.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Lightweight liveness probe.
    async fn ping(&self) -> StoreResult<()>;

    async fn index_exists(&self, index: &str) -> StoreResult<bool>;

    /// Create an index with the given schema.
    ///
    /// Returns `false` if the index already existed, so concurrent creators
    /// don't fail.
    async fn create_index(&self, index: &str, schema: &IndexSchema) -> StoreResult<bool>;

    /// Write a document, returning its store-assigned id.
    async fn index_document(&self, index: &str, document: &Document) -> StoreResult<String>;

    /// Execute a hybrid query. Results are sorted by score, highest first.
    async fn search(&self, index: &str, query: &HybridQuery) -> StoreResult<Vec<SearchResult>>;
}

#[async_trait]
impl<T: Embedder + ?Sized> Embedder for Arc<T> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text).await
    }
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    async fn ping(&self) -> StoreResult<()> {
        (**self).ping().await
    }

    async fn index_exists(&self, index: &str) -> StoreResult<bool> {
        (**self).index_exists(index).await
    }

    async fn create_index(&self, index: &str, schema: &IndexSchema) -> StoreResult<bool> {
        (**self).create_index(index, schema).await
    }

    async fn index_document(&self, index: &str, document: &Document) -> StoreResult<String> {
        (**self).index_document(index, document).await
    }

    async fn search(&self, index: &str, query: &HybridQuery) -> StoreResult<Vec<SearchResult>> {
        (**self).search(index, query).await
    }
}
