use thiserror::Error;

/// Errors surfaced by the search and ingestion pipelines.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("embedding provider unavailable: {0}")]
    EmbeddingUnavailable(String),
    #[error("generation failed after {attempts} attempts: {last_error}")]
    GenerationFailed { attempts: u32, last_error: String },
    #[error("document store unreachable after {attempts} attempts: {last_error}")]
    StoreUnreachable { attempts: u32, last_error: String },
    #[error("search failed: {0}")]
    SearchFailed(String),
    #[error("indexing failed: {0}")]
    IndexingFailed(String),
    #[error("index bootstrap failed for '{index}': {reason}")]
    Schema { index: String, reason: String },
}

impl DomainError {
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::EmbeddingUnavailable(msg.into())
    }

    pub fn indexing(msg: impl Into<String>) -> Self {
        Self::IndexingFailed(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
