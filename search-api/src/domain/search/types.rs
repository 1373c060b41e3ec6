//! Core types for the search domain.

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Result};

/// A document as stored in an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    /// Dense embedding of `content`. Absent when the document was indexed
    /// without embedding it first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
}

impl Document {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            vector: None,
        }
    }

    pub fn embedded(content: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            content: content.into(),
            vector: Some(vector),
        }
    }
}

/// Result from a search query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub content: String,
    /// Store relevance score (higher is better)
    pub score: f64,
}

/// A combined lexical + vector query, built once per search request.
#[derive(Debug, Clone, PartialEq)]
pub struct HybridQuery {
    /// Raw query text, matched against the `content` field
    pub text: String,
    /// Embedding of `text`, compared against each document's `vector`
    pub vector: Vec<f32>,
    /// Maximum number of hits to return
    pub size: usize,
}

/// Field layout of an index.
///
/// `content` is always full-text searchable with an exact-match sub-field.
/// `vector` is a dense vector of fixed dimension when `vector_dimensions` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSchema {
    pub vector_dimensions: Option<usize>,
}

impl IndexSchema {
    #[cfg(test)]
    pub fn text_only() -> Self {
        Self {
            vector_dimensions: None,
        }
    }

    pub fn with_vector(dimensions: usize) -> Self {
        Self {
            vector_dimensions: Some(dimensions),
        }
    }

    /// Rejects documents whose vector doesn't fit this schema.
    ///
    /// A missing vector is always accepted.
    pub fn validate(&self, document: &Document) -> Result<()> {
        let Some(vector) = &document.vector else {
            return Ok(());
        };

        match self.vector_dimensions {
            Some(dims) if vector.len() == dims => Ok(()),
            Some(dims) => Err(DomainError::indexing(format!(
                "vector has {} dimensions, index expects {}",
                vector.len(),
                dims
            ))),
            None => Err(DomainError::indexing(
                "index has no vector field but document carries a vector",
            )),
        }
    }
}
