//! Mock embedder implementation for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::domain::search::traits::Embedder;
use crate::domain::{DomainError, Result};

/// Mock embedder that returns configurable vectors.
#[derive(Clone)]
pub struct MockEmbedder {
    responses: Arc<Vec<Vec<f32>>>,
    failure: Option<String>,
    call_count: Arc<AtomicUsize>,
}

impl MockEmbedder {
    /// Create a mock that always returns the same vector.
    pub fn returning(vector: Vec<f32>) -> Self {
        Self {
            responses: Arc::new(vec![vector]),
            failure: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock that returns vectors in sequence.
    ///
    /// Wraps around if more calls are made than vectors provided.
    pub fn with_sequence(vectors: Vec<Vec<f32>>) -> Self {
        Self {
            responses: Arc::new(vectors),
            failure: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock whose every call fails as if the provider were down.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            responses: Arc::new(vec![]),
            failure: Some(message.into()),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times `embed` was called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::returning(vec![0.0; 3])
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.failure {
            return Err(DomainError::embedding(message.clone()));
        }
        let response_idx = idx % self.responses.len();
        Ok(self.responses[response_idx].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_returns_sequence() {
        let embedder = MockEmbedder::with_sequence(vec![vec![1.0], vec![2.0]]);

        assert_eq!(embedder.embed("a").await.unwrap(), vec![1.0]);
        assert_eq!(embedder.embed("b").await.unwrap(), vec![2.0]);
        // Wraps around
        assert_eq!(embedder.embed("c").await.unwrap(), vec![1.0]);
        assert_eq!(embedder.call_count(), 3);
    }

    #[tokio::test]
    async fn failing_mock_counts_calls() {
        let embedder = MockEmbedder::failing("down");

        assert!(embedder.embed("a").await.is_err());
        assert_eq!(embedder.call_count(), 1);
    }
}
