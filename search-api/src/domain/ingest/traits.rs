use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::Result;

/// Trait for text generation.
///
/// Implementations absorb transient provider failures themselves and
/// only return `DomainError::GenerationFailed` once they give up.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl<T: Generator + ?Sized> Generator for Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt).await
    }
}
