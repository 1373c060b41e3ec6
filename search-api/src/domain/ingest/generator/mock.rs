//! Mock generator for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::ingest::traits::Generator;
use crate::domain::{DomainError, Result};

/// Returns canned paragraphs in order, wrapping around when exhausted.
#[derive(Clone)]
pub struct MockGenerator {
    paragraphs: Arc<Vec<String>>,
    /// 1-based call that fails as if the provider gave up
    failing_call: Option<usize>,
    prompts: Arc<Mutex<Vec<String>>>,
    call_count: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockGenerator {
    pub fn returning(paragraphs: &[&str]) -> Self {
        Self {
            paragraphs: Arc::new(paragraphs.iter().map(|p| p.to_string()).collect()),
            failing_call: None,
            prompts: Arc::default(),
            call_count: Arc::default(),
        }
    }

    /// The `nth` (1-based) call returns `GenerationFailed`.
    pub fn failing_at(mut self, nth: usize) -> Self {
        self.failing_call = Some(nth);
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::returning(&["The universe is expanding."])
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.prompts.lock().unwrap().push(prompt.to_string());

        if self.failing_call == Some(call) {
            return Err(DomainError::GenerationFailed {
                attempts: 3,
                last_error: "provider returned an empty response".to_string(),
            });
        }

        Ok(self.paragraphs[(call - 1) % self.paragraphs.len()].clone())
    }
}
