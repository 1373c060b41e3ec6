//! Mock document store for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::search::traits::{DocumentStore, StoreError, StoreResult};
use crate::domain::search::types::{Document, HybridQuery, IndexSchema, SearchResult};

/// In-memory store that records every call.
///
/// Search scoring imitates the real query: number of query terms found in
/// `content`, plus `cosine + 1.0` for documents carrying a vector.
#[derive(Clone, Default)]
pub struct MockDocumentStore {
    indexes: Arc<RwLock<HashSet<String>>>,
    documents: Arc<RwLock<HashMap<String, Vec<Document>>>>,
    /// Number of upcoming pings that fail
    ping_failures: Arc<AtomicUsize>,
    /// Pings never answer, like a node that accepts connections while booting
    silent: Arc<AtomicBool>,
    /// 1-based `index_document` calls that fail
    failing_writes: Arc<RwLock<HashSet<usize>>>,
    search_failure: Arc<RwLock<Option<String>>>,
    last_query: Arc<RwLock<Option<HybridQuery>>>,
    ping_calls: Arc<AtomicUsize>,
    exists_calls: Arc<AtomicUsize>,
    create_calls: Arc<AtomicUsize>,
    write_calls: Arc<AtomicUsize>,
    search_calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-create an index.
    pub fn with_index(self, index: &str) -> Self {
        self.indexes.write().unwrap().insert(index.to_string());
        self
    }

    /// Add documents to an index, creating it if needed.
    pub fn with_documents(self, index: &str, docs: Vec<Document>) -> Self {
        self.indexes.write().unwrap().insert(index.to_string());
        self.documents
            .write()
            .unwrap()
            .entry(index.to_string())
            .or_default()
            .extend(docs);
        self
    }

    /// The first `count` pings fail.
    pub fn failing_pings(self, count: usize) -> Self {
        self.ping_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Every ping fails.
    pub fn unreachable(self) -> Self {
        self.failing_pings(usize::MAX)
    }

    /// Every ping hangs instead of answering.
    pub fn silent(self) -> Self {
        self.silent.store(true, Ordering::SeqCst);
        self
    }

    /// The `nth` (1-based) call to `index_document` fails.
    pub fn failing_write(self, nth: usize) -> Self {
        self.failing_writes.write().unwrap().insert(nth);
        self
    }

    pub fn failing_search(self, message: &str) -> Self {
        *self.search_failure.write().unwrap() = Some(message.to_string());
        self
    }

    pub fn documents(&self, index: &str) -> Vec<Document> {
        self.documents
            .read()
            .unwrap()
            .get(index)
            .cloned()
            .unwrap_or_default()
    }

    pub fn has_index(&self, index: &str) -> bool {
        self.indexes.read().unwrap().contains(index)
    }

    pub fn last_query(&self) -> Option<HybridQuery> {
        self.last_query.read().unwrap().clone()
    }

    pub fn ping_calls(&self) -> usize {
        self.ping_calls.load(Ordering::SeqCst)
    }

    pub fn exists_calls(&self) -> usize {
        self.exists_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }
}

fn tokens(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn ping(&self) -> StoreResult<()> {
        self.ping_calls.fetch_add(1, Ordering::SeqCst);
        if self.silent.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let remaining = self.ping_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            if remaining != usize::MAX {
                self.ping_failures.store(remaining - 1, Ordering::SeqCst);
            }
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }

    async fn index_exists(&self, index: &str) -> StoreResult<bool> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        // Give concurrent callers a chance to interleave
        tokio::task::yield_now().await;
        Ok(self.has_index(index))
    }

    async fn create_index(&self, index: &str, _schema: &IndexSchema) -> StoreResult<bool> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.indexes.write().unwrap().insert(index.to_string()))
    }

    async fn index_document(&self, index: &str, document: &Document) -> StoreResult<String> {
        let call = self.write_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing_writes.read().unwrap().contains(&call) {
            return Err(StoreError::Rejected(format!("write {call} rejected")));
        }

        let mut documents = self.documents.write().unwrap();
        let docs = documents.entry(index.to_string()).or_default();
        docs.push(document.clone());
        Ok(format!("{index}-{}", docs.len()))
    }

    async fn search(&self, index: &str, query: &HybridQuery) -> StoreResult<Vec<SearchResult>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.write().unwrap() = Some(query.clone());

        if let Some(message) = self.search_failure.read().unwrap().as_ref() {
            return Err(StoreError::Rejected(message.clone()));
        }
        if !self.has_index(index) {
            return Err(StoreError::Rejected(format!("no such index [{index}]")));
        }

        let query_terms = tokens(&query.text);
        let mut results: Vec<SearchResult> = self
            .documents(index)
            .into_iter()
            .filter_map(|doc| {
                let lexical = tokens(&doc.content).intersection(&query_terms).count() as f64;
                let semantic = doc
                    .vector
                    .as_deref()
                    .filter(|v| v.len() == query.vector.len())
                    .map(|v| cosine_similarity(v, &query.vector) + 1.0)
                    .unwrap_or(0.0);
                let score = lexical + semantic;
                (score > 0.0).then(|| SearchResult {
                    content: doc.content,
                    score,
                })
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(query.size);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(text: &str, vector: Vec<f32>) -> HybridQuery {
        HybridQuery {
            text: text.to_string(),
            vector,
            size: 10,
        }
    }

    #[tokio::test]
    async fn search_scores_lexical_plus_shifted_cosine() {
        let store = MockDocumentStore::new().with_documents(
            "idx",
            vec![
                Document::embedded("red giant", vec![1.0, 0.0]),
                Document::embedded("white dwarf", vec![-1.0, 0.0]),
            ],
        );

        let results = store
            .search("idx", &query("giant", vec![1.0, 0.0]))
            .await
            .unwrap();

        // Opposite vector and no shared terms scores zero and is dropped
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, "red giant");
        assert!((results[0].score - 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn pings_recover_after_configured_failures() {
        let store = MockDocumentStore::new().failing_pings(2);

        assert!(store.ping().await.is_err());
        assert!(store.ping().await.is_err());
        assert!(store.ping().await.is_ok());
        assert_eq!(store.ping_calls(), 3);
    }

    #[tokio::test]
    async fn failing_write_only_affects_that_call() {
        let store = MockDocumentStore::new().failing_write(2);

        assert!(store.index_document("idx", &Document::text("a")).await.is_ok());
        assert!(store.index_document("idx", &Document::text("b")).await.is_err());
        assert!(store.index_document("idx", &Document::text("c")).await.is_ok());
        assert_eq!(store.documents("idx").len(), 2);
    }
}
