//! Hybrid search over the document store.
//!
//! A query is embedded once and sent to the store as a single request that
//! combines:
//! - a **full-text match** on the `content` field
//! - a **vector similarity** score, `cosineSimilarity + 1.0`, on the `vector` field
//!
//! Both clauses are OR-ed (`bool.should`), so their scores add up for
//! documents that match both.
//!
//! # Architecture
//!
//! - [`Embedder`] - Query/document embedding (HTTP provider, mocks)
//! - [`DocumentStore`] - Store operations (Elasticsearch, mocks)
//! - [`StoreConnector`] - Startup probing and index bootstrap

mod connector;
mod service;
mod traits;
mod types;

pub mod embedder;
pub mod store;

// Re-export main types
pub use connector::{StoreConnector, StoreHandle};
pub use service::{SearchConfig, SearchService};
pub use traits::{DocumentStore, Embedder};
pub use types::{Document, IndexSchema, SearchResult};
