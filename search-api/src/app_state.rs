use std::sync::Arc;

use crate::domain::{
    ingest::{Generator, IngestionPipeline},
    search::{DocumentStore, Embedder, SearchService, StoreHandle},
};

pub type DynSearchService = SearchService<Arc<dyn Embedder>, Arc<dyn DocumentStore>>;
pub type DynIngestionPipeline =
    IngestionPipeline<Arc<dyn Generator>, Arc<dyn Embedder>, Arc<dyn DocumentStore>>;

#[derive(Clone)]
pub struct AppState {
    search_service: Arc<DynSearchService>,
    ingestion_pipeline: Arc<DynIngestionPipeline>,
    store: Arc<StoreHandle>,
    max_batch_size: usize,
}

impl AppState {
    pub fn new(
        search_service: DynSearchService,
        ingestion_pipeline: DynIngestionPipeline,
        store: Arc<StoreHandle>,
        max_batch_size: usize,
    ) -> Self {
        Self {
            search_service: Arc::new(search_service),
            ingestion_pipeline: Arc::new(ingestion_pipeline),
            store,
            max_batch_size,
        }
    }

    pub fn search_service(&self) -> &DynSearchService {
        &self.search_service
    }

    pub fn ingestion_pipeline(&self) -> &DynIngestionPipeline {
        &self.ingestion_pipeline
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// Largest `count` accepted by a single ingestion request.
    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }
}
