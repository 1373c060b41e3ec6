use std::sync::Arc;

use elastic_client::{ElasticClient, ElasticError};
use tracing_subscriber::EnvFilter;

use crate::{
    app_state::AppState,
    config::{Settings, SettingsError},
    domain::{
        ingest::{Generator, HttpGenerator, IngestionPipeline},
        search::{
            embedder::HttpEmbedder, store::ElasticStore, DocumentStore, Embedder, IndexSchema,
            SearchService, StoreConnector, StoreHandle,
        },
        DomainError,
    },
};

mod app_state;
mod config;
mod domain;
mod router;
mod routes;

const DEFAULT_LOG_FILTER: &str = "search_api=debug,elastic_client=debug,tower_http=info";

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("failed to read configuration: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error("invalid configuration: {0}")]
    Settings(#[from] SettingsError),
    #[error("failed to create store client: {0}")]
    StoreClient(#[from] ElasticError),
    #[error("failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    dotenvy::from_filename(".env.local").ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Shutting down");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let settings = config::read_config()?;
    settings.validate()?;

    tracing::info!(
        store = %settings.store.url,
        provider = %settings.generation.provider,
        model = %settings.generation.model,
        embed_documents = settings.ingestion.embed_documents,
        "Configuration loaded"
    );

    let handle = Arc::new(connect_store(&settings).await?);

    let embedder: Arc<dyn Embedder> = Arc::new(HttpEmbedder::new(
        settings.embedding.endpoint_url()?,
        settings.embedding.dimensions,
        settings.embedding.timeout(),
    )?);
    let generator: Arc<dyn Generator> = Arc::new(
        HttpGenerator::new(
            settings.generation.provider,
            settings.generation.endpoint_url()?,
            settings.generation.model.clone(),
            settings.generation.timeout(),
        )?
        .with_api_key(settings.generation.api_key.clone())
        .with_retry(settings.generation.retry_policy()),
    );

    let search_service = SearchService::new(
        embedder.clone(),
        handle.store(),
        settings.search_config(),
    );
    let pipeline = IngestionPipeline::new(
        generator,
        embedder,
        handle.store(),
        IndexSchema::with_vector(settings.embedding.dimensions),
        settings.ingestion_config(),
    );

    let app_state = AppState::new(
        search_service,
        pipeline,
        handle.clone(),
        settings.ingestion.max_batch_size,
    );
    let app = router::create(app_state);

    let addr = format!("{}:{}", settings.application.host, settings.application.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    handle.teardown();
    Ok(())
}

/// Waits for the store, then makes sure every configured index exists.
async fn connect_store(settings: &Settings) -> Result<StoreHandle, StartupError> {
    let client = ElasticClient::new(&settings.store.url, settings.store.request_timeout())?;
    let store: Arc<dyn DocumentStore> = Arc::new(ElasticStore::new(client));

    let handle = StoreConnector::new(store, settings.store.connect_policy())
        .with_probe_timeout(settings.store.probe_timeout())
        .connect()
        .await?;

    let schema = IndexSchema::with_vector(settings.embedding.dimensions);
    for index in [&settings.store.search_index, &settings.store.ingest_index] {
        handle.ensure_schema(index, &schema).await?;
    }

    Ok(handle)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
