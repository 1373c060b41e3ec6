use std::{path::Path, str::FromStr, time::Duration};

use serde::Deserialize;
use serde_with::serde_as;
use strum::{Display, EnumString};
use url::Url;

use crate::domain::{
    ingest::{GenerationProvider, IngestionConfig},
    retry::RetryPolicy,
    search::SearchConfig,
};

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub store: StoreSettings,
    pub embedding: EmbeddingSettings,
    pub generation: GenerationSettings,
    pub ingestion: IngestionSettings,
    pub search: SearchSettings,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub port: u16,
    pub host: String,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct StoreSettings {
    pub url: String,
    pub search_index: String,
    pub ingest_index: String,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub connect_max_attempts: u32,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub connect_retry_interval_secs: u64,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub connect_probe_timeout_ms: u64,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub request_timeout_secs: u64,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct EmbeddingSettings {
    pub endpoint: String,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub dimensions: usize,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub timeout_secs: u64,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct GenerationSettings {
    pub provider: GenerationProvider,
    pub model: String,
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub timeout_secs: u64,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub max_attempts: u32,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub retry_delay_secs: u64,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct IngestionSettings {
    pub prompt: String,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub embed_documents: bool,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub max_batch_size: usize,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct SearchSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub default_limit: usize,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub max_limit: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid {field} URL '{value}': {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        source: url::ParseError,
    },
    #[error("generation.api_key is required for the hosted provider")]
    MissingApiKey,
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

impl StoreSettings {
    pub fn connect_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.connect_max_attempts,
            Duration::from_secs(self.connect_retry_interval_secs),
        )
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_probe_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl EmbeddingSettings {
    pub fn endpoint_url(&self) -> Result<Url, SettingsError> {
        parse_url("embedding.endpoint", &self.endpoint)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl GenerationSettings {
    pub fn endpoint_url(&self) -> Result<Url, SettingsError> {
        parse_url("generation.endpoint", &self.endpoint)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_secs(self.retry_delay_secs))
    }
}

impl Settings {
    /// Checks cross-field constraints that serde can't express.
    pub fn validate(&self) -> Result<(), SettingsError> {
        parse_url("store.url", &self.store.url)?;
        self.embedding.endpoint_url()?;
        self.generation.endpoint_url()?;

        if self.generation.provider == GenerationProvider::Hosted
            && self
                .generation
                .api_key
                .as_deref()
                .map_or(true, |key| key.trim().is_empty())
        {
            return Err(SettingsError::MissingApiKey);
        }
        if self.embedding.dimensions == 0 {
            return Err(SettingsError::Zero("embedding.dimensions"));
        }
        if self.store.connect_max_attempts == 0 {
            return Err(SettingsError::Zero("store.connect_max_attempts"));
        }
        if self.store.connect_probe_timeout_ms == 0 {
            return Err(SettingsError::Zero("store.connect_probe_timeout_ms"));
        }
        if self.generation.max_attempts == 0 {
            return Err(SettingsError::Zero("generation.max_attempts"));
        }

        Ok(())
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            index: self.store.search_index.clone(),
            default_limit: self.search.default_limit,
            max_limit: self.search.max_limit,
        }
    }

    pub fn ingestion_config(&self) -> IngestionConfig {
        IngestionConfig {
            index: self.store.ingest_index.clone(),
            prompt: self.ingestion.prompt.clone(),
            embed_documents: self.ingestion.embed_documents,
        }
    }
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|source| SettingsError::InvalidUrl {
        field,
        value: value.to_string(),
        source,
    })
}

pub fn read_config() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let config_directory = base_path.join("config");

    let environment = Environment::from_str(
        std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .as_str(),
    )
    .expect("Failed to parse APP_ENVIRONMENT");

    read_config_from(&config_directory, environment)
}

pub fn read_config_from(
    config_directory: &Path,
    environment: Environment,
) -> Result<Settings, config::ConfigError> {
    let environment_filename = format!("{}.yaml", environment);

    let settings = config::Config::builder()
        .add_source(config::File::from(config_directory.join("base.yaml")))
        .add_source(
            config::File::from(config_directory.join(environment_filename)).required(false),
        )
        .add_source(
            config::Environment::with_prefix("SEARCH")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[derive(Display, Debug, EnumString, Clone, Copy)]
pub enum Environment {
    #[strum(ascii_case_insensitive, serialize = "local")]
    Local,
    #[strum(ascii_case_insensitive, serialize = "production")]
    Production,
}
