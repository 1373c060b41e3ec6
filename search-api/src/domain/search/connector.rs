//! Store connection bootstrap.
//!
//! The store usually starts alongside this service, so [`StoreConnector::connect`]
//! probes it with a bounded retry before anything else runs. Once connected,
//! the resulting [`StoreHandle`] is shared by every component that talks to
//! the store.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use strum::Display;
use tracing::{debug, error, info};

use super::traits::{DocumentStore, StoreError};
use super::types::IndexSchema;
use crate::domain::retry::{retry, RetryPolicy};
use crate::domain::{DomainError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Unconnected,
    Connecting,
    Connected,
    /// Terminal: the retry budget was exhausted.
    Failed,
}

/// Shared, read-mostly view of the connection lifecycle.
#[derive(Debug, Clone, Default)]
pub struct ConnectionStatus(Arc<RwLock<ConnectionState>>);

impl ConnectionStatus {
    pub fn get(&self) -> ConnectionState {
        *self.0.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set(&self, state: ConnectionState) {
        *self.0.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = state;
    }
}

/// Probes that take longer than this count as failed.
const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(500);

pub struct StoreConnector {
    store: Arc<dyn DocumentStore>,
    policy: RetryPolicy,
    probe_timeout: Duration,
    status: ConnectionStatus,
}

impl StoreConnector {
    pub fn new(store: Arc<dyn DocumentStore>, policy: RetryPolicy) -> Self {
        Self {
            store,
            policy,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            status: ConnectionStatus::default(),
        }
    }

    /// Upper bound for a single liveness probe. A store that accepts
    /// connections but never answers still fails within
    /// `max_attempts * probe_timeout + total_backoff`.
    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    #[cfg(test)]
    pub fn status(&self) -> ConnectionStatus {
        self.status.clone()
    }

    /// Probe the store until it answers or the retry budget runs out.
    ///
    /// Consumes the connector, so bootstrap can only run once. Failure is
    /// meant to be fatal for the process.
    pub async fn connect(self) -> Result<StoreHandle> {
        self.status.set(ConnectionState::Connecting);
        info!(
            max_attempts = self.policy.max_attempts,
            retry_interval_secs = self.policy.delay.as_secs(),
            max_wait_secs = self.policy.total_backoff().as_secs(),
            probe_timeout_ms = self.probe_timeout.as_millis() as u64,
            "Connecting to document store"
        );

        let store = self.store.clone();
        let probe_timeout = self.probe_timeout;
        let probe = retry(self.policy, "store liveness probe", |attempt| {
            let store = store.clone();
            async move {
                debug!(attempt, "Probing document store");
                tokio::time::timeout(probe_timeout, store.ping())
                    .await
                    .unwrap_or_else(|_| {
                        Err(StoreError::Unavailable(format!(
                            "no answer within {}ms",
                            probe_timeout.as_millis()
                        )))
                    })
            }
        })
        .await;

        match probe {
            Ok(()) => {
                self.status.set(ConnectionState::Connected);
                info!("Connected to document store");
                Ok(StoreHandle {
                    store: self.store,
                    status: self.status,
                    verified: tokio::sync::Mutex::new(HashSet::new()),
                })
            }
            Err(exhausted) => {
                self.status.set(ConnectionState::Failed);
                error!(
                    attempts = exhausted.attempts,
                    error = %exhausted.last_error,
                    "Document store never became reachable"
                );
                Err(DomainError::StoreUnreachable {
                    attempts: exhausted.attempts,
                    last_error: exhausted.last_error.to_string(),
                })
            }
        }
    }
}

/// Live connection to the document store.
pub struct StoreHandle {
    store: Arc<dyn DocumentStore>,
    status: ConnectionStatus,
    /// Indexes already checked or created through this handle. The mutex
    /// also serializes concurrent `ensure_schema` calls.
    verified: tokio::sync::Mutex<HashSet<String>>,
}

impl fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreHandle")
            .field("status", &self.status.get())
            .field("verified", &self.verified)
            .finish_non_exhaustive()
    }
}

impl StoreHandle {
    pub fn store(&self) -> Arc<dyn DocumentStore> {
        self.store.clone()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status.clone()
    }

    /// Create `index` with `schema` unless it already exists.
    ///
    /// Returns whether this call created the index.
    pub async fn ensure_schema(&self, index: &str, schema: &IndexSchema) -> Result<bool> {
        let mut verified = self.verified.lock().await;
        if verified.contains(index) {
            debug!(index, "Index already verified");
            return Ok(false);
        }

        let schema_error = |reason: String| {
            error!(index, reason = %reason, "Index bootstrap failed");
            DomainError::Schema {
                index: index.to_string(),
                reason,
            }
        };

        let exists = self
            .store
            .index_exists(index)
            .await
            .map_err(|e| schema_error(e.to_string()))?;

        let created = if exists {
            info!(index, "Index already exists");
            false
        } else {
            self.store
                .create_index(index, schema)
                .await
                .map_err(|e| schema_error(e.to_string()))?
        };

        verified.insert(index.to_string());
        Ok(created)
    }

    /// Release the connection at shutdown.
    pub fn teardown(&self) {
        self.status.set(ConnectionState::Unconnected);
        info!("Document store connection released");
    }
}
