use serde::Deserialize;

/// Response of `GET /`, used as the liveness probe.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClusterInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cluster_name: String,
    #[serde(default)]
    pub version: VersionInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionInfo {
    #[serde(default)]
    pub number: String,
}

/// Response of `POST /{index}/_doc`.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexResponse {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    pub result: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse<T> {
    #[serde(default)]
    pub took: u64,
    pub hits: Hits<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hits<T> {
    pub max_score: Option<f64>,
    pub hits: Vec<Hit<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hit<T> {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score")]
    pub score: Option<f64>,
    #[serde(rename = "_source")]
    pub source: T,
}

impl<T> SearchResponse<T> {
    pub fn into_hits(self) -> Vec<Hit<T>> {
        self.hits.hits
    }
}

/// Error body returned by the store on non-success responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorCause,
    pub status: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorCause {
    #[serde(rename = "type")]
    pub kind: String,
    pub reason: Option<String>,
}

impl ErrorResponse {
    pub fn is_already_exists(&self) -> bool {
        self.error.kind == "resource_already_exists_exception"
    }
}
