use axum::{
    extract::{Query, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::ApiError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/generate-universe-paragraphs", post(generate_paragraphs))
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateQuery {
    #[serde(default = "default_count")]
    count: usize,
}

fn default_count() -> usize {
    1
}

#[derive(Debug, Serialize)]
struct GeneratedParagraph {
    content: String,
}

#[instrument(name = "POST /generate-universe-paragraphs", skip(app_state))]
async fn generate_paragraphs(
    State(app_state): State<AppState>,
    Query(query): Query<GenerateQuery>,
) -> Result<Json<Vec<GeneratedParagraph>>, ApiError> {
    let max = app_state.max_batch_size();
    if query.count > max {
        return Err(ApiError::bad_request(format!(
            "count must be at most {max}, got {}",
            query.count
        )));
    }

    let outcome = app_state
        .ingestion_pipeline()
        .ingest_batch(query.count)
        .await?;

    for failure in &outcome.failures {
        debug!(
            position = failure.position,
            error = %failure.error,
            "Paragraph left out of response"
        );
    }

    Ok(Json(
        outcome
            .documents
            .into_iter()
            .map(|doc| GeneratedParagraph {
                content: doc.content,
            })
            .collect(),
    ))
}
