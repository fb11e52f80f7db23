use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    engine::ranker::RankOptions,
    error::AppResult,
    middleware::request_id::RequestId,
    models::{Destination, PreferenceInput},
    routes::AppState,
    services::recommendations,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub preferences: PreferenceInput,
    pub top_k: Option<usize>,
    #[serde(default)]
    pub min_score: f64,
}

/// One ranked result in the response body
#[derive(Debug, Serialize)]
pub struct RecommendedDestination {
    pub destination: Destination,
    pub score: f64,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Vec<RecommendedDestination>>> {
    tracing::info!(
        request_id = %request_id,
        categories = request.preferences.categories.len(),
        top_k = ?request.top_k,
        "Processing recommendation request"
    );

    let options = RankOptions {
        top_k: request.top_k,
        min_score: request.min_score,
    };
    let ranking = recommendations::recommend(
        state.catalog.clone(),
        state.weights,
        request.preferences,
        options,
    )
    .await?;

    let results: Vec<RecommendedDestination> = ranking
        .into_vec()
        .into_iter()
        .map(|entry| RecommendedDestination {
            destination: entry.destination,
            score: entry.score,
        })
        .collect();

    tracing::info!(
        request_id = %request_id,
        results = results.len(),
        "Recommendation request completed"
    );

    Ok(Json(results))
}
