use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    engine::assembler::{AssembleRequest, AutoPlanRequest},
    error::AppResult,
    middleware::request_id::RequestId,
    models::Itinerary,
    routes::AppState,
    services::itineraries,
};

/// Identifies the acting user; authentication lives outside this service
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    user_id: String,
}

/// Handler for itinerary creation from explicit picks
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<AssembleRequest>,
) -> AppResult<(StatusCode, Json<Itinerary>)> {
    tracing::info!(
        request_id = %request_id,
        user_id = %request.user_id,
        destinations = request.destination_ids.len(),
        "Processing itinerary creation"
    );

    let itinerary =
        itineraries::create_itinerary(state.catalog.clone(), state.store.clone(), request).await?;
    Ok((StatusCode::CREATED, Json(itinerary)))
}

/// Handler for constraint-driven itinerary generation
pub async fn auto_generate(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<AutoPlanRequest>,
) -> AppResult<(StatusCode, Json<Itinerary>)> {
    tracing::info!(
        request_id = %request_id,
        user_id = %request.user_id,
        budget = request.budget,
        duration_days = request.duration_days,
        "Processing itinerary auto-generation"
    );

    let itinerary =
        itineraries::auto_generate_itinerary(state.catalog.clone(), state.store.clone(), request)
            .await?;
    Ok((StatusCode::CREATED, Json(itinerary)))
}

/// Handler for listing the user's itineraries
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<Vec<Itinerary>>> {
    let listed = itineraries::list_itineraries(state.store.clone(), &query.user_id).await?;
    Ok(Json(listed))
}

/// Handler for a single itinerary lookup
pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<Itinerary>> {
    let itinerary = itineraries::get_itinerary(state.store.clone(), id, &query.user_id).await?;
    Ok(Json(itinerary))
}

/// Handler for itinerary deletion
pub async fn delete_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> AppResult<StatusCode> {
    itineraries::delete_itinerary(state.store.clone(), id, &query.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
