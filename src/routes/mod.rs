use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::catalog::CatalogAccessor;
use crate::engine::scorer::ScoringWeights;
use crate::store::ItineraryStore;

pub mod destinations;
pub mod itineraries;
pub mod recommendations;

/// Shared application state
///
/// Collaborators sit behind trait objects so the integration tests can
/// swap the database-backed catalog and store for in-memory ones.
pub struct AppState {
    pub catalog: Arc<dyn CatalogAccessor>,
    pub store: Arc<dyn ItineraryStore>,
    pub weights: ScoringWeights,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Destinations
        .route("/destinations", get(destinations::list))
        .route("/destinations/popular/top", get(destinations::popular))
        .route("/destinations/:id", get(destinations::get_by_id))
        // Recommendations
        .route("/recommendations", post(recommendations::recommend))
        // Itineraries
        .route(
            "/itineraries",
            post(itineraries::create).get(itineraries::list),
        )
        .route("/itineraries/auto", post(itineraries::auto_generate))
        .route(
            "/itineraries/:id",
            get(itineraries::get_by_id).delete(itineraries::delete_by_id),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
