use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    catalog::DestinationFilter,
    error::{AppError, AppResult},
    models::{Category, Destination, Season},
    routes::AppState,
};

const DEFAULT_PAGE_SIZE: usize = 100;
const MAX_PAGE_SIZE: usize = 100;
const DEFAULT_TOP_LIMIT: usize = 10;
const MAX_TOP_LIMIT: usize = 50;

/// Query parameters for the destination listing
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    category: Option<String>,
    search: Option<String>,
    difficulty: Option<u8>,
    min_cost: Option<f64>,
    max_cost: Option<f64>,
    season: Option<String>,
    #[serde(default)]
    skip: usize,
    limit: Option<usize>,
}

impl ListQuery {
    /// Parses the raw tokens and clamps paging into the allowed band
    fn into_filter(self) -> AppResult<DestinationFilter> {
        let category = match &self.category {
            Some(token) => Some(
                Category::from_token(token)
                    .ok_or_else(|| AppError::Validation(format!("unknown category '{}'", token)))?,
            ),
            None => None,
        };
        let season = match &self.season {
            Some(token) => Some(
                Season::from_token(token)
                    .ok_or_else(|| AppError::Validation(format!("unknown season '{}'", token)))?,
            ),
            None => None,
        };

        Ok(DestinationFilter {
            category,
            search: self.search,
            difficulty: self.difficulty,
            min_cost: self.min_cost,
            max_cost: self.max_cost,
            season,
            skip: self.skip,
            limit: Some(self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)),
        })
    }
}

/// Handler for the filtered destination listing
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Destination>>> {
    let filter = query.into_filter()?;
    let destinations = state.catalog.list(&filter).await?;
    Ok(Json(destinations))
}

/// Handler for a single destination lookup
pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Destination>> {
    let destination = state.catalog.get(&id).await?;
    Ok(Json(destination))
}

/// Query parameters for the popularity leaderboard
#[derive(Debug, Deserialize)]
pub struct TopQuery {
    limit: Option<usize>,
}

/// Handler for the most-popular listing
pub async fn popular(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TopQuery>,
) -> AppResult<Json<Vec<Destination>>> {
    let limit = query.limit.unwrap_or(DEFAULT_TOP_LIMIT).clamp(1, MAX_TOP_LIMIT);
    let destinations = state.catalog.top_by_popularity(limit).await?;
    Ok(Json(destinations))
}
