use std::collections::HashSet;

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::catalog::{CatalogAccessor, DestinationFilter};
use crate::error::{AppError, AppResult};
use crate::models::{totals_from_entries, Category, Destination, Itinerary, ItineraryEntry};

/// Fraction of the requested duration the auto-planner must fill
const AUTO_PLAN_FILL_TARGET: f64 = 0.9;

/// Request to assemble an itinerary from an explicit pick list
#[derive(Debug, Clone, Deserialize)]
pub struct AssembleRequest {
    pub user_id: String,
    pub title: String,
    pub destination_ids: Vec<String>,
}

/// Request to plan an itinerary from constraints alone
#[derive(Debug, Clone, Deserialize)]
pub struct AutoPlanRequest {
    pub user_id: String,
    pub budget: f64,
    pub duration_days: u32,
    #[serde(default)]
    pub interests: Vec<String>,
    pub max_difficulty: u8,
}

/// Builds an itinerary from the caller's ordered destination picks
///
/// Visit order is the caller's order; the assembler never reorders.
/// Every id must resolve, or the whole assembly fails with the first
/// unknown id and nothing is produced. The returned record carries a
/// fresh id and timestamp but has not been persisted.
pub async fn assemble(
    catalog: &dyn CatalogAccessor,
    request: AssembleRequest,
) -> AppResult<Itinerary> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("itinerary title is empty".to_string()));
    }
    if request.destination_ids.is_empty() {
        return Err(AppError::Validation(
            "itinerary needs at least one destination".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for id in &request.destination_ids {
        if !seen.insert(id.as_str()) {
            return Err(AppError::Validation(format!(
                "duplicate destination id '{}'",
                id
            )));
        }
    }

    let mut destinations = Vec::with_capacity(request.destination_ids.len());
    for id in &request.destination_ids {
        match catalog.get(id).await {
            Ok(destination) => destinations.push(destination),
            Err(AppError::NotFound(_)) => {
                return Err(AppError::UnknownDestination(id.clone()));
            }
            Err(other) => return Err(other),
        }
    }

    Ok(build_itinerary(
        request.user_id,
        title.to_string(),
        &destinations,
    ))
}

/// Plans an itinerary greedily from budget and duration constraints
///
/// Candidates are the catalog entries in the requested interest
/// categories (all of them when none are named) at or below the
/// difficulty cap, most popular first. Each candidate that still fits
/// the remaining duration and budget is taken; planning stops once at
/// least 90% of the requested days are filled.
pub async fn auto_plan(
    catalog: &dyn CatalogAccessor,
    request: AutoPlanRequest,
) -> AppResult<Itinerary> {
    if request.budget <= 0.0 {
        return Err(AppError::Validation("budget must be positive".to_string()));
    }
    if request.duration_days == 0 {
        return Err(AppError::Validation(
            "duration must be at least one day".to_string(),
        ));
    }

    let mut interests = HashSet::new();
    for token in &request.interests {
        let category = Category::from_token(token)
            .ok_or_else(|| AppError::Validation(format!("unknown category '{}'", token)))?;
        interests.insert(category);
    }

    let mut candidates = catalog.list(&DestinationFilter::default()).await?;
    candidates.retain(|destination| {
        (interests.is_empty() || interests.contains(&destination.category))
            && destination.difficulty <= request.max_difficulty
    });
    candidates.sort_by(|a, b| {
        b.popularity
            .total_cmp(&a.popularity)
            .then_with(|| a.id.cmp(&b.id))
    });

    let target_days = request.duration_days;
    let fill_floor = target_days as f64 * AUTO_PLAN_FILL_TARGET;

    let mut selected: Vec<Destination> = Vec::new();
    let mut planned_days = 0u32;
    let mut planned_cost = 0.0f64;

    for candidate in candidates {
        let projected_days = planned_days + candidate.duration_days;
        let projected_cost =
            planned_cost + candidate.avg_cost_per_day * candidate.duration_days as f64;

        if projected_days <= target_days && projected_cost <= request.budget {
            planned_days = projected_days;
            planned_cost = projected_cost;
            selected.push(candidate);
        }

        if planned_days as f64 >= fill_floor {
            break;
        }
    }

    if selected.is_empty() {
        return Err(AppError::Validation(
            "no destinations fit the constraints".to_string(),
        ));
    }

    let title = format!("Auto-Generated Trip - {} Days", request.duration_days);
    Ok(build_itinerary(request.user_id, title, &selected))
}

/// Walks the day counter over the picks and snapshots each destination
///
/// Day ranges are contiguous from 1; each entry keeps the denormalized
/// destination fields so stored itineraries survive later catalog
/// edits. Entry costs stay unrounded, rounding happens once on the
/// aggregate.
fn build_itinerary(user_id: String, title: String, destinations: &[Destination]) -> Itinerary {
    let mut entries = Vec::with_capacity(destinations.len());
    let mut next_day = 1u32;

    for destination in destinations {
        let start_day = next_day;
        let end_day = start_day + destination.duration_days - 1;
        next_day = end_day + 1;

        entries.push(ItineraryEntry {
            destination_id: destination.id.clone(),
            name: destination.name.clone(),
            location: destination.location.clone(),
            category: destination.category,
            difficulty: destination.difficulty,
            activities: destination.activities.clone(),
            altitude_m: destination.altitude_m,
            description: destination.description.clone(),
            start_day,
            end_day,
            duration_days: destination.duration_days,
            cost: destination.avg_cost_per_day * destination.duration_days as f64,
        });
    }

    let totals = totals_from_entries(&entries);
    Itinerary {
        id: Uuid::new_v4(),
        user_id,
        title,
        created_at: Utc::now(),
        entries,
        total_days: totals.days,
        total_cost: totals.cost,
    }
}
