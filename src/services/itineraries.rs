use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::{
    catalog::CatalogAccessor,
    engine::assembler::{assemble, auto_plan, AssembleRequest, AutoPlanRequest},
    error::AppResult,
    models::Itinerary,
    store::ItineraryStore,
};

/// Assembles an itinerary from explicit picks and persists it
///
/// Assembly is all-or-nothing, so a failed resolution never reaches
/// the store.
pub async fn create_itinerary(
    catalog: Arc<dyn CatalogAccessor>,
    store: Arc<dyn ItineraryStore>,
    request: AssembleRequest,
) -> AppResult<Itinerary> {
    let start = Instant::now();

    // 1. Resolve the picks and walk the schedule
    let itinerary = assemble(catalog.as_ref(), request).await?;

    // 2. Persist the finished record
    let stored = store.create(itinerary).await?;

    tracing::info!(
        itinerary_id = %stored.id,
        user_id = %stored.user_id,
        destinations = stored.entries.len(),
        total_days = stored.total_days,
        processing_time_ms = start.elapsed().as_millis(),
        "Itinerary created"
    );

    Ok(stored)
}

/// Plans an itinerary from constraints and persists it
pub async fn auto_generate_itinerary(
    catalog: Arc<dyn CatalogAccessor>,
    store: Arc<dyn ItineraryStore>,
    request: AutoPlanRequest,
) -> AppResult<Itinerary> {
    let start = Instant::now();

    // 1. Greedy plan under the budget and duration constraints
    let itinerary = auto_plan(catalog.as_ref(), request).await?;

    // 2. Persist the finished record
    let stored = store.create(itinerary).await?;

    tracing::info!(
        itinerary_id = %stored.id,
        user_id = %stored.user_id,
        destinations = stored.entries.len(),
        total_days = stored.total_days,
        total_cost = stored.total_cost,
        processing_time_ms = start.elapsed().as_millis(),
        "Itinerary auto-generated"
    );

    Ok(stored)
}

/// Lists the user's itineraries, newest first
///
/// Delegates to the configured store, maintaining a clean separation
/// between HTTP routing and persistence.
pub async fn list_itineraries(
    store: Arc<dyn ItineraryStore>,
    user_id: &str,
) -> AppResult<Vec<Itinerary>> {
    store.list_by_user(user_id).await
}

/// Fetches a single itinerary scoped to the requesting user
pub async fn get_itinerary(
    store: Arc<dyn ItineraryStore>,
    id: Uuid,
    user_id: &str,
) -> AppResult<Itinerary> {
    store.get(id, user_id).await
}

/// Deletes an itinerary after the store's ownership check
pub async fn delete_itinerary(
    store: Arc<dyn ItineraryStore>,
    id: Uuid,
    user_id: &str,
) -> AppResult<()> {
    store.delete(id, user_id).await?;

    tracing::info!(
        itinerary_id = %id,
        user_id = %user_id,
        "Itinerary deleted"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::memory::InMemoryCatalog;
    use crate::error::AppError;
    use crate::models::{Category, Destination, Season};
    use crate::store::memory::InMemoryItineraryStore;
    use crate::store::MockItineraryStore;

    fn create_test_destination(id: &str, duration_days: u32, cost_per_day: f64) -> Destination {
        Destination {
            id: id.to_string(),
            name: format!("Destination {}", id),
            location: "Nepal".to_string(),
            category: Category::Cultural,
            difficulty: 2,
            avg_cost_per_day: cost_per_day,
            duration_days,
            best_season: Season::Any,
            altitude_m: None,
            coordinates: None,
            popularity: 60.0,
            permit_required: false,
            description: String::new(),
            activities: vec![],
        }
    }

    fn create_test_catalog() -> Arc<InMemoryCatalog> {
        Arc::new(InMemoryCatalog::new(vec![
            create_test_destination("bhaktapur", 2, 25.0),
            create_test_destination("patan", 1, 20.0),
        ]))
    }

    #[tokio::test]
    async fn test_created_itinerary_is_listed_for_its_owner() {
        let catalog = create_test_catalog();
        let store = Arc::new(InMemoryItineraryStore::new());

        let request = AssembleRequest {
            user_id: "traveler-1".to_string(),
            title: "Valley Weekend".to_string(),
            destination_ids: vec!["bhaktapur".to_string(), "patan".to_string()],
        };
        let created = create_itinerary(catalog, store.clone(), request)
            .await
            .unwrap();

        let listed = list_itineraries(store, "traveler-1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].total_days, 3);
        assert_eq!(listed[0].total_cost, 70.00);
    }

    #[tokio::test]
    async fn test_failed_assembly_never_touches_the_store() {
        let catalog = create_test_catalog();

        let mut store = MockItineraryStore::new();
        store.expect_create().times(0);
        let store: Arc<dyn ItineraryStore> = Arc::new(store);

        let request = AssembleRequest {
            user_id: "traveler-1".to_string(),
            title: "Broken Trip".to_string(),
            destination_ids: vec!["bhaktapur".to_string(), "atlantis".to_string()],
        };
        let err = create_itinerary(catalog, store, request).await.unwrap_err();
        assert!(matches!(err, AppError::UnknownDestination(id) if id == "atlantis"));
    }

    #[tokio::test]
    async fn test_auto_generate_persists_the_plan() {
        let catalog = create_test_catalog();
        let store = Arc::new(InMemoryItineraryStore::new());

        let request = AutoPlanRequest {
            user_id: "traveler-1".to_string(),
            budget: 200.0,
            duration_days: 3,
            interests: vec!["cultural".to_string()],
            max_difficulty: 3,
        };
        let created = auto_generate_itinerary(catalog, store.clone(), request)
            .await
            .unwrap();
        assert_eq!(created.title, "Auto-Generated Trip - 3 Days");

        let fetched = get_itinerary(store, created.id, "traveler-1").await.unwrap();
        assert_eq!(fetched.entries.len(), created.entries.len());
    }

    #[tokio::test]
    async fn test_delete_propagates_forbidden() {
        let catalog = create_test_catalog();
        let store = Arc::new(InMemoryItineraryStore::new());

        let request = AssembleRequest {
            user_id: "traveler-1".to_string(),
            title: "Private Trip".to_string(),
            destination_ids: vec!["patan".to_string()],
        };
        let created = create_itinerary(catalog, store.clone(), request)
            .await
            .unwrap();

        let err = delete_itinerary(store.clone(), created.id, "traveler-2")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        // Still there for the owner
        assert!(get_itinerary(store, created.id, "traveler-1").await.is_ok());
    }
}
