use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Itinerary;
use crate::store::ItineraryStore;

/// Store backed by a lock-guarded vector, for tests and local runs
///
/// Records stay in insertion order; listing walks them backwards so
/// the newest-first contract holds even when timestamps collide.
#[derive(Default)]
pub struct InMemoryItineraryStore {
    itineraries: RwLock<Vec<Itinerary>>,
}

impl InMemoryItineraryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItineraryStore for InMemoryItineraryStore {
    async fn create(&self, itinerary: Itinerary) -> AppResult<Itinerary> {
        let mut itineraries = self.itineraries.write().await;
        itineraries.push(itinerary.clone());
        Ok(itinerary)
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<Itinerary>> {
        let itineraries = self.itineraries.read().await;
        Ok(itineraries
            .iter()
            .rev()
            .filter(|itinerary| itinerary.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get(&self, id: Uuid, requesting_user_id: &str) -> AppResult<Itinerary> {
        let itineraries = self.itineraries.read().await;
        itineraries
            .iter()
            .find(|itinerary| itinerary.id == id && itinerary.user_id == requesting_user_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("itinerary '{}' not found", id)))
    }

    async fn delete(&self, id: Uuid, requesting_user_id: &str) -> AppResult<()> {
        let mut itineraries = self.itineraries.write().await;

        let position = itineraries
            .iter()
            .position(|itinerary| itinerary.id == id)
            .ok_or_else(|| AppError::NotFound(format!("itinerary '{}' not found", id)))?;

        if itineraries[position].user_id != requesting_user_id {
            return Err(AppError::Forbidden(
                "itinerary belongs to another user".to_string(),
            ));
        }

        itineraries.remove(position);
        Ok(())
    }
}
