pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::Itinerary;

/// Persistence for assembled itineraries
///
/// The engine assigns ids and timestamps before handing records over;
/// the store keeps them as given. Reads are scoped to the requesting
/// user, so a foreign id behaves exactly like a missing one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItineraryStore: Send + Sync {
    /// Persists an itinerary and returns it unchanged
    async fn create(&self, itinerary: Itinerary) -> AppResult<Itinerary>;

    /// All itineraries belonging to the user, newest first
    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<Itinerary>>;

    /// Fetches one itinerary; `Error::NotFound` when the id does not
    /// exist or belongs to another user
    async fn get(&self, id: Uuid, requesting_user_id: &str) -> AppResult<Itinerary>;

    /// Deletes an itinerary owned by the requester
    ///
    /// `Error::NotFound` for a missing id, `Error::Forbidden` when the
    /// record belongs to someone else; in that case nothing changes.
    async fn delete(&self, id: Uuid, requesting_user_id: &str) -> AppResult<()>;
}
