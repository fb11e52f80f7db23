use async_trait::async_trait;

use crate::catalog::{CatalogAccessor, DestinationFilter};
use crate::error::{AppError, AppResult};
use crate::models::Destination;

/// Catalog backed by an immutable in-memory list
///
/// Used by the integration test server and anywhere a fixed fixture
/// set should stand in for Postgres. Listing order is id ascending,
/// matching the database backend.
pub struct InMemoryCatalog {
    destinations: Vec<Destination>,
}

impl InMemoryCatalog {
    pub fn new(mut destinations: Vec<Destination>) -> Self {
        destinations.sort_by(|a, b| a.id.cmp(&b.id));
        Self { destinations }
    }
}

#[async_trait]
impl CatalogAccessor for InMemoryCatalog {
    async fn list(&self, filter: &DestinationFilter) -> AppResult<Vec<Destination>> {
        let filtered = self
            .destinations
            .iter()
            .filter(|destination| filter.matches(destination))
            .skip(filter.skip);

        let destinations = match filter.limit {
            Some(limit) => filtered.take(limit).cloned().collect(),
            None => filtered.cloned().collect(),
        };
        Ok(destinations)
    }

    async fn get(&self, id: &str) -> AppResult<Destination> {
        self.destinations
            .iter()
            .find(|destination| destination.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("destination '{}' not found", id)))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.destinations.len() as u64)
    }
}
