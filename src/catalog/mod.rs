pub mod cached;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Category, Destination, Season};

/// Filter set for catalog listings
///
/// All criteria are optional and combine with AND. `skip`/`limit`
/// page the filtered result; a missing limit means unbounded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DestinationFilter {
    pub category: Option<Category>,
    pub search: Option<String>,
    pub difficulty: Option<u8>,
    pub min_cost: Option<f64>,
    pub max_cost: Option<f64>,
    pub season: Option<Season>,
    pub skip: usize,
    pub limit: Option<usize>,
}

impl DestinationFilter {
    /// True when the destination satisfies every set criterion
    ///
    /// Paging fields are ignored here; backends apply them after
    /// filtering. The search term matches case-insensitively against
    /// name, description and location.
    pub fn matches(&self, destination: &Destination) -> bool {
        if let Some(category) = self.category {
            if destination.category != category {
                return false;
            }
        }
        if let Some(difficulty) = self.difficulty {
            if destination.difficulty != difficulty {
                return false;
            }
        }
        if let Some(min_cost) = self.min_cost {
            if destination.avg_cost_per_day < min_cost {
                return false;
            }
        }
        if let Some(max_cost) = self.max_cost {
            if destination.avg_cost_per_day > max_cost {
                return false;
            }
        }
        if let Some(season) = self.season {
            if destination.best_season != season {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let haystacks = [
                &destination.name,
                &destination.description,
                &destination.location,
            ];
            if !haystacks
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            {
                return false;
            }
        }
        true
    }

    /// Stable token identifying this filter, used as a cache key part
    ///
    /// The search term is lowercased so queries that differ only in
    /// case share the same cache slot.
    pub fn cache_token(&self) -> String {
        format!(
            "cat={}|q={}|diff={}|min={}|max={}|season={}|skip={}|limit={}",
            self.category.map(|c| c.as_str()).unwrap_or("*"),
            self.search
                .as_deref()
                .map(|s| s.to_lowercase())
                .unwrap_or_else(|| "*".to_string()),
            self.difficulty
                .map(|d| d.to_string())
                .unwrap_or_else(|| "*".to_string()),
            self.min_cost
                .map(|c| c.to_string())
                .unwrap_or_else(|| "*".to_string()),
            self.max_cost
                .map(|c| c.to_string())
                .unwrap_or_else(|| "*".to_string()),
            self.season.map(|s| s.as_str()).unwrap_or("*"),
            self.skip,
            self.limit
                .map(|l| l.to_string())
                .unwrap_or_else(|| "*".to_string()),
        )
    }
}

/// Read access to the destination catalog
///
/// Implementations own their connections and are shared behind an
/// `Arc` across request handlers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogAccessor: Send + Sync {
    /// Lists destinations matching the filter, paged by skip/limit
    async fn list(&self, filter: &DestinationFilter) -> AppResult<Vec<Destination>>;

    /// Fetches a single destination, `Error::NotFound` when absent
    async fn get(&self, id: &str) -> AppResult<Destination>;

    /// Total number of destinations in the catalog, unfiltered
    async fn count(&self) -> AppResult<u64>;

    /// Most popular destinations first, id ascending on ties
    ///
    /// The default walks the full listing; backends with an order-by
    /// push the sort down instead.
    async fn top_by_popularity(&self, limit: usize) -> AppResult<Vec<Destination>> {
        let mut destinations = self.list(&DestinationFilter::default()).await?;
        destinations.sort_by(|a, b| {
            b.popularity
                .total_cmp(&a.popularity)
                .then_with(|| a.id.cmp(&b.id))
        });
        destinations.truncate(limit);
        Ok(destinations)
    }
}
