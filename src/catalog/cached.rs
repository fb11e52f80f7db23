use async_trait::async_trait;

use crate::{
    cached,
    catalog::{CatalogAccessor, DestinationFilter},
    db::{Cache, CacheKey},
    error::AppResult,
    models::Destination,
};

/// Read-through Redis cache in front of another catalog
///
/// Hits go straight to Redis; misses fall through to the inner
/// catalog and the result is written back off the request path.
/// Errors, including a missing destination, are never cached.
pub struct CachedCatalog<C> {
    inner: C,
    cache: Cache,
    ttl: u64,
}

impl<C: CatalogAccessor> CachedCatalog<C> {
    pub fn new(inner: C, cache: Cache, ttl: u64) -> Self {
        Self { inner, cache, ttl }
    }
}

#[async_trait]
impl<C: CatalogAccessor> CatalogAccessor for CachedCatalog<C> {
    async fn list(&self, filter: &DestinationFilter) -> AppResult<Vec<Destination>> {
        cached!(
            self.cache,
            CacheKey::DestinationList(filter.cache_token()),
            self.ttl,
            async move { self.inner.list(filter).await }
        )
    }

    async fn get(&self, id: &str) -> AppResult<Destination> {
        cached!(
            self.cache,
            CacheKey::Destination(id.to_string()),
            self.ttl,
            async move { self.inner.get(id).await }
        )
    }

    async fn count(&self) -> AppResult<u64> {
        cached!(
            self.cache,
            CacheKey::DestinationCount,
            self.ttl,
            async move { self.inner.count().await }
        )
    }

    async fn top_by_popularity(&self, limit: usize) -> AppResult<Vec<Destination>> {
        cached!(
            self.cache,
            CacheKey::PopularTop(limit),
            self.ttl,
            async move { self.inner.top_by_popularity(limit).await }
        )
    }
}
