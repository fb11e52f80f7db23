/// Read-through caching over a fallible async lookup.
///
/// Checks the cache for `$key` and returns the hit when there is one.
/// On a miss the block runs, its value is queued for a write-behind
/// with the given TTL, and the fresh value is returned. Errors from
/// the block propagate uncached, so failures are retried on the next
/// call.
///
/// # Arguments
/// * `$cache`: a [`crate::db::Cache`] (anything with `read` and
///   `write_behind` methods).
/// * `$key`: the [`crate::db::CacheKey`] for this value.
/// * `$ttl`: time-to-live of the cached value, in seconds.
/// * `$block`: async block computing the value on a miss.
///
/// # Example
/// ```ignore
/// let destinations = cached!(cache, CacheKey::DestinationList(token), ttl, async move {
///     // Hit the database only on a cache miss
///     load_destinations_from_postgres()
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.read(&$key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.write_behind(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
