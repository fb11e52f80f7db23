use sqlx::{postgres::PgPoolOptions, PgPool};

/// Upper bound on pooled connections; the catalog and the itinerary
/// store share one pool
const MAX_POOL_CONNECTIONS: u32 = 5;

/// Creates the PostgreSQL connection pool
///
/// Both storage backends borrow from this pool; sqlx manages
/// connection lifecycle and reuse.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_POOL_CONNECTIONS)
        .connect(database_url)
        .await?;

    Ok(pool)
}
