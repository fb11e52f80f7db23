use std::sync::Arc;

use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use wayfarer_api::{
    catalog::{cached::CachedCatalog, postgres::PgCatalog},
    config::Config,
    db::{create_pool, create_redis_client, Cache},
    engine::scorer::ScoringWeights,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    routes::{create_router, AppState},
    store::postgres::PgItineraryStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 1. Configuration from the environment
    let config = Config::from_env()?;

    // 2. Postgres pool and schema
    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    // 3. Redis cache with its background writer
    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client).await;

    // 4. Collaborators behind their traits
    let catalog = CachedCatalog::new(
        PgCatalog::new(pool.clone()),
        cache,
        config.catalog_cache_ttl,
    );
    let store = PgItineraryStore::new(pool);

    let state = Arc::new(AppState {
        catalog: Arc::new(catalog),
        store: Arc::new(store),
        weights: ScoringWeights::default(),
    });

    let app = create_router(state).layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(request_id_middleware))
            .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
            .layer(CorsLayer::permissive()),
    );

    // 5. Serve until the listener closes
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");
    axum::serve(listener, app).await?;

    // Flush pending cache writes before exiting
    cache_writer.shutdown().await;

    Ok(())
}
