use crate::{
    catalog::{CatalogAccessor, DestinationFilter},
    engine::profile::build_profile,
    engine::ranker::{rank, RankOptions, Ranking},
    engine::scorer::{score_catalog, ScoringWeights},
    error::{AppError, AppResult},
    models::PreferenceInput,
};
use std::sync::Arc;
use std::time::Instant;

/// Produces a ranked recommendation list for one preference payload
///
/// Scoring covers the whole catalog; the cutoffs in `options` only
/// shape what the caller gets back. Deterministic for a fixed catalog
/// and payload.
pub async fn recommend(
    catalog: Arc<dyn CatalogAccessor>,
    weights: ScoringWeights,
    preferences: PreferenceInput,
    options: RankOptions,
) -> AppResult<Ranking> {
    let start = Instant::now();

    // 1. Normalize the raw payload into a scoring profile
    let profile = build_profile(&preferences)?;

    // 2. Refuse to recommend from an empty catalog
    let catalog_size = catalog.count().await?;
    if catalog_size == 0 {
        return Err(AppError::EmptyCatalog);
    }

    // 3. Score everything against the profile
    let destinations = catalog.list(&DestinationFilter::default()).await?;
    let scored = score_catalog(&weights, &profile, destinations);

    // 4. Order deterministically and apply the cutoffs
    let ranking = rank(scored, &options)?;

    tracing::info!(
        catalog_size,
        results = ranking.len(),
        top_k = ?options.top_k,
        min_score = options.min_score,
        processing_time_ms = start.elapsed().as_millis(),
        "Recommendations ranked"
    );

    Ok(ranking)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::memory::InMemoryCatalog;
    use crate::models::{Category, CategorySelection, Destination, Season};

    fn create_test_destination(id: &str, category: Category, popularity: f64) -> Destination {
        Destination {
            id: id.to_string(),
            name: format!("Destination {}", id),
            location: "Nepal".to_string(),
            category,
            difficulty: 3,
            avg_cost_per_day: 30.0,
            duration_days: 5,
            best_season: Season::Any,
            altitude_m: None,
            coordinates: None,
            popularity,
            permit_required: false,
            description: String::new(),
            activities: vec![],
        }
    }

    fn trekking_preferences() -> PreferenceInput {
        PreferenceInput {
            categories: vec![CategorySelection {
                category: "trekking".to_string(),
                weight: Some(1.0),
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_category_match_outranks_mismatch() {
        let catalog = Arc::new(InMemoryCatalog::new(vec![
            create_test_destination("swayambhunath", Category::Religious, 90.0),
            create_test_destination("annapurna", Category::Trekking, 50.0),
        ]));

        let ranking = recommend(
            catalog,
            ScoringWeights::default(),
            trekking_preferences(),
            RankOptions::default(),
        )
        .await
        .unwrap();

        let ids: Vec<String> = ranking
            .iter()
            .map(|entry| entry.destination.id.clone())
            .collect();
        assert_eq!(ids[0], "annapurna");
    }

    #[tokio::test]
    async fn test_empty_catalog_is_rejected() {
        let catalog = Arc::new(InMemoryCatalog::new(vec![]));

        let err = recommend(
            catalog,
            ScoringWeights::default(),
            trekking_preferences(),
            RankOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::EmptyCatalog));
    }

    #[tokio::test]
    async fn test_invalid_preferences_fail_before_catalog_access() {
        let catalog = Arc::new(InMemoryCatalog::new(vec![]));

        let preferences = PreferenceInput {
            categories: vec![CategorySelection {
                category: "shopping".to_string(),
                weight: None,
            }],
            ..Default::default()
        };

        // Validation beats the empty-catalog check
        let err = recommend(
            catalog,
            ScoringWeights::default(),
            preferences,
            RankOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_top_k_limits_the_result() {
        let catalog = Arc::new(InMemoryCatalog::new(vec![
            create_test_destination("a", Category::Trekking, 10.0),
            create_test_destination("b", Category::Trekking, 20.0),
            create_test_destination("c", Category::Trekking, 30.0),
        ]));

        let options = RankOptions {
            top_k: Some(2),
            ..Default::default()
        };
        let ranking = recommend(
            catalog,
            ScoringWeights::default(),
            trekking_preferences(),
            options,
        )
        .await
        .unwrap();

        assert_eq!(ranking.len(), 2);
    }
}
