use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::{Destination, PreferenceProfile, Season};

/// Difficulty distance at which the fit score reaches zero
const DIFFICULTY_DECAY_STEPS: f64 = 3.0;

/// Tolerance used when checking that weight groups sum to one
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Weight policy for the destination scorer
///
/// The four sub-score weights must sum to 1, as must the blend pair.
/// The defaults are the tuned production policy; callers that want to
/// experiment construct their own set through `new`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub category: f64,
    pub difficulty: f64,
    pub budget: f64,
    pub season: f64,
    pub base_blend: f64,
    pub popularity_blend: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            category: 0.4,
            difficulty: 0.25,
            budget: 0.2,
            season: 0.15,
            base_blend: 0.9,
            popularity_blend: 0.1,
        }
    }
}

impl ScoringWeights {
    /// Builds a validated weight set
    ///
    /// Rejects negative weights and groups that do not sum to one
    /// (within 1e-9), which keeps every final score inside [0,1].
    pub fn new(
        category: f64,
        difficulty: f64,
        budget: f64,
        season: f64,
        base_blend: f64,
        popularity_blend: f64,
    ) -> AppResult<Self> {
        let weights = [
            category,
            difficulty,
            budget,
            season,
            base_blend,
            popularity_blend,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(AppError::Validation(
                "scoring weights must be finite and non-negative".to_string(),
            ));
        }

        let sub_sum = category + difficulty + budget + season;
        if (sub_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(AppError::Validation(format!(
                "sub-score weights must sum to 1, got {}",
                sub_sum
            )));
        }

        let blend_sum = base_blend + popularity_blend;
        if (blend_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(AppError::Validation(format!(
                "blend weights must sum to 1, got {}",
                blend_sum
            )));
        }

        Ok(Self {
            category,
            difficulty,
            budget,
            season,
            base_blend,
            popularity_blend,
        })
    }
}

/// A destination paired with its preference-fit score
#[derive(Debug, Clone, Serialize)]
pub struct ScoredDestination {
    pub destination: Destination,
    pub score: f64,
}

/// Scores one destination against a profile, always in [0,1]
///
/// Combines the four sub-scores under the weight policy, then blends
/// the result with normalized popularity. Pure; scoring is total, so
/// every destination gets a score and filtering happens downstream.
pub fn score_destination(
    weights: &ScoringWeights,
    profile: &PreferenceProfile,
    destination: &Destination,
) -> f64 {
    let combined = weights.category * category_score(profile, destination)
        + weights.difficulty * difficulty_score(profile, destination)
        + weights.budget * budget_score(profile, destination)
        + weights.season * season_score(profile, destination);

    let popularity = (destination.popularity / 100.0).clamp(0.0, 1.0);
    let final_score = combined * weights.base_blend + popularity * weights.popularity_blend;
    final_score.clamp(0.0, 1.0)
}

/// Scores every destination in the slice, preserving input order
pub fn score_catalog(
    weights: &ScoringWeights,
    profile: &PreferenceProfile,
    destinations: Vec<Destination>,
) -> Vec<ScoredDestination> {
    destinations
        .into_iter()
        .map(|destination| {
            let score = score_destination(weights, profile, &destination);
            ScoredDestination { destination, score }
        })
        .collect()
}

fn category_score(profile: &PreferenceProfile, destination: &Destination) -> f64 {
    profile
        .category_weights
        .get(&destination.category)
        .copied()
        .unwrap_or(0.0)
}

fn difficulty_score(profile: &PreferenceProfile, destination: &Destination) -> f64 {
    let (min, max) = profile.difficulty_range;
    let level = destination.difficulty;

    let distance = if level < min {
        (min - level) as f64
    } else if level > max {
        (level - max) as f64
    } else {
        return 1.0;
    };

    (1.0 - distance / DIFFICULTY_DECAY_STEPS).clamp(0.0, 1.0)
}

fn budget_score(profile: &PreferenceProfile, destination: &Destination) -> f64 {
    let Some(ceiling) = profile.budget_ceiling else {
        return 1.0;
    };

    let cost = destination.avg_cost_per_day;
    if cost <= ceiling {
        return 1.0;
    }

    // Hits zero once the daily cost reaches twice the ceiling
    (1.0 - (cost - ceiling) / ceiling).clamp(0.0, 1.0)
}

fn season_score(profile: &PreferenceProfile, destination: &Destination) -> f64 {
    if profile.season == Season::Any
        || destination.best_season == Season::Any
        || profile.season == destination.best_season
    {
        1.0
    } else {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use std::collections::BTreeMap;

    fn create_test_destination(id: &str) -> Destination {
        Destination {
            id: id.to_string(),
            name: "Everest Base Camp Trek".to_string(),
            location: "Khumbu".to_string(),
            category: Category::Trekking,
            difficulty: 4,
            avg_cost_per_day: 40.0,
            duration_days: 14,
            best_season: Season::Autumn,
            altitude_m: Some(5364.0),
            coordinates: None,
            popularity: 80.0,
            permit_required: true,
            description: "Classic trek to the foot of Everest".to_string(),
            activities: vec!["hiking".to_string()],
        }
    }

    fn create_test_profile() -> PreferenceProfile {
        let mut category_weights = BTreeMap::new();
        category_weights.insert(Category::Trekking, 1.0);

        PreferenceProfile {
            category_weights,
            difficulty_range: (3, 5),
            budget_ceiling: Some(50.0),
            season: Season::Autumn,
            activities: vec![],
        }
    }

    #[test]
    fn test_default_weights_are_valid() {
        let d = ScoringWeights::default();
        let rebuilt = ScoringWeights::new(
            d.category,
            d.difficulty,
            d.budget,
            d.season,
            d.base_blend,
            d.popularity_blend,
        );
        assert!(rebuilt.is_ok());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let result = ScoringWeights::new(0.5, 0.25, 0.2, 0.15, 0.9, 0.1);
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = ScoringWeights::new(0.4, 0.25, 0.2, 0.15, 0.8, 0.1);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_negative_weights_rejected() {
        let result = ScoringWeights::new(1.4, -0.25, 0.2, -0.35, 0.9, 0.1);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_perfect_match_scores_098() {
        // All four sub-scores hit 1.0, so the blend leaves only the
        // popularity term below ceiling: 1.0*0.9 + 0.8*0.1 = 0.98
        let weights = ScoringWeights::default();
        let profile = create_test_profile();
        let destination = create_test_destination("everest-base-camp");

        let score = score_destination(&weights, &profile, &destination);
        assert!((score - 0.98).abs() < 1e-9);
    }

    #[test]
    fn test_category_miss_scores_zero_sub_score() {
        let profile = create_test_profile();
        let mut destination = create_test_destination("chitwan-safari");
        destination.category = Category::Wildlife;

        assert_eq!(category_score(&profile, &destination), 0.0);
    }

    #[test]
    fn test_difficulty_decay_outside_band() {
        let profile = create_test_profile();

        let mut destination = create_test_destination("d");
        destination.difficulty = 2; // distance 1 below the band
        assert!((difficulty_score(&profile, &destination) - 2.0 / 3.0).abs() < 1e-9);

        destination.difficulty = 1; // distance 2
        assert!((difficulty_score(&profile, &destination) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_difficulty_zero_at_distance_three() {
        let mut profile = create_test_profile();
        profile.difficulty_range = (4, 5);

        let mut destination = create_test_destination("d");
        destination.difficulty = 1; // distance 3
        assert_eq!(difficulty_score(&profile, &destination), 0.0);
    }

    #[test]
    fn test_budget_unconstrained_scores_one() {
        let mut profile = create_test_profile();
        profile.budget_ceiling = None;

        let mut destination = create_test_destination("d");
        destination.avg_cost_per_day = 10_000.0;
        assert_eq!(budget_score(&profile, &destination), 1.0);
    }

    #[test]
    fn test_budget_linear_decay_to_double_ceiling() {
        let profile = create_test_profile(); // ceiling 50

        let mut destination = create_test_destination("d");
        destination.avg_cost_per_day = 75.0; // halfway to 2x
        assert!((budget_score(&profile, &destination) - 0.5).abs() < 1e-9);

        destination.avg_cost_per_day = 100.0; // exactly 2x
        assert_eq!(budget_score(&profile, &destination), 0.0);

        destination.avg_cost_per_day = 140.0; // beyond 2x stays clamped
        assert_eq!(budget_score(&profile, &destination), 0.0);
    }

    #[test]
    fn test_season_mismatch_gets_half_credit() {
        let profile = create_test_profile(); // Autumn

        let mut destination = create_test_destination("d");
        destination.best_season = Season::Winter;
        assert_eq!(season_score(&profile, &destination), 0.5);

        destination.best_season = Season::Any;
        assert_eq!(season_score(&profile, &destination), 1.0);
    }

    #[test]
    fn test_scores_stay_in_unit_interval() {
        let weights = ScoringWeights::default();
        let profile = create_test_profile();

        for difficulty in 1..=5u8 {
            for cost in [0.0, 25.0, 50.0, 99.0, 250.0] {
                for popularity in [0.0, 35.0, 100.0] {
                    let mut destination = create_test_destination("sweep");
                    destination.difficulty = difficulty;
                    destination.avg_cost_per_day = cost;
                    destination.popularity = popularity;

                    let score = score_destination(&weights, &profile, &destination);
                    assert!(
                        (0.0..=1.0).contains(&score),
                        "score {} out of range for difficulty {} cost {} popularity {}",
                        score,
                        difficulty,
                        cost,
                        popularity
                    );
                }
            }
        }
    }

    #[test]
    fn test_score_catalog_preserves_order() {
        let weights = ScoringWeights::default();
        let profile = create_test_profile();
        let destinations = vec![
            create_test_destination("b"),
            create_test_destination("a"),
            create_test_destination("c"),
        ];

        let scored = score_catalog(&weights, &profile, destinations);
        let ids: Vec<&str> = scored.iter().map(|s| s.destination.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }
}
