use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};
use crate::models::{Category, PreferenceInput, PreferenceProfile, Season};

/// Full difficulty band used when the caller does not restrict it
const FULL_DIFFICULTY_RANGE: (u8, u8) = (1, 5);

/// Normalizes a raw preference payload into a scoring profile
///
/// Defaulting rules:
/// - a selection without an explicit weight gets `1 / selected_count`; with
///   no selections at all, every known category gets `1/6`
/// - explicit weights are clamped into [0, 1]
/// - a missing difficulty bound falls back to the full [1, 5] band
/// - a budget that is absent or non-positive means "no constraint"
/// - a missing season means `Any`
///
/// Fails with a validation error on unknown category or season tokens,
/// inverted difficulty bounds, or bounds outside 1..=5. Pure; no side effects.
pub fn build_profile(input: &PreferenceInput) -> AppResult<PreferenceProfile> {
    let category_weights = resolve_category_weights(&input.categories)?;
    let difficulty_range = resolve_difficulty_range(input.min_difficulty, input.max_difficulty)?;

    let budget_ceiling = match input.max_daily_budget {
        Some(budget) if budget > 0.0 => Some(budget),
        _ => None,
    };

    let season = match &input.season {
        Some(token) => Season::from_token(token).ok_or_else(|| {
            AppError::Validation(format!("unknown season '{}'", token))
        })?,
        None => Season::Any,
    };

    Ok(PreferenceProfile {
        category_weights,
        difficulty_range,
        budget_ceiling,
        season,
        activities: input.activities.clone().unwrap_or_default(),
    })
}

fn resolve_category_weights(
    selections: &[crate::models::CategorySelection],
) -> AppResult<BTreeMap<Category, f64>> {
    if selections.is_empty() {
        let uniform = 1.0 / Category::ALL.len() as f64;
        return Ok(Category::ALL.iter().map(|c| (*c, uniform)).collect());
    }

    let uniform = 1.0 / selections.len() as f64;
    let mut weights = BTreeMap::new();

    for selection in selections {
        let category = Category::from_token(&selection.category).ok_or_else(|| {
            AppError::Validation(format!("unknown category '{}'", selection.category))
        })?;

        let weight = match selection.weight {
            Some(explicit) => explicit.clamp(0.0, 1.0),
            None => uniform,
        };
        weights.insert(category, weight);
    }

    Ok(weights)
}

fn resolve_difficulty_range(min: Option<u8>, max: Option<u8>) -> AppResult<(u8, u8)> {
    let min = min.unwrap_or(FULL_DIFFICULTY_RANGE.0);
    let max = max.unwrap_or(FULL_DIFFICULTY_RANGE.1);

    if !(1..=5).contains(&min) || !(1..=5).contains(&max) {
        return Err(AppError::Validation(format!(
            "difficulty bounds must lie within 1..=5, got [{}, {}]",
            min, max
        )));
    }
    if min > max {
        return Err(AppError::Validation(format!(
            "inverted difficulty bounds: min {} > max {}",
            min, max
        )));
    }

    Ok((min, max))
}
