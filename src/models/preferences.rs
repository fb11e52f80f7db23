use serde::Deserialize;
use std::collections::BTreeMap;

use super::{Category, Season};

/// One category pick in a raw preference payload
///
/// The weight is optional; missing weights are filled in uniformly by the
/// profile builder.
#[derive(Debug, Clone, Deserialize)]
pub struct CategorySelection {
    pub category: String,
    pub weight: Option<f64>,
}

/// Raw preference payload as submitted by a client
///
/// Every field is optional: the profile builder supplies documented defaults
/// for anything left out.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferenceInput {
    #[serde(default)]
    pub categories: Vec<CategorySelection>,
    pub min_difficulty: Option<u8>,
    pub max_difficulty: Option<u8>,
    pub max_daily_budget: Option<f64>,
    pub season: Option<String>,
    pub activities: Option<Vec<String>>,
}

/// Normalized preference profile used for scoring
///
/// Built fresh per recommendation request and discarded after use; never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceProfile {
    /// Interest weight per category, each in [0, 1]
    pub category_weights: BTreeMap<Category, f64>,
    /// Inclusive difficulty band (min, max), each within 1..=5
    pub difficulty_range: (u8, u8),
    /// Daily budget ceiling in USD; `None` means unconstrained
    pub budget_ceiling: Option<f64>,
    pub season: Season,
    pub activities: Vec<String>,
}
