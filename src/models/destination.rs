use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Closed set of destination categories
///
/// Category tokens arrive as loosely-typed strings from clients and from the
/// catalog backend; parsing them into this enum turns an invalid category into
/// a validation error instead of a silent no-match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Trekking,
    Cultural,
    Religious,
    Nature,
    Wildlife,
    Adventure,
}

impl Category {
    /// Every known category, in canonical order
    pub const ALL: [Category; 6] = [
        Category::Trekking,
        Category::Cultural,
        Category::Religious,
        Category::Nature,
        Category::Wildlife,
        Category::Adventure,
    ];

    /// Parses a raw category token, case-insensitively
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "trekking" => Some(Category::Trekking),
            "cultural" => Some(Category::Cultural),
            "religious" => Some(Category::Religious),
            "nature" => Some(Category::Nature),
            "wildlife" => Some(Category::Wildlife),
            "adventure" => Some(Category::Adventure),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Trekking => "trekking",
            Category::Cultural => "cultural",
            Category::Religious => "religious",
            Category::Nature => "nature",
            Category::Wildlife => "wildlife",
            Category::Adventure => "adventure",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Travel season, with `Any` meaning no seasonal restriction
///
/// Legacy catalog data spells `Any` as `"All"`; both tokens are accepted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
    #[serde(alias = "all")]
    Any,
}

impl Season {
    /// Parses a raw season token, case-insensitively
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "spring" => Some(Season::Spring),
            "summer" => Some(Season::Summer),
            "autumn" => Some(Season::Autumn),
            "winter" => Some(Season::Winter),
            "any" | "all" => Some(Season::Any),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
            Season::Any => "any",
        }
    }
}

impl Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Geographic coordinates in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Immutable catalog record for one destination
///
/// Owned and mutated only by the catalog backend; the engine treats every
/// destination as read-only input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Destination {
    /// Unique identifier; also the lexicographic tie-break key in ranking
    pub id: String,
    pub name: String,
    pub location: String,
    pub category: Category,
    /// Ordinal difficulty level, 1 (easy) to 5 (extreme)
    pub difficulty: u8,
    /// Average cost per day in USD
    pub avg_cost_per_day: f64,
    /// Typical visit duration in days, at least 1
    pub duration_days: u32,
    pub best_season: Season,
    /// Altitude in meters; absent for non-mountain destinations
    pub altitude_m: Option<f64>,
    pub coordinates: Option<GeoPoint>,
    /// Popularity score in 0..=100
    pub popularity: f64,
    pub permit_required: bool,
    pub description: String,
    /// Activity tags, ordered; may be empty
    pub activities: Vec<String>,
}
