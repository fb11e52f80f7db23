use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Category;

/// One destination placed into an itinerary schedule
///
/// Carries a denormalized snapshot of the destination taken at assembly time,
/// so a later catalog edit never retroactively alters a saved itinerary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItineraryEntry {
    pub destination_id: String,
    pub name: String,
    pub location: String,
    pub category: Category,
    pub difficulty: u8,
    pub activities: Vec<String>,
    pub altitude_m: Option<f64>,
    pub description: String,
    /// First day of the visit, 1-indexed within the itinerary
    pub start_day: u32,
    /// Last day of the visit, inclusive
    pub end_day: u32,
    pub duration_days: u32,
    /// Entry cost = avg_cost_per_day × duration_days, unrounded
    pub cost: f64,
}

/// Aggregate totals derived from itinerary entries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItineraryTotals {
    pub days: u32,
    /// Total cost rounded to 2 decimal places
    pub cost: f64,
}

/// A persisted, scheduled, costed trip plan
///
/// Itineraries are replace-on-edit: entry changes happen through re-assembly,
/// never by patching a stored record in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Itinerary {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub entries: Vec<ItineraryEntry>,
    pub total_days: u32,
    pub total_cost: f64,
}

/// Rounds a currency amount to its minor-unit precision (2 decimal places)
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Derives aggregate totals from a slice of entries
///
/// This is the single source of truth for `total_days` and `total_cost`:
/// entry costs stay unrounded, and rounding happens once at the aggregate so
/// per-entry rounding error cannot compound.
pub fn totals_from_entries(entries: &[ItineraryEntry]) -> ItineraryTotals {
    let days = entries.iter().map(|e| e.duration_days).sum();
    let cost = round_currency(entries.iter().map(|e| e.cost).sum());
    ItineraryTotals { days, cost }
}
