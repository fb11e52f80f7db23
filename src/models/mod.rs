pub mod destination;
pub mod itinerary;
pub mod preferences;

pub use destination::{Category, Destination, GeoPoint, Season};
pub use itinerary::{totals_from_entries, Itinerary, ItineraryEntry, ItineraryTotals};
pub use preferences::{CategorySelection, PreferenceInput, PreferenceProfile};
