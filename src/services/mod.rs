pub mod itineraries;
pub mod recommendations;
