//! Deterministic recommendation and itinerary core
//!
//! Everything in here is request-scoped and free of shared state; the
//! async pieces only touch the catalog through the accessor trait.

pub mod assembler;
pub mod profile;
pub mod ranker;
pub mod scorer;
