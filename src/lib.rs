//! Finds pharmacies stocking a medicine and ranks them by great-circle
//! distance from the user.

pub mod api;
pub mod catalog;
pub mod error;
pub mod geo;
pub mod matcher;
pub mod medicine_info;

pub use catalog::{Catalog, Pharmacy};
pub use error::FinderError;
pub use geo::{distance_km, GeoPoint};
pub use matcher::{match_pharmacies, MatchResult, QueryOutcome};
