//! Filters a catalog by stocked medicine and ranks the survivors by distance.

use ordered_float::OrderedFloat;

use crate::catalog::Pharmacy;
use crate::geo::{distance_km, GeoPoint};

/// One pharmacy that stocks the queried medicine, with its distance from the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult {
    pub pharmacy_id: u32,
    pub name: String,
    pub location: GeoPoint,
    pub hours: String,
    /// Full precision; round only when presenting.
    pub distance_km: f64,
}

/// Matches ascending by distance, plus the id of the first one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryOutcome {
    pub matches: Vec<MatchResult>,
    pub nearest_id: Option<u32>,
}

/// Case folding applied to both query and stock entries before comparison.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

/// True if any stock entry contains `needle` (already normalized).
/// An empty needle matches any non-empty stock.
fn stocks(pharmacy: &Pharmacy, needle: &str) -> bool {
    pharmacy
        .stock
        .iter()
        .any(|m| normalize_name(m).contains(needle))
}

/// Pharmacies in `catalog` stocking something that contains `query`,
/// nearest to `origin` first. Equal distances keep catalog order.
pub fn match_pharmacies(catalog: &[Pharmacy], query: &str, origin: GeoPoint) -> QueryOutcome {
    let needle = normalize_name(query);

    let mut matches: Vec<MatchResult> = catalog
        .iter()
        .filter(|p| stocks(p, &needle))
        .map(|p| MatchResult {
            pharmacy_id: p.id,
            name: p.name.clone(),
            location: p.location,
            hours: p.hours.clone(),
            distance_km: distance_km(origin, p.location),
        })
        .collect();

    // sort_by_key is stable
    matches.sort_by_key(|m| OrderedFloat(m.distance_km));

    let nearest_id = matches.first().map(|m| m.pharmacy_id);
    QueryOutcome {
        matches,
        nearest_id,
    }
}
